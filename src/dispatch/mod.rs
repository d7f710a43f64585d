//! # Layer 3: Dynamic Dispatch
//!
//! Descriptor-driven copying for callers that need a resolved, shareable
//! strategy object rather than a monomorphized `Copyable` call.
//!
//! ## Module Structure
//!
//! ```text
//! dispatch/
//! ├── descriptor.rs - TypeDescriptor, TypeRef, Describe
//! ├── strategy.rs   - Strategy, classify(), erased calling convention
//! └── describe.rs   - Describe impls and erased container copiers for std types
//! ```
//!
//! ## Usage
//!
//! ```
//! use tola_copy::dispatch::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! let grid = vec![vec![1, 2, 3], vec![4, 5, 6]];
//!
//! let copy = dispatcher.deep_copy(&grid)?;
//! assert_eq!(copy, grid);
//!
//! // Vec<Vec<i32>>, Vec<i32> and i32 are now cached.
//! assert_eq!(dispatcher.len(), 3);
//! # Ok::<(), tola_copy::CopyError>(())
//! ```

mod describe;
mod descriptor;
mod strategy;

pub use descriptor::{CompositeFacet, ContainerFacet, Describe, OptionalFacet, TypeDescriptor, TypeRef};
pub use strategy::{classify, copy_field, element, emit, source, ContainerCopyFn, CopyFn, Strategy};

pub(crate) use describe::copy_elements;

use core::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::error::CopyError;

/// Configuration for a [`Dispatcher`].
#[derive(Clone, Debug)]
pub struct DispatchConfig {
    /// Maximum container nesting resolved before giving up.
    pub max_depth: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig { max_depth: 32 }
    }
}

/// Cache counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Lookups answered from the cache.
    pub hits: usize,
    /// Strategies built by the classifier (racing builds count twice).
    pub misses: usize,
    /// Distinct types currently cached.
    pub entries: usize,
}

/// Memoizing resolver from types to copy strategies.
///
/// The cache is append-only and keyed by `TypeId`. Resolution runs outside
/// any lock; publishing goes through the map's entry API, so concurrent
/// resolutions of the same type leave exactly one entry and every caller
/// gets that entry back.
///
/// There is no process-wide instance. Create one per scope and pass it to
/// whatever needs it; `Dispatcher` is `Send + Sync`.
pub struct Dispatcher {
    cache: DashMap<TypeId, Arc<Strategy>, FxBuildHasher>,
    config: DispatchConfig,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatchConfig::default())
    }

    pub fn with_config(config: DispatchConfig) -> Self {
        Dispatcher {
            cache: DashMap::with_hasher(FxBuildHasher),
            config,
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Resolve the strategy for `ty`, classifying it (and any element types
    /// not yet cached) on first encounter.
    #[tracing::instrument(level = "trace", skip_all, fields(ty = ty.name()))]
    pub fn resolve(&self, ty: &TypeRef) -> Result<Arc<Strategy>, CopyError> {
        self.resolve_at(ty, 0)
    }

    /// Resolve the strategy for `T`.
    pub fn strategy_for<T: Describe>(&self) -> Result<Arc<Strategy>, CopyError> {
        self.resolve(&TypeRef::of::<T>())
    }

    fn resolve_at(&self, ty: &TypeRef, depth: usize) -> Result<Arc<Strategy>, CopyError> {
        if let Some(strategy) = self.lookup(ty.id()) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(ty = ty.name(), "copy strategy cache hit");
            return Ok(strategy);
        }
        if depth > self.config.max_depth {
            return Err(CopyError::NestingTooDeep {
                type_name: ty.name(),
                limit: self.config.max_depth,
            });
        }

        let descriptor = ty.describe();
        let strategy = classify(&descriptor, |element| self.resolve_at(element, depth + 1))?;
        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(ty = descriptor.name(), kind = ?strategy.kind(), depth, "resolved copy strategy");

        let published = self
            .cache
            .entry(ty.id())
            .or_insert_with(|| Arc::new(strategy))
            .value()
            .clone();
        Ok(published)
    }

    fn lookup(&self, id: TypeId) -> Option<Arc<Strategy>> {
        self.cache.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Deep copy `value` through its resolved strategy.
    ///
    /// Classification errors surface before any part of the copy is built.
    pub fn deep_copy<T: Describe>(&self, value: &T) -> Result<T, CopyError> {
        self.strategy_for::<T>()?.copy_typed(value)
    }

    /// Deep copy a slice into a fixed sequence, resolving `T` once.
    pub fn deep_copy_slice<T: Describe>(&self, src: &[T]) -> Result<Box<[T]>, CopyError> {
        let strategy = self.strategy_for::<T>()?;
        Ok(copy_elements(src, &strategy)?.into_boxed_slice())
    }

    /// Whether a strategy for `T` is cached.
    pub fn contains<T: 'static>(&self) -> bool {
        self.cache.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.cache.len(),
        }
    }

    /// Drop every cached strategy. Strategies already handed out stay valid.
    pub fn clear(&self) {
        self.cache.clear();
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
