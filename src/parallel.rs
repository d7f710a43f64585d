//! # Parallel Fixed-Sequence Copier
//!
//! Fork-join copying of fixed sequences on a bounded rayon pool.
//!
//! ```text
//! src:  [ e0 e1 e2 | e3 e4 e5 | e6 e7 e8 ]
//!          worker 0   worker 1   worker 2
//! out:  [ c0 c1 c2 | c3 c4 c5 | c6 c7 c8 ]
//! ```
//!
//! Each worker reads its own source range and writes the matching output
//! slots; the only shared state is the (immutable) element strategy. Output
//! is element-wise identical to the sequential copy.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::containers::copy_slice;
use crate::contract::Copyable;
use crate::error::CopyError;

#[cfg(feature = "dispatch")]
use crate::dispatch::{Describe, Dispatcher};

/// Configuration for parallel copying.
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// Number of worker threads (0 = auto-detect).
    pub num_threads: usize,
    /// Minimum number of elements handed to one worker at a time.
    pub min_len: usize,
    /// Sequences shorter than this are copied on the calling thread.
    pub sequential_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        ParallelConfig {
            num_threads: 0, // auto-detect
            min_len: 1024,
            sequential_threshold: 100_000,
        }
    }
}

impl ParallelConfig {
    /// Create a config that never leaves the calling thread.
    pub fn single_threaded() -> Self {
        ParallelConfig {
            num_threads: 1,
            min_len: usize::MAX,
            sequential_threshold: usize::MAX,
        }
    }

    /// Create a config with specified thread count.
    pub fn with_threads(num_threads: usize) -> Self {
        ParallelConfig {
            num_threads,
            ..Default::default()
        }
    }

    /// Get the effective number of threads.
    pub fn effective_threads(&self) -> usize {
        if self.num_threads == 0 {
            rayon::current_num_threads()
        } else {
            self.num_threads
        }
    }
}

/// Deep copy a fixed sequence on the global rayon pool.
///
/// Always takes the parallel path for non-empty input; an empty slice
/// returns immediately without scheduling any work.
///
/// ```
/// let src: Vec<u64> = (1..=10_000).collect();
/// let copy = tola_copy::parallel_deep_copy(&src);
/// assert_eq!(&copy[..], &src[..]);
/// ```
pub fn parallel_deep_copy<T: Copyable + Send + Sync>(src: &[T]) -> Box<[T]> {
    if src.is_empty() {
        return Box::default();
    }
    tracing::trace!(len = src.len(), threads = rayon::current_num_threads(), "parallel deep copy");
    let mut out = Vec::with_capacity(src.len());
    src.par_iter().map(T::deep_copy).collect_into_vec(&mut out);
    out.into_boxed_slice()
}

/// Parallel copier with its own bounded worker pool.
pub struct ParallelCopier {
    pool: ThreadPool,
    config: ParallelConfig,
}

impl ParallelCopier {
    pub fn new(config: ParallelConfig) -> Result<Self, CopyError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.effective_threads())
            .thread_name(|index| format!("tola-copy-{index}"))
            .build()?;
        Ok(ParallelCopier { pool, config })
    }

    pub fn config(&self) -> &ParallelConfig {
        &self.config
    }

    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn is_sequential(&self, len: usize) -> bool {
        len < self.config.sequential_threshold || self.pool.current_num_threads() < 2
    }

    /// Deep copy a slice into a fixed sequence of the same length.
    pub fn copy<T: Copyable + Send + Sync>(&self, src: &[T]) -> Box<[T]> {
        if src.is_empty() {
            return Box::default();
        }
        if self.is_sequential(src.len()) {
            return copy_slice(src).into_boxed_slice();
        }

        tracing::trace!(len = src.len(), threads = self.num_threads(), "parallel deep copy");
        let min_len = self.config.min_len.max(1);
        let mut out = Vec::with_capacity(src.len());
        self.pool.install(|| {
            src.par_iter()
                .with_min_len(min_len)
                .map(T::deep_copy)
                .collect_into_vec(&mut out);
        });
        out.into_boxed_slice()
    }

    /// Deep copy an array.
    pub fn copy_array<T: Copyable + Send + Sync, const N: usize>(&self, src: &[T; N]) -> [T; N] {
        let mut copied = self.copy(src.as_slice()).into_vec().into_iter();
        // `copy` preserves length, so the fallback is never taken.
        core::array::from_fn(|i| copied.next().unwrap_or_else(|| src[i].deep_copy()))
    }

    /// Deep copy a slice through a dispatcher-resolved strategy.
    ///
    /// `T` is resolved once, before any worker starts; a classification
    /// failure returns without copying anything.
    #[cfg(feature = "dispatch")]
    pub fn copy_with<T: Describe>(&self, dispatcher: &Dispatcher, src: &[T]) -> Result<Box<[T]>, CopyError> {
        let strategy = dispatcher.strategy_for::<T>()?;
        if src.is_empty() {
            return Ok(Box::default());
        }
        if self.is_sequential(src.len()) {
            return Ok(crate::dispatch::copy_elements(src, &strategy)?.into_boxed_slice());
        }

        tracing::trace!(len = src.len(), threads = self.num_threads(), ty = strategy.type_name(), "parallel deep copy");
        let min_len = self.config.min_len.max(1);
        let copied: Vec<T> = self.pool.install(|| {
            src.par_iter()
                .with_min_len(min_len)
                .map(|item| strategy.copy_typed(item))
                .collect::<Result<_, _>>()
        })?;
        Ok(copied.into_boxed_slice())
    }
}

impl core::fmt::Debug for ParallelCopier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ParallelCopier")
            .field("threads", &self.num_threads())
            .field("config", &self.config)
            .finish()
    }
}
