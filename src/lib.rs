#![cfg_attr(not(feature = "std"), no_std)]

// Feature flags handled:
// - std: default, enables std library, hashed containers, error type
// - alloc: enables Vec/Box/String/BTree containers in no_std
// - detect: enables autoref classification (classify!)
// - dispatch: enables the descriptor-based dynamic dispatcher
// - parallel: enables the rayon-backed fixed-sequence copier

//! # tola-copy
//!
//! Capability-driven deep copy engine.
//!
//! **Independent deep clones of arbitrarily nested containers, without
//! writing copy logic for every combination of nesting.**
//!
//! ## Architecture
//!
//! Every type is classified into exactly one copy strategy:
//!
//! ```text
//! Kind::Delegated        - the type implements `Copyable` itself
//! Kind::Value            - immutable value, copied by value
//! Kind::Container(Shape) - FixedSequence | GrowableSequence | UniqueSet | Map
//! ```
//!
//! ```text
//! +-------------------------------------------------------------------+
//! |  Layer 0: Contract & Values                                       |
//! |  - Copyable, Kind, Shape, scalar/String/tuple impls               |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 1: Container Copiers                                       |
//! |  - [T; N], Box<[T]>, Vec, VecDeque, sets, maps, Option, Box       |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 2: Static Classification                                   |
//! |  - classify!, is_copyable! (autoref detection)                    |
//! +-------------------------------------------------------------------+
//!                                |
//!                                v
//! +-------------------------------------------------------------------+
//! |  Layer 3: Dynamic Dispatch & Parallel Copy                        |
//! |  - Dispatcher (memoized strategies), ParallelCopier (rayon)       |
//! +-------------------------------------------------------------------+
//! ```
//!
//! The static path (`Copyable`) is monomorphized: the strategy for each
//! element type is picked by the compiler and a type with no strategy is a
//! compile error. The dynamic path (`dispatch::Dispatcher`) resolves and
//! caches strategy objects at runtime for callers that need them as values.
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use tola_copy::prelude::*;
//!
//! #[derive(Copyable, Debug, PartialEq)]
//! struct Sensor {
//!     name: String,
//!     readings: Vec<f64>,
//! }
//!
//! let mut fleet: HashMap<u32, Vec<Option<Sensor>>> = HashMap::new();
//! fleet.insert(7, vec![Some(Sensor { name: "a".into(), readings: vec![1.5] }), None]);
//!
//! let mut copy = deep_copy(&fleet);
//! copy.get_mut(&7).unwrap()[0].as_mut().unwrap().readings.push(9.0);
//!
//! assert_eq!(fleet[&7][0].as_ref().unwrap().readings, vec![1.5]);
//! assert!(copy[&7][1].is_none());
//! ```

// Allow `::tola_copy` to work inside the crate itself
extern crate self as tola_copy;

#[cfg(feature = "alloc")]
extern crate alloc;

// Re-export paste for the detection macros
pub use paste;

// =============================================================================
// Layer 0: Contract & Values
// =============================================================================
pub mod contract;
pub mod primitives;

// =============================================================================
// Layer 1: Container Copiers
// =============================================================================
pub mod containers;

// =============================================================================
// Layer 2: Static Classification
// =============================================================================
#[cfg(feature = "detect")]
pub mod detect;

// =============================================================================
// Layer 3: Dynamic Dispatch & Parallel Copy
// =============================================================================
#[cfg(feature = "std")]
pub mod error;

#[cfg(feature = "dispatch")]
pub mod dispatch;

#[cfg(feature = "parallel")]
pub mod parallel;

// =============================================================================
// Re-exports at Crate Root
// =============================================================================

pub use contract::{deep_copy, Copyable, Kind, Shape};

#[cfg(feature = "std")]
pub use error::CopyError;

#[cfg(feature = "dispatch")]
pub use dispatch::{Describe, Dispatcher};

#[cfg(feature = "parallel")]
pub use parallel::{parallel_deep_copy, ParallelConfig, ParallelCopier};

// Re-export proc-macros
pub use macros::Copyable;

// =============================================================================
// Declarative Macro Bridge for #[derive(Copyable)]
// =============================================================================
//
// The derive cannot see this crate's features, so for types marked
// #[copyable(describe)] it emits a call to __describe_copyable! and the
// feature-gated definition below decides whether a `Describe` impl is
// generated.

/// Internal macro bridge - DO NOT USE DIRECTLY.
/// Use #[derive(Copyable)] with #[copyable(describe)] instead.
#[cfg(feature = "dispatch")]
#[macro_export]
#[doc(hidden)]
macro_rules! __describe_copyable {
    ($facet:ident; [$($params:tt)*] $ty:ty; [$($preds:tt)*]) => {
        impl<$($params)*> $crate::dispatch::Describe for $ty
        where
            $ty: $crate::Copyable + ::core::marker::Send + ::core::marker::Sync + 'static,
            $($preds)*
        {
            fn describe() -> $crate::dispatch::TypeDescriptor {
                $crate::__describe_copyable!(@facet $facet)
            }
        }
    };
    (@facet capability) => {
        $crate::dispatch::TypeDescriptor::capability::<Self>()
    };
    (@facet value) => {
        $crate::dispatch::TypeDescriptor::value::<Self>()
    };
}

/// Internal macro bridge - DO NOT USE DIRECTLY.
#[cfg(not(feature = "dispatch"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __describe_copyable {
    ($($tt:tt)*) => {};
}

/// Common items for deep copying.
pub mod prelude {
    pub use crate::{deep_copy, Copyable, Kind, Shape};
    #[cfg(feature = "dispatch")]
    pub use crate::dispatch::{Describe, Dispatcher};
    #[cfg(feature = "parallel")]
    pub use crate::parallel::{parallel_deep_copy, ParallelConfig, ParallelCopier};
    #[cfg(feature = "std")]
    pub use crate::error::CopyError;
    #[cfg(feature = "detect")]
    pub use crate::{classify, is_copyable};
}
