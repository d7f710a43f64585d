//! # Layer 2: Static Classification
//!
//! Compile-time classification of concrete types into copy strategies,
//! including types that implement nothing at all.
//!
//! ## Public API
//!
//! ```
//! use tola_copy::{classify, Kind, Shape};
//!
//! assert_eq!(classify!(i32), Some(Kind::Value));
//! assert_eq!(classify!(Vec<Vec<u8>>), Some(Kind::Container(Shape::GrowableSequence)));
//!
//! struct Opaque(std::sync::Mutex<u8>);
//! assert_eq!(classify!(Opaque), None);
//! ```
//!
//! ## Decision Order
//!
//! A `Copyable` impl is consulted first, so a user type wrapping a
//! container can declare its own kind. A bare `Copy` type that never opted
//! in is still a value type.

pub mod autoref;

pub use autoref::{
    resolve_kind, Detect,
    CopyFallback, CopyableFallback, DeclaredFallback,
};

/// Classify a concrete type: `Some(kind)` if it can be deep copied,
/// `None` if it is neither `Copyable` nor `Copy`.
///
/// Evaluates to a constant; usable in `const` items.
#[macro_export]
macro_rules! classify {
    ($T:ty) => {{
        #[allow(unused_imports)]
        use $crate::detect::{CopyFallback as _, DeclaredFallback as _};
        $crate::detect::resolve_kind(
            $crate::detect::Detect::<$T>::DECLARED,
            $crate::detect::Detect::<$T>::IS_COPY,
        )
    }};
}

/// Check whether a concrete type implements the `Copyable` contract.
///
/// ```
/// use tola_copy::is_copyable;
///
/// assert!(is_copyable!(String));
/// assert!(!is_copyable!(std::cell::Cell<u8>));
/// ```
#[macro_export]
macro_rules! is_copyable {
    ($T:ty) => {{
        #[allow(unused_imports)]
        use $crate::detect::CopyableFallback as _;
        $crate::detect::Detect::<$T>::IS_COPYABLE
    }};
}
