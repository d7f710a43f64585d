//! Autoref-based classification machinery.
//!
//! This module implements the "Inherent Const Fallback" pattern for
//! compile-time classification of concrete types.
//!
//! ## How it works
//!
//! For each property P we want to detect:
//! 1. Define a fallback trait with `const IS_P: bool = false`
//! 2. Implement fallback for `Detect<X>` for all X
//! 3. Implement an inherent const `IS_P = true` for `Detect<X>` where `X: P`
//!
//! When resolving `Detect::<Concrete>::IS_P`, the compiler:
//! - If `Concrete: P`, finds the inherent const (true)
//! - Otherwise, finds the trait const (false)
//!
//! ## Limitation
//!
//! This only works for **concrete types** known at the call site.
//! In generic contexts (`fn foo<T: Copyable>()`) read `T::KIND` instead.

use core::marker::PhantomData;

use crate::contract::{Copyable, Kind};

/// Detection wrapper type.
#[doc(hidden)]
pub struct Detect<T: ?Sized>(PhantomData<T>);

/// Generate fallback trait + inherent const for one bound.
macro_rules! impl_detect {
    ($Name:ident => $($bound:tt)+) => {
        ::paste::paste! {
            #[doc(hidden)]
            pub trait [<$Name Fallback>] { const [<IS_ $Name:upper>]: bool = false; }
            impl<T: ?Sized> [<$Name Fallback>] for Detect<T> {}
            impl<T: $($bound)+> Detect<T> { pub const [<IS_ $Name:upper>]: bool = true; }
        }
    };
}

impl_detect!(Copyable => Copyable);
impl_detect!(Copy => Copy);

/// Declared classification: `Some(T::KIND)` when `T: Copyable`.
#[doc(hidden)]
pub trait DeclaredFallback {
    const DECLARED: Option<Kind> = None;
}
impl<T: ?Sized> DeclaredFallback for Detect<T> {}
impl<T: Copyable> Detect<T> {
    pub const DECLARED: Option<Kind> = Some(T::KIND);
}

/// Combine the detected facts in classifier order.
///
/// 1. A declared contract wins, whatever kind it declares.
/// 2. Otherwise a `Copy` type is a value type.
/// 3. Otherwise the type is not copyable.
#[doc(hidden)]
pub const fn resolve_kind(declared: Option<Kind>, is_copy: bool) -> Option<Kind> {
    match declared {
        Some(kind) => Some(kind),
        None if is_copy => Some(Kind::Value),
        None => None,
    }
}
