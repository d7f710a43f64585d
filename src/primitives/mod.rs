//! # Layer 0: Value Types
//!
//! Immutable-by-value types: duplicating the representation is already a
//! full, independent copy. All of them report [`Kind::Value`].
//!
//! - `mod.rs`: scalars, `&'static str`, `String`, `Duration`.
//! - `tuple.rs`: tuples up to arity 8, value-typed when every field is.

mod tuple;

use crate::contract::{Copyable, Kind};

/// Implement `Copyable` as a plain `Copy` for each listed type.
macro_rules! impl_value_copy {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Copyable for $ty {
                const KIND: Kind = Kind::Value;

                #[inline(always)]
                fn deep_copy(&self) -> Self {
                    *self
                }
            }
        )*
    };
}

impl_value_copy!(
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
    bool, char, (),
    &'static str,
    core::time::Duration,
    core::cmp::Ordering,
);

impl_value_copy!(
    core::num::NonZeroI8, core::num::NonZeroI16, core::num::NonZeroI32,
    core::num::NonZeroI64, core::num::NonZeroI128, core::num::NonZeroIsize,
    core::num::NonZeroU8, core::num::NonZeroU16, core::num::NonZeroU32,
    core::num::NonZeroU64, core::num::NonZeroU128, core::num::NonZeroUsize,
);

#[cfg(feature = "alloc")]
impl Copyable for alloc::string::String {
    // Owned, but immutable through a shared reference and never aliased.
    const KIND: Kind = Kind::Value;

    #[inline]
    fn deep_copy(&self) -> Self {
        self.clone()
    }
}

#[cfg(feature = "std")]
impl Copyable for std::path::PathBuf {
    const KIND: Kind = Kind::Value;

    #[inline]
    fn deep_copy(&self) -> Self {
        self.clone()
    }
}
