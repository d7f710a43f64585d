//! Wrappers that are transparent to classification.

use crate::contract::{Copyable, Kind};

/// `None` is the absent slot: it copies to `None` without touching `T`.
impl<T: Copyable> Copyable for Option<T> {
    const KIND: Kind = T::KIND;

    #[inline]
    fn deep_copy(&self) -> Self {
        self.as_ref().map(T::deep_copy)
    }
}

#[cfg(feature = "alloc")]
impl<T: Copyable> Copyable for alloc::boxed::Box<T> {
    const KIND: Kind = T::KIND;

    #[inline]
    fn deep_copy(&self) -> Self {
        alloc::boxed::Box::new((**self).deep_copy())
    }
}
