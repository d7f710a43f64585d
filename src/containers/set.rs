//! UniqueSet shape.
//!
//! Insertion is idempotent, so value-equal copies of distinct sources
//! collapse. Output cardinality may therefore be lower than the source's.

use alloc::collections::BTreeSet;

use crate::contract::{Copyable, Kind, Shape};

impl<T: Copyable + Ord> Copyable for BTreeSet<T> {
    const KIND: Kind = Kind::Container(Shape::UniqueSet);

    fn deep_copy(&self) -> Self {
        self.iter().map(T::deep_copy).collect()
    }
}

#[cfg(feature = "std")]
impl<T, S> Copyable for std::collections::HashSet<T, S>
where
    T: Copyable + Eq + core::hash::Hash,
    S: core::hash::BuildHasher + Clone,
{
    const KIND: Kind = Kind::Container(Shape::UniqueSet);

    fn deep_copy(&self) -> Self {
        let mut out = Self::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for element in self {
            out.insert(element.deep_copy());
        }
        out
    }
}
