//! Map shape.
//!
//! Keys and values are copied independently. If two distinct source keys
//! copy to equal keys, the later insertion silently replaces the earlier
//! one (last write wins).

use alloc::collections::BTreeMap;

use crate::contract::{Copyable, Kind, Shape};

impl<K: Copyable + Ord, V: Copyable> Copyable for BTreeMap<K, V> {
    const KIND: Kind = Kind::Container(Shape::Map);

    fn deep_copy(&self) -> Self {
        let mut out = BTreeMap::new();
        for (key, value) in self {
            out.insert(key.deep_copy(), value.deep_copy());
        }
        out
    }
}

#[cfg(feature = "std")]
impl<K, V, S> Copyable for std::collections::HashMap<K, V, S>
where
    K: Copyable + Eq + core::hash::Hash,
    V: Copyable,
    S: core::hash::BuildHasher + Clone,
{
    const KIND: Kind = Kind::Container(Shape::Map);

    fn deep_copy(&self) -> Self {
        let mut out = Self::with_capacity_and_hasher(self.len(), self.hasher().clone());
        for (key, value) in self {
            out.insert(key.deep_copy(), value.deep_copy());
        }
        out
    }
}
