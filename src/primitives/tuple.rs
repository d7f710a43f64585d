//! Tuples copy field-wise.

use crate::contract::{Copyable, Kind};

macro_rules! impl_tuple_copy {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Copyable),+> Copyable for ($($name,)+) {
            const KIND: Kind = if true $(&& $name::KIND.is_value())+ {
                Kind::Value
            } else {
                Kind::Delegated
            };

            #[inline]
            fn deep_copy(&self) -> Self {
                ($(self.$idx.deep_copy(),)+)
            }
        }
    };
}

impl_tuple_copy!(A: 0);
impl_tuple_copy!(A: 0, B: 1);
impl_tuple_copy!(A: 0, B: 1, C: 2);
impl_tuple_copy!(A: 0, B: 1, C: 2, D: 3);
impl_tuple_copy!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple_copy!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_tuple_copy!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_tuple_copy!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
