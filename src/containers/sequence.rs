//! Ordered shapes: index-for-index correspondence with the source.

use crate::contract::{Copyable, Kind, Shape};

impl<T: Copyable, const N: usize> Copyable for [T; N] {
    const KIND: Kind = Kind::Container(Shape::FixedSequence);

    #[inline]
    fn deep_copy(&self) -> Self {
        core::array::from_fn(|i| self[i].deep_copy())
    }
}

#[cfg(feature = "alloc")]
mod heap {
    use super::*;
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;

    /// Copy a slice into a freshly allocated vector of the same length.
    #[inline]
    pub(crate) fn copy_slice<T: Copyable>(src: &[T]) -> Vec<T> {
        let mut out = Vec::with_capacity(src.len());
        out.extend(src.iter().map(T::deep_copy));
        out
    }

    impl<T: Copyable> Copyable for Box<[T]> {
        const KIND: Kind = Kind::Container(Shape::FixedSequence);

        fn deep_copy(&self) -> Self {
            copy_slice(self).into_boxed_slice()
        }
    }

    impl<T: Copyable> Copyable for Vec<T> {
        const KIND: Kind = Kind::Container(Shape::GrowableSequence);

        fn deep_copy(&self) -> Self {
            copy_slice(self)
        }
    }

    impl<T: Copyable> Copyable for VecDeque<T> {
        const KIND: Kind = Kind::Container(Shape::GrowableSequence);

        fn deep_copy(&self) -> Self {
            let mut out = VecDeque::with_capacity(self.len());
            out.extend(self.iter().map(T::deep_copy));
            out
        }
    }
}

#[cfg(feature = "parallel")]
pub(crate) use heap::copy_slice;
