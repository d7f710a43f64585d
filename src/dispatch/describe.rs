//! `Describe` impls for std types, and the erased container copiers they
//! install.
//!
//! Each copier downcasts its source, copies every element through the
//! element strategy it was handed, and emits a freshly allocated container
//! of the same concrete type.

use core::any::Any;
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use super::descriptor::{Describe, TypeDescriptor, TypeRef};
use super::strategy::{copy_field, element, emit, source, Strategy};
use crate::contract::Shape;
use crate::error::CopyError;

// =============================================================================
// Value Types
// =============================================================================

macro_rules! describe_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::value::<$ty>()
                }
            }
        )*
    };
}

describe_values!(
    i8, i16, i32, i64, i128, isize,
    u8, u16, u32, u64, u128, usize,
    f32, f64,
    bool, char, (),
    &'static str,
    String,
    std::path::PathBuf,
    core::time::Duration,
    core::cmp::Ordering,
);

describe_values!(
    core::num::NonZeroI8, core::num::NonZeroI16, core::num::NonZeroI32,
    core::num::NonZeroI64, core::num::NonZeroI128, core::num::NonZeroIsize,
    core::num::NonZeroU8, core::num::NonZeroU16, core::num::NonZeroU32,
    core::num::NonZeroU64, core::num::NonZeroU128, core::num::NonZeroUsize,
);

// =============================================================================
// Opaque Types
// =============================================================================

// Lock-guarded state has no value semantics and no copy operation.
impl<T: Send + 'static> Describe for Mutex<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::opaque::<Self>()
    }
}

impl<T: Send + Sync + 'static> Describe for RwLock<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::opaque::<Self>()
    }
}

// =============================================================================
// Optional
// =============================================================================

impl<T: Describe> Describe for Option<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::optional::<Self>(TypeRef::of::<T>(), copy_option::<T>)
    }
}

fn copy_option<T: 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let copy = match source::<Option<T>>(src)? {
        None => None,
        Some(value) => Some(element::<Option<T>>(elements, 0)?.copy_typed(value)?),
    };
    emit(dst, copy)
}

// =============================================================================
// Composites: Box and Tuples
// =============================================================================

impl<T: Describe> Describe for Box<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::boxed::<Self>(TypeRef::of::<T>(), copy_box::<T>)
    }
}

fn copy_box<T: 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
    fields: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let src = source::<Box<T>>(src)?;
    let copy = copy_field::<T>(fields, 0, &**src)?;
    emit(dst, Box::new(copy))
}

macro_rules! describe_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Describe),+> Describe for ($($name,)+) {
            fn describe() -> TypeDescriptor {
                fn copy<$($name: 'static),+>(
                    src: &dyn Any,
                    dst: &mut dyn Any,
                    fields: &[Arc<Strategy>],
                ) -> Result<(), CopyError> {
                    let src = source::<($($name,)+)>(src)?;
                    let copy = ($(copy_field::<$name>(fields, $idx, &src.$idx)?,)+);
                    emit(dst, copy)
                }

                TypeDescriptor::composite::<Self>(vec![$(TypeRef::of::<$name>()),+], copy::<$($name),+>)
            }
        }
    };
}

describe_tuple!(A: 0);
describe_tuple!(A: 0, B: 1);
describe_tuple!(A: 0, B: 1, C: 2);
describe_tuple!(A: 0, B: 1, C: 2, D: 3);
describe_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
describe_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
describe_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
describe_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);

// =============================================================================
// FixedSequence
// =============================================================================

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(Shape::FixedSequence, vec![TypeRef::of::<T>()], copy_array::<T, N>)
    }
}

impl<T: Describe> Describe for Box<[T]> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(Shape::FixedSequence, vec![TypeRef::of::<T>()], copy_boxed_slice::<T>)
    }
}

/// Copy a slice element-wise through `strategy`.
pub(crate) fn copy_elements<T: 'static>(src: &[T], strategy: &Strategy) -> Result<Vec<T>, CopyError> {
    let mut out = Vec::with_capacity(src.len());
    for item in src {
        out.push(strategy.copy_typed(item)?);
    }
    Ok(out)
}

fn copy_array<T: 'static, const N: usize>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let src = source::<[T; N]>(src)?;
    let copied = copy_elements(src, element::<[T; N]>(elements, 0)?)?;
    let array = <[T; N]>::try_from(copied)
        .map_err(|_| CopyError::TypeMismatch { expected: core::any::type_name::<[T; N]>() })?;
    emit(dst, array)
}

fn copy_boxed_slice<T: 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let src = source::<Box<[T]>>(src)?;
    let copied = copy_elements(src, element::<Box<[T]>>(elements, 0)?)?;
    emit(dst, copied.into_boxed_slice())
}

// =============================================================================
// GrowableSequence
// =============================================================================

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(Shape::GrowableSequence, vec![TypeRef::of::<T>()], copy_vec::<T>)
    }
}

impl<T: Describe> Describe for VecDeque<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(Shape::GrowableSequence, vec![TypeRef::of::<T>()], copy_deque::<T>)
    }
}

fn copy_vec<T: 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let src = source::<Vec<T>>(src)?;
    let copied = copy_elements(src, element::<Vec<T>>(elements, 0)?)?;
    emit(dst, copied)
}

fn copy_deque<T: 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let src = source::<VecDeque<T>>(src)?;
    let strategy = element::<VecDeque<T>>(elements, 0)?;
    let mut out = VecDeque::with_capacity(src.len());
    for item in src {
        out.push_back(strategy.copy_typed(item)?);
    }
    emit(dst, out)
}

// =============================================================================
// UniqueSet
// =============================================================================

impl<T, S> Describe for HashSet<T, S>
where
    T: Describe + Eq + Hash,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(Shape::UniqueSet, vec![TypeRef::of::<T>()], copy_hash_set::<T, S>)
    }
}

impl<T: Describe + Ord> Describe for BTreeSet<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(Shape::UniqueSet, vec![TypeRef::of::<T>()], copy_btree_set::<T>)
    }
}

fn copy_hash_set<T, S>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError>
where
    T: Eq + Hash + 'static,
    S: BuildHasher + Clone + 'static,
{
    let src = source::<HashSet<T, S>>(src)?;
    let strategy = element::<HashSet<T, S>>(elements, 0)?;
    let mut out = HashSet::with_capacity_and_hasher(src.len(), src.hasher().clone());
    for item in src {
        out.insert(strategy.copy_typed(item)?);
    }
    emit(dst, out)
}

fn copy_btree_set<T: Ord + 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let src = source::<BTreeSet<T>>(src)?;
    let strategy = element::<BTreeSet<T>>(elements, 0)?;
    let mut out = BTreeSet::new();
    for item in src {
        out.insert(strategy.copy_typed(item)?);
    }
    emit(dst, out)
}

// =============================================================================
// Map
// =============================================================================

impl<K, V, S> Describe for HashMap<K, V, S>
where
    K: Describe + Eq + Hash,
    V: Describe,
    S: BuildHasher + Clone + Send + Sync + 'static,
{
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(
            Shape::Map,
            vec![TypeRef::of::<K>(), TypeRef::of::<V>()],
            copy_hash_map::<K, V, S>,
        )
    }
}

impl<K: Describe + Ord, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::container::<Self>(
            Shape::Map,
            vec![TypeRef::of::<K>(), TypeRef::of::<V>()],
            copy_btree_map::<K, V>,
        )
    }
}

fn copy_hash_map<K, V, S>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError>
where
    K: Eq + Hash + 'static,
    V: 'static,
    S: BuildHasher + Clone + 'static,
{
    let src = source::<HashMap<K, V, S>>(src)?;
    let keys = element::<HashMap<K, V, S>>(elements, 0)?;
    let values = element::<HashMap<K, V, S>>(elements, 1)?;
    let mut out = HashMap::with_capacity_and_hasher(src.len(), src.hasher().clone());
    for (key, value) in src {
        // Colliding copied keys: the later pair wins.
        out.insert(keys.copy_typed(key)?, values.copy_typed(value)?);
    }
    emit(dst, out)
}

fn copy_btree_map<K: Ord + 'static, V: 'static>(
    src: &dyn Any,
    dst: &mut dyn Any,
    elements: &[Arc<Strategy>],
) -> Result<(), CopyError> {
    let src = source::<BTreeMap<K, V>>(src)?;
    let keys = element::<BTreeMap<K, V>>(elements, 0)?;
    let values = element::<BTreeMap<K, V>>(elements, 1)?;
    let mut out = BTreeMap::new();
    for (key, value) in src {
        out.insert(keys.copy_typed(key)?, values.copy_typed(value)?);
    }
    emit(dst, out)
}
