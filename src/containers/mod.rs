//! # Layer 1: Container Copiers
//!
//! One `Copyable` impl per concrete container, grouped by shape. Element
//! copies go back through `Copyable`, so nesting recurses structurally and
//! every level is freshly allocated.
//!
//! ```text
//! containers/
//! ├── sequence.rs - FixedSequence ([T; N], Box<[T]>) and GrowableSequence (Vec, VecDeque)
//! ├── set.rs      - UniqueSet (HashSet, BTreeSet)
//! ├── map.rs      - Map (HashMap, BTreeMap)
//! └── wrapper.rs  - Option (absent propagation) and Box (indirection)
//! ```
//!
//! Unordered shapes preserve membership only. When two distinct source
//! elements (or keys) produce equal copies, the set keeps one and the map
//! keeps the later value; neither case is an error.

mod sequence;
mod wrapper;

#[cfg(feature = "alloc")]
mod map;
#[cfg(feature = "alloc")]
mod set;

#[cfg(feature = "parallel")]
pub(crate) use sequence::copy_slice;
