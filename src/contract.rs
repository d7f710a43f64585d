//! # Layer 0: Capability Contract
//!
//! A type opts in to deep copying by implementing [`Copyable`]. The trait
//! also carries the type's static classification ([`Kind`]), so generic
//! code can ask how `T` is copied without inspecting a value.
//!
//! ```text
//! Kind::Value            -> plain copy of an immutable value
//! Kind::Delegated        -> the type's own deep_copy()
//! Kind::Container(Shape) -> structural recursion over elements
//! ```
//!
//! Types that implement none of these cannot be handed to [`deep_copy`]:
//!
//! ```compile_fail
//! struct Handle(std::sync::Mutex<u8>);
//!
//! let handles = vec![Handle(std::sync::Mutex::new(0))];
//! let _ = tola_copy::deep_copy(&handles);
//! ```

/// The recognized container shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Fixed length, order preserving (`[T; N]`, `Box<[T]>`).
    FixedSequence,
    /// Variable length, order preserving (`Vec<T>`, `VecDeque<T>`).
    GrowableSequence,
    /// No duplicate elements (`HashSet<T>`, `BTreeSet<T>`).
    UniqueSet,
    /// Unique keys mapped to values (`HashMap<K, V>`, `BTreeMap<K, V>`).
    Map,
}

impl Shape {
    /// Whether copies must preserve element order.
    pub const fn is_ordered(self) -> bool {
        matches!(self, Shape::FixedSequence | Shape::GrowableSequence)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Shape::FixedSequence => "fixed sequence",
            Shape::GrowableSequence => "growable sequence",
            Shape::UniqueSet => "unique set",
            Shape::Map => "map",
        }
    }
}

/// How instances of a type are copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Value,
    Delegated,
    Container(Shape),
}

impl Kind {
    pub const fn is_value(self) -> bool {
        matches!(self, Kind::Value)
    }

    pub const fn is_container(self) -> bool {
        matches!(self, Kind::Container(_))
    }

    pub const fn shape(self) -> Option<Shape> {
        match self {
            Kind::Container(shape) => Some(shape),
            _ => None,
        }
    }
}

/// The capability contract: "I know how to copy myself".
///
/// `deep_copy` takes no arguments, has no side effects, and returns a new
/// instance whose observable state equals `self` at the moment of the call.
/// The result shares no mutable state with `self`.
///
/// # Usage
///
/// ```
/// use tola_copy::{Copyable, Kind};
///
/// #[derive(Copyable, Debug, PartialEq)]
/// struct Account {
///     owner: String,
///     history: Vec<i64>,
/// }
///
/// let a = Account { owner: "ada".into(), history: vec![10, -3] };
/// let b = a.deep_copy();
/// assert_eq!(a, b);
/// assert_eq!(<Account as Copyable>::KIND, Kind::Delegated);
/// ```
pub trait Copyable: Sized {
    /// Static classification. Types implementing the contract directly are
    /// delegated copies unless they say otherwise.
    const KIND: Kind = Kind::Delegated;

    /// Produce an independent copy of `self`.
    fn deep_copy(&self) -> Self;
}

/// Deep copy any [`Copyable`] value.
///
/// Works uniformly for scalars, user types, and arbitrarily nested
/// containers of them.
///
/// ```
/// let grid = vec![vec![1, 2, 3], vec![4, 5, 6]];
/// let mut copy = tola_copy::deep_copy(&grid);
/// copy[0][0] = 100;
/// assert_eq!(grid[0][0], 1);
/// ```
#[inline]
pub fn deep_copy<T: Copyable>(value: &T) -> T {
    value.deep_copy()
}
