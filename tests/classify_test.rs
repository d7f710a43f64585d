//! Static classification tests: `Copyable::KIND`, `classify!`, `is_copyable!`.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use tola_copy::prelude::*;

// ============================================================================
// Helper Macros
// ============================================================================

/// Assert the static classification of a concrete type.
macro_rules! assert_kind {
    ($ty:ty => $expected:expr) => {
        assert_eq!(
            classify!($ty),
            $expected,
            "unexpected classification for `{}`",
            stringify!($ty)
        );
    };
}

#[derive(Copyable)]
struct Wrapper {
    _inner: Vec<u8>,
}

#[derive(Clone, Copy)]
struct Coord {
    _x: f32,
}

struct Handle {
    _lock: Mutex<u8>,
}

// ============================================================================
// Values
// ============================================================================

#[test]
fn test_scalars_and_strings_are_values() {
    assert_kind!(u8 => Some(Kind::Value));
    assert_kind!(i128 => Some(Kind::Value));
    assert_kind!(f64 => Some(Kind::Value));
    assert_kind!(bool => Some(Kind::Value));
    assert_kind!(&'static str => Some(Kind::Value));
    assert_kind!(String => Some(Kind::Value));
    assert_kind!(std::time::Duration => Some(Kind::Value));
}

#[test]
fn test_tuples_are_values_only_when_every_field_is() {
    assert_kind!((u8, String) => Some(Kind::Value));
    assert_kind!((u8, Vec<u8>) => Some(Kind::Delegated));
}

#[test]
fn test_copy_type_without_contract_is_value() {
    assert!(!is_copyable!(Coord));
    assert_kind!(Coord => Some(Kind::Value));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn test_container_shapes() {
    assert_kind!([u8; 16] => Some(Kind::Container(Shape::FixedSequence)));
    assert_kind!(Box<[String]> => Some(Kind::Container(Shape::FixedSequence)));
    assert_kind!(Vec<Vec<u8>> => Some(Kind::Container(Shape::GrowableSequence)));
    assert_kind!(VecDeque<char> => Some(Kind::Container(Shape::GrowableSequence)));
    assert_kind!(HashSet<u32> => Some(Kind::Container(Shape::UniqueSet)));
    assert_kind!(BTreeSet<u32> => Some(Kind::Container(Shape::UniqueSet)));
    assert_kind!(HashMap<String, u32> => Some(Kind::Container(Shape::Map)));
    assert_kind!(BTreeMap<u8, Vec<u8>> => Some(Kind::Container(Shape::Map)));
}

#[test]
fn test_wrappers_are_transparent() {
    assert_kind!(Option<u8> => Some(Kind::Value));
    assert_kind!(Option<Vec<u8>> => Some(Kind::Container(Shape::GrowableSequence)));
    assert_kind!(Box<HashSet<u8>> => Some(Kind::Container(Shape::UniqueSet)));
}

#[test]
fn test_shape_queries() {
    assert!(Shape::FixedSequence.is_ordered());
    assert!(Shape::GrowableSequence.is_ordered());
    assert!(!Shape::UniqueSet.is_ordered());
    assert!(!Shape::Map.is_ordered());

    let kind = <Vec<u8> as Copyable>::KIND;
    assert!(kind.is_container());
    assert_eq!(kind.shape(), Some(Shape::GrowableSequence));
    assert_eq!(Kind::Value.shape(), None);
}

// ============================================================================
// User Types
// ============================================================================

#[test]
fn test_declared_contract_wins_over_structure() {
    assert!(is_copyable!(Wrapper));
    assert_kind!(Wrapper => Some(Kind::Delegated));
}

#[test]
fn test_unclassifiable_types() {
    assert!(!is_copyable!(Handle));
    assert_kind!(Handle => None);
    assert_kind!(Mutex<u8> => None);
    assert_kind!(Cell<u8> => None);
}

#[test]
fn test_classification_is_const() {
    const ELEMENT: Option<Kind> = classify!(Vec<String>);
    const OPAQUE: Option<Kind> = classify!(Handle);

    assert_eq!(ELEMENT, Some(Kind::Container(Shape::GrowableSequence)));
    assert_eq!(OPAQUE, None);
}
