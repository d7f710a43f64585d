//! Dynamic Dispatch Tests
//!
//! Test organization:
//! - descriptors built by `Describe`
//! - classifier decision order
//! - every erased copier, including colliding set and map copies
//! - tuples, boxes and non-zero integers
//! - dispatcher caching, concurrency, and errors

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::num::{NonZeroI8, NonZeroU128};
use std::sync::{Arc, Mutex};
use std::thread;

use pretty_assertions::assert_eq;
use tola_copy::dispatch::{classify, ContainerCopyFn, DispatchConfig, Strategy, TypeDescriptor, TypeRef};
use tola_copy::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A user type that also looks like a container.
#[derive(Copyable, Debug, PartialEq)]
#[copyable(describe)]
struct Bag {
    items: Vec<u8>,
}

/// Copies keep `key` and reset `tag`, so distinct sources can collapse.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct Tagged {
    key: u8,
    tag: u8,
}

impl Copyable for Tagged {
    fn deep_copy(&self) -> Self {
        Tagged { key: self.key, tag: 0 }
    }
}

impl Describe for Tagged {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::capability::<Self>()
    }
}

struct Sealed;

impl Describe for Sealed {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::opaque::<Self>()
    }
}

fn never_copy(_: &dyn Any, _: &mut dyn Any, _: &[Arc<Strategy>]) -> Result<(), CopyError> {
    Ok(())
}

// ============================================================================
// Descriptors
// ============================================================================

#[test]
fn test_container_descriptors() {
    let vec = <Vec<u8> as Describe>::describe();
    assert_eq!(vec.shape(), Some(Shape::GrowableSequence));
    assert_eq!(vec.elements().len(), 1);
    assert_eq!(vec.elements()[0].name(), "u8");
    assert!(!vec.is_value());
    assert!(!vec.implements_capability());

    let map = <HashMap<String, u32> as Describe>::describe();
    assert_eq!(map.shape(), Some(Shape::Map));
    let names: Vec<_> = map.elements().iter().map(TypeRef::name).collect();
    assert_eq!(names, vec!["alloc::string::String", "u32"]);

    let set = <BTreeSet<i8> as Describe>::describe();
    assert_eq!(set.shape(), Some(Shape::UniqueSet));
}

#[test]
fn test_optional_and_value_descriptors() {
    let optional = <Option<u16> as Describe>::describe();
    assert_eq!(optional.optional_of().map(TypeRef::name), Some("u16"));
    assert_eq!(optional.shape(), None);

    assert!(<char as Describe>::describe().is_value());
    assert!(<Bag as Describe>::describe().implements_capability());
}

// ============================================================================
// Classifier
// ============================================================================

#[test]
fn test_capability_takes_priority_over_container() {
    let copy: ContainerCopyFn = never_copy;
    let descriptor = TypeDescriptor::container::<Bag>(Shape::GrowableSequence, vec![TypeRef::of::<u8>()], copy)
        .with_capability::<Bag>();

    let strategy = classify(&descriptor, |_| panic!("elements must not be resolved")).unwrap();
    assert_eq!(strategy.kind(), Kind::Delegated);
}

#[test]
fn test_capability_takes_priority_over_value() {
    let descriptor = TypeDescriptor::value::<u8>().with_capability::<u8>();
    let strategy = classify(&descriptor, |_| panic!("no elements")).unwrap();
    assert!(matches!(strategy, Strategy::Delegated { .. }));
}

#[test]
fn test_opaque_descriptor_is_unclassifiable() {
    let err = classify(&TypeDescriptor::opaque::<Sealed>(), |_| panic!("no elements")).unwrap_err();
    assert!(matches!(err, CopyError::Unclassifiable { .. }));
}

// ============================================================================
// Dispatcher
// ============================================================================

#[test]
fn test_dispatcher_copies_nested_grid() {
    init_tracing();
    let dispatcher = Dispatcher::new();
    let input = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];

    let mut copy = dispatcher.deep_copy(&input).unwrap();
    assert_eq!(copy, input);

    copy[0][0] = -1;
    assert_eq!(input[0], vec![1, 2, 3]);
}

#[test]
fn test_dispatcher_preserves_none_slots() {
    let dispatcher = Dispatcher::new();
    let input = vec![Some(String::from("a")), None, Some(String::from("c"))];

    let copy = dispatcher.deep_copy(&input).unwrap();
    assert_eq!(copy, input);
    assert!(copy[1].is_none());
}

#[test]
fn test_dispatcher_copies_maps_and_sets() {
    let dispatcher = Dispatcher::new();

    let mut map: HashMap<String, Vec<Option<u32>>> = HashMap::new();
    map.insert("k".into(), vec![Some(1), None]);
    assert_eq!(dispatcher.deep_copy(&map).unwrap(), map);

    let arrays: [BTreeSet<i32>; 2] = [BTreeSet::from([1, 2]), BTreeSet::new()];
    assert_eq!(dispatcher.deep_copy(&arrays).unwrap(), arrays);
}

#[test]
fn test_repeated_resolution_is_a_cache_hit() {
    let dispatcher = Dispatcher::new();
    let input = vec![1u64, 2, 3];

    let first = dispatcher.deep_copy(&input).unwrap();
    let after_first = dispatcher.stats();
    let second = dispatcher.deep_copy(&input).unwrap();
    let after_second = dispatcher.stats();

    assert_eq!(first, second);
    assert_eq!(after_first.misses, 2);
    assert_eq!(after_second.misses, 2);
    assert_eq!(after_second.hits, after_first.hits + 1);
    assert_eq!(after_second.entries, 2);
}

#[test]
fn test_inner_strategy_is_shared() {
    let dispatcher = Dispatcher::new();
    let outer = dispatcher.strategy_for::<Vec<Vec<u8>>>().unwrap();
    let inner = dispatcher.strategy_for::<Vec<u8>>().unwrap();

    assert!(Arc::ptr_eq(&outer.elements()[0], &inner));
}

#[test]
fn test_concurrent_resolution_publishes_one_entry() {
    type Nested = HashMap<String, Vec<Option<u32>>>;

    let dispatcher = Dispatcher::new();
    let strategies: Vec<Arc<Strategy>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| dispatcher.strategy_for::<Nested>().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for strategy in &strategies[1..] {
        assert!(Arc::ptr_eq(strategy, &strategies[0]));
    }
    // Nested, String, Vec<Option<u32>>, Option<u32>, u32
    assert_eq!(dispatcher.len(), 5);
}

#[test]
fn test_unclassifiable_element_names_the_type() {
    let dispatcher = Dispatcher::new();
    let input = vec![Mutex::new(1u8)];

    let err = dispatcher.deep_copy(&input).unwrap_err();
    match &err {
        CopyError::Unclassifiable { type_name } => assert!(type_name.contains("Mutex<u8>")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("Mutex<u8>"));
    assert!(dispatcher.is_empty());

    // Deterministic: the same failure on every attempt.
    let again = dispatcher.deep_copy(&input).unwrap_err();
    assert_eq!(again.type_name(), err.type_name());
}

#[test]
fn test_mismatched_value_is_rejected() {
    let dispatcher = Dispatcher::new();
    let strategy = dispatcher.strategy_for::<Vec<u8>>().unwrap();

    let err = strategy.copy_typed(&vec![1u16]).unwrap_err();
    assert!(matches!(err, CopyError::TypeMismatch { .. }));
}

#[test]
fn test_depth_limit_is_configurable() {
    let config = DispatchConfig { max_depth: 2 };
    let shallow = Dispatcher::with_config(config.clone());
    assert!(shallow.strategy_for::<Vec<Vec<u8>>>().is_ok());

    let fresh = Dispatcher::with_config(config);
    let err = fresh.strategy_for::<Vec<Vec<Vec<Vec<u8>>>>>().unwrap_err();
    assert!(matches!(err, CopyError::NestingTooDeep { limit: 2, .. }));
}

#[test]
fn test_clear_keeps_handed_out_strategies() {
    let dispatcher = Dispatcher::new();
    let strategy = dispatcher.strategy_for::<Vec<String>>().unwrap();

    dispatcher.clear();
    assert!(dispatcher.is_empty());
    assert!(!dispatcher.contains::<Vec<String>>());

    let copy = strategy.copy_typed(&vec![String::from("x")]).unwrap();
    assert_eq!(copy, vec![String::from("x")]);
}

#[test]
fn test_deep_copy_slice() {
    let dispatcher = Dispatcher::new();
    let copy = dispatcher.deep_copy_slice(&[Bag { items: vec![1] }, Bag { items: vec![] }]).unwrap();
    assert_eq!(copy.len(), 2);
    assert_eq!(copy[0], Bag { items: vec![1] });
}

// ============================================================================
// Erased Container Copiers
// ============================================================================

#[test]
fn test_dispatcher_copies_deque_in_order() {
    let dispatcher = Dispatcher::new();
    let mut input: VecDeque<String> = VecDeque::new();
    input.push_back("b".into());
    input.push_front("a".into());
    input.push_back("c".into());

    let copy = dispatcher.deep_copy(&input).unwrap();
    assert_eq!(copy.iter().map(String::as_str).collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(dispatcher.strategy_for::<VecDeque<String>>().unwrap().kind(), Kind::Container(Shape::GrowableSequence));
}

#[test]
fn test_dispatcher_copies_boxed_slice() {
    let dispatcher = Dispatcher::new();
    let input: Box<[Vec<u8>]> = vec![vec![1], vec![], vec![2, 3]].into_boxed_slice();

    let copy = dispatcher.deep_copy(&input).unwrap();
    assert_eq!(copy, input);
    assert_ne!(copy.as_ptr(), input.as_ptr());
    assert_eq!(dispatcher.strategy_for::<Box<[Vec<u8>]>>().unwrap().kind(), Kind::Container(Shape::FixedSequence));
}

#[test]
fn test_dispatcher_set_cardinality_may_shrink() {
    let dispatcher = Dispatcher::new();
    let hashed: HashSet<Tagged> = [Tagged { key: 1, tag: 1 }, Tagged { key: 1, tag: 2 }, Tagged { key: 2, tag: 1 }]
        .into_iter()
        .collect();

    let copy = dispatcher.deep_copy(&hashed).unwrap();
    assert_eq!(hashed.len(), 3);
    assert_eq!(copy.len(), 2);
    assert!(copy.contains(&Tagged { key: 1, tag: 0 }));
    assert!(copy.contains(&Tagged { key: 2, tag: 0 }));

    let ordered: BTreeSet<Tagged> = [Tagged { key: 4, tag: 1 }, Tagged { key: 4, tag: 9 }].into_iter().collect();
    let copy = dispatcher.deep_copy(&ordered).unwrap();
    assert_eq!(copy.into_iter().collect::<Vec<_>>(), vec![Tagged { key: 4, tag: 0 }]);
}

#[test]
fn test_dispatcher_map_key_collision_last_write_wins() {
    let dispatcher = Dispatcher::new();

    let mut ordered = BTreeMap::new();
    ordered.insert(Tagged { key: 7, tag: 1 }, String::from("earlier"));
    ordered.insert(Tagged { key: 7, tag: 2 }, String::from("later"));

    let copy = dispatcher.deep_copy(&ordered).unwrap();
    assert_eq!(copy.len(), 1);
    assert_eq!(copy[&Tagged { key: 7, tag: 0 }], "later");

    let mut hashed = HashMap::new();
    hashed.insert(Tagged { key: 3, tag: 1 }, 10u32);
    hashed.insert(Tagged { key: 3, tag: 2 }, 20u32);

    let copy = dispatcher.deep_copy(&hashed).unwrap();
    assert_eq!(copy.len(), 1);
    assert!(matches!(copy[&Tagged { key: 3, tag: 0 }], 10 | 20));
}

// ============================================================================
// Tuples, Boxes and Non-zero Integers
// ============================================================================

#[test]
fn test_dispatcher_copies_tuples() {
    let dispatcher = Dispatcher::new();
    let input = vec![(1u8, String::from("a")), (2u8, String::from("b"))];
    assert_eq!(dispatcher.deep_copy(&input).unwrap(), input);

    let nested = (vec![Some(1i32), None], Tagged { key: 5, tag: 5 }, 'x');
    let copy = dispatcher.deep_copy(&nested).unwrap();
    assert_eq!(copy.0, nested.0);
    assert_eq!(copy.1, Tagged { key: 5, tag: 0 });
    assert_eq!(copy.2, 'x');
}

#[test]
fn test_tuple_kind_matches_static_kind() {
    let dispatcher = Dispatcher::new();

    let values = dispatcher.strategy_for::<(u8, String)>().unwrap();
    assert_eq!(values.kind(), Kind::Value);
    assert_eq!(values.kind(), <(u8, String) as Copyable>::KIND);
    assert_eq!(values.elements().len(), 2);

    let mixed = dispatcher.strategy_for::<(u8, Vec<u8>)>().unwrap();
    assert_eq!(mixed.kind(), Kind::Delegated);
    assert_eq!(mixed.kind(), <(u8, Vec<u8>) as Copyable>::KIND);

    let descriptor = <(u8, Vec<u8>) as Describe>::describe();
    assert_eq!(descriptor.fields().len(), 2);
    assert_eq!(descriptor.shape(), None);
}

#[test]
fn test_dispatcher_copies_boxes() {
    let dispatcher = Dispatcher::new();
    let input: Box<Vec<String>> = Box::new(vec!["a".into(), "b".into()]);

    let mut copy = dispatcher.deep_copy(&input).unwrap();
    assert_eq!(copy, input);
    copy.push("c".into());
    assert_eq!(input.len(), 2);

    let strategy = dispatcher.strategy_for::<Box<Vec<String>>>().unwrap();
    assert_eq!(strategy.kind(), Kind::Container(Shape::GrowableSequence));
    assert_eq!(strategy.kind(), <Box<Vec<String>> as Copyable>::KIND);
}

#[test]
fn test_dispatcher_copies_non_zero_integers() {
    let dispatcher = Dispatcher::new();

    let wide: Vec<NonZeroU128> = [1, u128::MAX].into_iter().filter_map(NonZeroU128::new).collect();
    assert_eq!(dispatcher.deep_copy(&wide).unwrap(), wide);

    let narrow = [NonZeroI8::new(-3), None];
    assert_eq!(dispatcher.deep_copy(&narrow).unwrap(), narrow);
    assert_eq!(dispatcher.strategy_for::<NonZeroI8>().unwrap().kind(), Kind::Value);
}
