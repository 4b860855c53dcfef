use super::*;
use crate::attribute::Attribute;
use crate::errors::StatusCode;
use crate::kind::Locality;
use crate::memory::MemoryManagement;
use pretty_assertions::assert_eq;

#[test]
fn test_reference_counting_containers_are_counted() {
    let f = ValueFactory::reference_counting();
    assert_eq!(
        f.memory_manager().memory_management(),
        MemoryManagement::ReferenceCounting
    );
    let list = f.list(vec![f.string("a")]).unwrap();
    assert_eq!(list.locality(), Locality::ReferenceCounted);
    let map = f.map(vec![(f.string("k"), Value::Int(1))]).unwrap();
    assert_eq!(map.locality(), Locality::ReferenceCounted);
}

#[test]
fn test_pooling_containers_live_in_arena() {
    let arena = Bump::new();
    let f = ValueFactory::pooling(&arena);
    assert_eq!(f.memory_manager().memory_management(), MemoryManagement::Pooling);

    let list = f.list(vec![f.string("a"), Value::Int(2)]).unwrap();
    assert_eq!(list.locality(), Locality::ArenaAllocated);
    assert_eq!(list.debug_string(), "[\"a\", 2]");

    let s = f.string("view");
    assert!(matches!(s, Value::String(Buffer::View("view"))));
}

#[test]
fn test_pooling_adopts_counted_elements() {
    let arena = Bump::new();
    let pooled = ValueFactory::pooling(&arena);
    let counted = ValueFactory::new(
        MemoryManager::ReferenceCounting,
        Arc::clone(pooled.canonical_values()),
    );

    let inner = counted.list(vec![counted.string("x")]).unwrap();
    let shared = pooled.string_shared(Arc::from("shared"));
    let outer = pooled.list(vec![inner, shared]).unwrap();

    let elements: Vec<_> = outer.as_list().unwrap().iter().collect();
    assert_eq!(elements[0].locality(), Locality::ArenaAllocated);
    assert!(matches!(&elements[1], Value::String(s) if s.is_view()));
    let nested: Vec<_> = elements[0].as_list().unwrap().iter().collect();
    assert!(matches!(&nested[0], Value::String(s) if s.is_view()));
    assert_eq!(outer.debug_string(), "[[\"x\"], \"shared\"]");
}

#[test]
fn test_pooling_rejects_errors_and_unknowns() {
    let arena = Bump::new();
    let f = ValueFactory::pooling(&arena);
    let error = f.error(errors::no_such_field("a"));
    let rejected = f.list(vec![error]).unwrap_err();
    assert_eq!(rejected.code(), StatusCode::InvalidArgument);

    let unknown = f.unknown(UnknownValue::from_attribute(Attribute::new("x")));
    assert!(f.map(vec![(Value::Int(1), unknown)]).is_err());
    assert!(f.list(vec![f.list_builder()]).is_err());
}

#[test]
fn test_adopt_is_identity_under_reference_counting() {
    let f = ValueFactory::reference_counting();
    let error = f.error(errors::no_such_field("a"));
    assert!(f.adopt(error.clone()).unwrap().equals(&error));
}

#[test]
fn test_map_rejects_invalid_and_repeated_keys() {
    let f = ValueFactory::reference_counting();
    let invalid = f.map(vec![(Value::Double(1.0), Value::Null)]).unwrap_err();
    assert_eq!(invalid.message(), "Invalid map key type: 'double'");

    let repeated = f
        .map(vec![(f.string("a"), Value::Int(1)), (f.string("a"), Value::Int(2))])
        .unwrap_err();
    assert_eq!(repeated.message(), "Failed with repeated key : \"a\"");
}

#[test]
fn test_map_lookup() {
    for pooled in [false, true] {
        let arena = Bump::new();
        let f = if pooled {
            ValueFactory::pooling(&arena)
        } else {
            ValueFactory::new(MemoryManager::ReferenceCounting, Arc::new(CanonicalValues::new()))
        };
        let map = f
            .map(vec![
                (f.string("foo"), Value::Int(1)),
                (Value::Int(7), Value::Bool(true)),
            ])
            .unwrap();
        let map = map.as_map().unwrap();
        assert_eq!(map.size(), 2);
        assert_eq!(map.get(&f.string("foo")).unwrap(), Some(Value::Int(1)));
        assert_eq!(map.get(&Value::Int(7)).unwrap(), Some(Value::Bool(true)));
        assert_eq!(map.get(&Value::Int(8)).unwrap(), None);
        assert!(map.has(&Value::string_view("foo")).unwrap());
        assert!(map.get(&Value::Null).is_err());

        let keys = map.list_keys(&f).unwrap();
        assert_eq!(keys.debug_string(), "[7, \"foo\"]");
    }
}

#[test]
fn test_struct_fields() {
    let arena = Bump::new();
    let f = ValueFactory::pooling(&arena);
    let point = f
        .struct_value("test.Point", vec![("x", Value::Int(1))])
        .unwrap();
    let s = point.as_struct().unwrap();
    assert_eq!(s.type_name(), "test.Point");
    assert_eq!(s.get_field("x"), Some(Value::Int(1)));
    assert!(!s.has_field("y"));
    assert_eq!(point.locality(), Locality::ArenaAllocated);
}

#[test]
fn test_list_builder_builds_once() {
    let f = ValueFactory::reference_counting();
    let builder = f.list_builder();
    let mutable = builder.as_opaque().unwrap().as_list_builder().unwrap();
    mutable.append(Value::Int(1));
    mutable.append(Value::Int(2));
    assert_eq!(mutable.len(), 2);
    assert_eq!(builder.debug_string(), "[1, 2]");

    let list = mutable.build(&f).unwrap();
    assert_eq!(list.debug_string(), "[1, 2]");
    assert!(mutable.is_empty());
}

#[test]
fn test_duration_and_timestamp_ranges() {
    let f = ValueFactory::reference_counting();
    assert!(f.duration(Duration::seconds(MAX_DURATION_SECONDS)).is_ok());
    let too_long = f.duration(Duration::seconds(MAX_DURATION_SECONDS + 1)).unwrap_err();
    assert_eq!(too_long.code(), StatusCode::OutOfRange);

    let epoch = Timestamp::from_timestamp(0, 0).unwrap();
    assert!(f.timestamp(epoch).is_ok());
    let far_future = Timestamp::from_timestamp(253_402_300_800, 0).unwrap();
    assert!(f.timestamp(far_future).is_err());
}

#[test]
fn test_canonical_empty_values_are_shared() {
    let f = ValueFactory::reference_counting();
    let (Value::String(Buffer::Shared(a)), Value::String(Buffer::Shared(b))) =
        (f.string(""), f.string(""))
    else {
        panic!("expected shared strings");
    };
    assert!(Arc::ptr_eq(&a, &b));
}
