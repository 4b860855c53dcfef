use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_slots_start_empty() {
    let slots = ComprehensionSlots::new(4);
    assert_eq!(slots.size(), 4);
    for index in 0..4 {
        assert!(slots.get(index).is_none());
    }
}

#[test]
fn test_set_get_clear() {
    let mut slots = ComprehensionSlots::new(2);
    slots.set(ACCU_OFFSET, Value::Int(7), AttributeTrail::new("accu"));

    let slot = slots.get(ACCU_OFFSET).unwrap();
    assert_eq!(slot.value, Value::Int(7));
    assert_eq!(slot.attribute, AttributeTrail::new("accu"));
    assert!(slots.get(ITER_OFFSET).is_none());

    slots.clear(ACCU_OFFSET);
    assert!(slots.get(ACCU_OFFSET).is_none());
}

#[test]
fn test_set_overwrites() {
    let mut slots = ComprehensionSlots::new(2);
    slots.set(ITER_OFFSET, Value::Int(1), AttributeTrail::default());
    slots.set(ITER_OFFSET, Value::Int(2), AttributeTrail::default());
    assert_eq!(slots.get(ITER_OFFSET).unwrap().value, Value::Int(2));
}

#[test]
#[should_panic(expected = "comprehension slot index out of range")]
fn test_out_of_range_index_panics() {
    let mut slots = ComprehensionSlots::new(2);
    slots.set(2, Value::Null, AttributeTrail::default());
}
