use super::*;
use cel_value::AttributeQualifier;
use pretty_assertions::assert_eq;

fn patterns() -> Vec<AttributePattern> {
    vec![
        AttributePattern::new("request").field("auth"),
        AttributePattern::new("items").wildcard().field("price"),
    ]
}

#[test]
fn test_check_for_unknown_full_and_partial() {
    let patterns = patterns();
    let utility = AttributeUtility::new(&patterns);

    let auth = AttributeTrail::new("request").step(AttributeQualifier::field("auth"));
    assert!(utility.check_for_unknown(&auth, false));

    let below = auth.step(AttributeQualifier::field("claims"));
    assert!(utility.check_for_unknown(&below, false));

    let request = AttributeTrail::new("request");
    assert!(!utility.check_for_unknown(&request, false));
    assert!(utility.check_for_unknown(&request, true));

    let other = AttributeTrail::new("request").step(AttributeQualifier::field("path"));
    assert!(!utility.check_for_unknown(&other, true));
    assert!(!utility.check_for_unknown(&AttributeTrail::default(), true));
}

#[test]
fn test_wildcard_pattern_matches_any_index() {
    let patterns = patterns();
    let utility = AttributeUtility::new(&patterns);
    let price = AttributeTrail::new("items")
        .step(AttributeQualifier::Int(3))
        .step(AttributeQualifier::field("price"));
    assert!(utility.check_for_unknown(&price, false));

    let element = AttributeTrail::new("items").step(AttributeQualifier::Int(3));
    assert!(!utility.check_for_unknown(&element, false));
    assert!(utility.check_for_unknown(&element, true));
}

#[test]
fn test_identify_and_merge_unknowns() {
    let patterns = patterns();
    let utility = AttributeUtility::new(&patterns);
    let existing = UnknownValue::from_attribute(Attribute::new("x"));
    let values = [Value::Int(1), Value::Unknown(existing), Value::Int(2)];
    let trails = [
        AttributeTrail::new("request").step(AttributeQualifier::field("auth")),
        AttributeTrail::default(),
        AttributeTrail::new("request"),
    ];

    let merged = utility
        .identify_and_merge_unknowns(&values, &trails, false)
        .unwrap();
    let rendered: Vec<String> = merged
        .attribute_set()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered, vec!["request.auth".to_owned(), "x".to_owned()]);

    let with_partial = utility
        .identify_and_merge_unknowns(&values, &trails, true)
        .unwrap();
    assert_eq!(with_partial.attribute_set().len(), 3);
}

#[test]
fn test_no_unknowns_yields_none() {
    let patterns = patterns();
    let utility = AttributeUtility::new(&patterns);
    let values = [Value::Int(1), Value::Bool(true)];
    let trails = [AttributeTrail::new("a"), AttributeTrail::default()];
    assert!(utility
        .identify_and_merge_unknowns(&values, &trails, true)
        .is_none());
    assert!(utility.merge_unknowns(&values).is_none());
}

#[test]
fn test_merge_unknowns_ignores_trails() {
    let utility = AttributeUtility::new(&[]);
    let a = UnknownValue::from_attribute(Attribute::new("a"));
    let b = UnknownValue::from_attribute(Attribute::new("b"));
    let values = [Value::Unknown(a), Value::Null, Value::Unknown(b)];
    let merged = utility.merge_unknowns(&values).unwrap();
    assert_eq!(merged.attribute_set().len(), 2);
    assert!(merged.attribute_set().contains(&Attribute::new("b")));
}

#[test]
fn test_create_unknown_set() {
    let utility = AttributeUtility::new(&[]);
    let unknown = utility.create_unknown_set(Attribute::new("z"));
    assert!(unknown.attribute_set().contains(&Attribute::new("z")));
    assert!(unknown.function_result_set().is_empty());
}
