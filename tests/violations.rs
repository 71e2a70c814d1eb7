// Collect-all mode: violation contents, ordering, and policy configuration

use conform::{
    Schema, ValidationConfig, ViolationKind, types, validate, validate_with, verify, verify_with,
};
use serde_json::{Value, json};

#[test]
fn collect_all_reports_every_problem() {
    let schema = Schema::object([
        ("a", Schema::of(types::int())),
        ("b", Schema::of(types::string())),
    ]);
    let data = json!({"a": "x", "c": 1});

    let violations = validate(&schema, &data);
    assert_eq!(violations.len(), 3);

    // schema keys are visited in order, then extraneous data keys
    assert!(matches!(violations[0].kind, ViolationKind::TypeMismatch { .. }));
    assert_eq!(violations[0].path.to_string(), "a");

    assert!(matches!(
        violations[1].kind,
        ViolationKind::MissingProperty { ref property } if property == "b"
    ));
    assert_eq!(violations[1].path.to_string(), "(root)");

    assert!(matches!(
        violations[2].kind,
        ViolationKind::ExtraneousProperty { ref property } if property == "c"
    ));
}

#[test]
fn early_exit_reports_nothing_past_the_first_problem() {
    let schema = Schema::object([
        ("a", Schema::of(types::int())),
        ("b", Schema::of(types::string())),
    ]);
    // verify only answers the boolean question
    assert!(!verify(&schema, &json!({"a": "x", "c": 1})));
}

#[test]
fn nested_paths_are_reported() {
    let schema = Schema::object([(
        "a",
        Schema::array(Schema::object([("b", Schema::of(types::int()))])),
    )]);
    let violations = validate(&schema, &json!({"a": [{"b": 1}, {"b": "x"}]}));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].path.to_string(), "a[1].b");
}

#[test]
fn reason_codes_are_verbatim() {
    let schema = Schema::object([
        ("a", Schema::of(types::int())),
        ("b", Schema::of(types::int())),
    ]);
    let violations = validate(&schema, &json!({"a": "x", "c": 1}));
    let codes: Vec<&str> = violations.iter().map(|v| v.code()).collect();
    assert_eq!(
        codes,
        vec!["INVALID_VALUE", "MISSING_PROPERTY", "EXTRANEOUS_PROPERTY"]
    );
}

#[test]
fn violations_render_with_path_and_message() {
    let schema = Schema::object([("a", Schema::of(types::int()))]);
    let violations = validate(&schema, &json!({"a": "x"}));
    assert_eq!(
        violations[0].to_string(),
        "INVALID_VALUE at a: Expected int, got string"
    );
}

#[test]
fn extraneous_policy_ignore() {
    let schema = Schema::object([("a", Schema::of(types::int()))]);
    let data = json!({"a": 5, "b": 1});
    let config = ValidationConfig::new().ignore_extraneous();

    assert!(!verify(&schema, &data));
    assert!(verify_with(&schema, &data, &config));
    assert!(validate_with(&schema, &data, &config).is_empty());
}

#[test]
fn panicking_predicate_is_a_mismatch_by_default() {
    let schema = Schema::object([(
        "a",
        Schema::field()
            .with_test("always panics", |_: &Value| panic!("misbehaving predicate"))
            .into(),
    )]);
    assert!(!verify(&schema, &json!({"a": 5})));

    let violations = validate(&schema, &json!({"a": 5}));
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].code(), "INVALID_VALUE");
}

#[test]
#[should_panic(expected = "misbehaving predicate")]
fn panicking_predicate_propagates_when_configured() {
    let schema = Schema::object([(
        "a",
        Schema::field()
            .with_test("always panics", |_: &Value| panic!("misbehaving predicate"))
            .into(),
    )]);
    let config = ValidationConfig::new().propagate_predicate_panics();
    verify_with(&schema, &json!({"a": 5}), &config);
}

#[test]
fn literal_shape_mismatch_is_structural() {
    let schema = Schema::literal(json!([1, 2]));
    let violations = validate(&schema, &json!(5));
    assert!(matches!(
        violations[0].kind,
        ViolationKind::StructuralMismatch { .. }
    ));
    // structural mismatches share the INVALID_VALUE code
    assert_eq!(violations[0].code(), "INVALID_VALUE");
}

#[test]
fn object_schema_against_scalar_is_structural() {
    let schema = Schema::object([("a", Schema::of(types::int()))]);
    let violations = validate(&schema, &json!([1]));
    assert_eq!(violations.len(), 1);
    assert!(matches!(
        violations[0].kind,
        ViolationKind::StructuralMismatch { ref expected, .. } if expected == "object"
    ));
}

#[test]
fn violation_kinds_serialize_tagged() {
    let violations = validate(
        &Schema::object([("a", Schema::of(types::int()))]),
        &json!({}),
    );
    let encoded = serde_json::to_value(&violations[0].kind).unwrap();
    assert_eq!(encoded["type"], "MissingProperty");
    assert_eq!(encoded["data"]["property"], "a");
}
