// Cross-module unit tests

use crate::{Schema, ValidationConfig, types, validate, validate_with, verify, verify_with};
use serde_json::json;

#[test]
fn test_verify_agrees_with_validate() {
    let schema = Schema::object([
        ("a", Schema::of(types::int())),
        ("b", Schema::array(Schema::of(types::string()))),
    ]);

    for data in [
        json!({"a": 5, "b": ["x"]}),
        json!({"a": "no", "b": ["x"]}),
        json!({"a": 5}),
        json!({"a": 5, "b": ["x"], "c": 1}),
        json!(42),
    ] {
        assert_eq!(
            verify(&schema, &data),
            validate(&schema, &data).is_empty(),
            "disagreement on {}",
            data
        );
    }
}

#[test]
fn test_verify_is_idempotent_without_unique() {
    let schema = Schema::object([("a", Schema::of(types::int()))]);
    let data = json!({"a": 5});
    for _ in 0..3 {
        assert!(verify(&schema, &data));
    }
}

#[test]
fn test_compiled_and_built_schemas_agree() {
    let registry = types::default_registry();
    let compiled = Schema::from_value(
        &json!({"a": {"$type": "int"}, "b": {"$element": {"$type": "string"}}}),
        &registry,
    )
    .unwrap();
    let built = Schema::object([
        ("a", Schema::field().with_type(types::int()).into()),
        (
            "b",
            Schema::array(Schema::field().with_type(types::string()).into()),
        ),
    ]);

    for data in [
        json!({"a": 1, "b": []}),
        json!({"a": 1, "b": ["x", "y"]}),
        json!({"a": "no", "b": []}),
        json!({"b": []}),
    ] {
        assert_eq!(verify(&compiled, &data), verify(&built, &data));
    }
}

#[test]
fn test_explicit_config_is_respected_by_both_modes() {
    let schema = Schema::object([("a", Schema::literal(json!(5)))]);
    let data = json!({"a": 5, "b": 1});
    let config = ValidationConfig::new().ignore_extraneous();

    assert!(!verify(&schema, &data));
    assert!(verify_with(&schema, &data, &config));
    assert!(!validate(&schema, &data).is_empty());
    assert!(validate_with(&schema, &data, &config).is_empty());
}
