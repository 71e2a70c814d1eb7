// Built-in type predicates
//
// The JSON-representable catalogue of named type tests. Each function
// returns a fresh `Predicate`; predicates are stateless, so sharing and
// re-creating them are equivalent.

use crate::schema::{Predicate, TypeRegistry};
use serde_json::Value;

/// Any string value
pub fn string() -> Predicate {
    Predicate::new("string", |v: &Value| v.is_string())
}

/// Any numeric value, integer or float
pub fn number() -> Predicate {
    Predicate::new("number", |v: &Value| v.is_number())
}

/// Number <= 0
pub fn non_positive_number() -> Predicate {
    Predicate::new("non-positive number", |v: &Value| {
        v.as_f64().is_some_and(|n| n <= 0.0)
    })
}

/// Number < 0
pub fn negative_number() -> Predicate {
    Predicate::new("negative number", |v: &Value| {
        v.as_f64().is_some_and(|n| n < 0.0)
    })
}

/// Number >= 0
pub fn non_negative_number() -> Predicate {
    Predicate::new("non-negative number", |v: &Value| {
        v.as_f64().is_some_and(|n| n >= 0.0)
    })
}

/// Number > 0
pub fn positive_number() -> Predicate {
    Predicate::new("positive number", |v: &Value| {
        v.as_f64().is_some_and(|n| n > 0.0)
    })
}

/// Any integer value
pub fn int() -> Predicate {
    Predicate::new("int", |v: &Value| v.is_i64() || v.is_u64())
}

/// Integer <= 0
pub fn non_positive_int() -> Predicate {
    Predicate::new("non-positive int", |v: &Value| {
        v.as_i64().is_some_and(|n| n <= 0)
    })
}

/// Integer < 0
pub fn negative_int() -> Predicate {
    Predicate::new("negative int", |v: &Value| v.as_i64().is_some_and(|n| n < 0))
}

/// Integer >= 0
pub fn non_negative_int() -> Predicate {
    Predicate::new("non-negative int", |v: &Value| v.as_u64().is_some())
}

/// Integer > 0
pub fn positive_int() -> Predicate {
    Predicate::new("positive int", |v: &Value| v.as_u64().is_some_and(|n| n > 0))
}

/// Boolean true or false
pub fn boolean() -> Predicate {
    Predicate::new("boolean", |v: &Value| v.is_boolean())
}

/// Anything but `false`, `null`, `0`, and `""`
pub fn truthy() -> Predicate {
    Predicate::new("truthy", |v: &Value| !is_falsy(v))
}

/// Exactly `false`, `null`, `0`, or `""`
pub fn falsy() -> Predicate {
    Predicate::new("falsy", is_falsy)
}

/// Any sequence value
pub fn array() -> Predicate {
    Predicate::new("array", |v: &Value| v.is_array())
}

/// Any mapping value
pub fn object() -> Predicate {
    Predicate::new("object", |v: &Value| v.is_object())
}

/// The null value
pub fn null_value() -> Predicate {
    Predicate::new("null", |v: &Value| v.is_null())
}

/// Matches every value
pub fn any() -> Predicate {
    Predicate::new("any", |_: &Value| true)
}

fn is_falsy(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// A registry pre-loaded with the whole built-in catalogue, keyed by each
/// predicate's display name.
pub fn default_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    for predicate in [
        string(),
        number(),
        non_positive_number(),
        negative_number(),
        non_negative_number(),
        positive_number(),
        int(),
        non_positive_int(),
        negative_int(),
        non_negative_int(),
        positive_int(),
        boolean(),
        truthy(),
        falsy(),
        array(),
        object(),
        null_value(),
        any(),
    ] {
        registry.register(predicate);
    }
    registry
}
