// Structural conformance engine

use crate::error::{InstancePath, Violation, ViolationKind};
use crate::schema::{FieldSchema, Predicate, Schema};
use serde_json::Value;
use std::panic::{self, AssertUnwindSafe};
use tracing::trace;

/// Policy for data properties with no schema counterpart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExtraneousPolicy {
    /// Report an `ExtraneousProperty` violation
    #[default]
    Error,
    /// Accept unknown properties silently
    Ignore,
}

/// Policy for predicates that panic during invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PredicatePanicPolicy {
    /// Contain the panic and treat the invocation as a failed match
    #[default]
    Fail,
    /// Let the panic unwind through the validation call
    Propagate,
}

/// Cross-cutting validation policy, passed explicitly to the entry points.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationConfig {
    pub on_extraneous: ExtraneousPolicy,
    pub on_predicate_panic: PredicatePanicPolicy,
}

impl ValidationConfig {
    /// The default policy: extraneous properties are violations, predicate
    /// panics are contained.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept data properties that have no schema counterpart
    pub fn ignore_extraneous(mut self) -> Self {
        self.on_extraneous = ExtraneousPolicy::Ignore;
        self
    }

    /// Let predicate panics unwind instead of treating them as mismatches
    pub fn propagate_predicate_panics(mut self) -> Self {
        self.on_predicate_panic = PredicatePanicPolicy::Propagate;
        self
    }
}

/// Check whether data conforms to a schema, stopping at the first violation.
pub fn verify(schema: &Schema, value: &Value) -> bool {
    verify_with(schema, value, &ValidationConfig::default())
}

/// [`verify`] with an explicit policy
pub fn verify_with(schema: &Schema, value: &Value, config: &ValidationConfig) -> bool {
    let mut context = ValidationContext::new(*config, true);
    matches(schema, value, &mut context)
}

/// Collect every violation between data and schema, in walk order.
///
/// An empty result means the data conforms; `verify` and `validate` agree
/// on every schema/data pair (modulo `$unique` state consumed by the walk).
pub fn validate(schema: &Schema, value: &Value) -> Vec<Violation> {
    validate_with(schema, value, &ValidationConfig::default())
}

/// [`validate`] with an explicit policy
pub fn validate_with(schema: &Schema, value: &Value, config: &ValidationConfig) -> Vec<Violation> {
    let mut context = ValidationContext::new(*config, false);
    matches(schema, value, &mut context);
    context.violations
}

/// Validation context tracks state during one validation call
struct ValidationContext {
    config: ValidationConfig,
    /// Current instance path (e.g. `a.b[0]`)
    path: InstancePath,
    /// Collected violations
    violations: Vec<Violation>,
    /// Early-exit mode: stop at the first violation
    fail_fast: bool,
}

impl ValidationContext {
    fn new(config: ValidationConfig, fail_fast: bool) -> Self {
        Self {
            config,
            path: InstancePath::new(),
            violations: Vec::new(),
            fail_fast,
        }
    }

    /// Record a violation at the current path
    fn report(&mut self, kind: ViolationKind) {
        trace!(path = %self.path, code = kind.code(), "violation");
        self.violations.push(Violation::new(kind, self.path.clone()));
    }

    /// Execute a function with a key segment pushed onto the path
    fn with_key<F, R>(&mut self, key: &str, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.path.push_key(key);
        let result = f(self);
        self.path.pop();
        result
    }

    /// Execute a function with an index segment pushed onto the path
    fn with_index<F, R>(&mut self, index: usize, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.path.push_index(index);
        let result = f(self);
        self.path.pop();
        result
    }
}

/// Main matching dispatcher: true iff the value matches this node with no
/// violation. In early-exit mode the walk stops descending as soon as any
/// branch reports.
fn matches(schema: &Schema, value: &Value, context: &mut ValidationContext) -> bool {
    match schema {
        Schema::Type(predicate) => match_predicate(predicate, value, context),
        Schema::Array(element) => match_array(element, value, context),
        Schema::Field(field) => match_field(field, value, context),
        Schema::Object(fields) => match_object(fields, value, context),
        Schema::Literal(literal) => match_literal(literal, value, context),
    }
}

/// Invoke a predicate under the configured panic policy
fn invoke(predicate: &Predicate, value: &Value, context: &ValidationContext) -> bool {
    match context.config.on_predicate_panic {
        PredicatePanicPolicy::Propagate => predicate.test(value),
        // A misbehaving predicate must never take down the validation.
        PredicatePanicPolicy::Fail => {
            panic::catch_unwind(AssertUnwindSafe(|| predicate.test(value))).unwrap_or(false)
        }
    }
}

fn match_predicate(predicate: &Predicate, value: &Value, context: &mut ValidationContext) -> bool {
    if invoke(predicate, value, context) {
        return true;
    }
    context.report(ViolationKind::TypeMismatch {
        expected: predicate.name().to_string(),
        got: type_name(value).to_string(),
    });
    false
}

fn match_array(element: &Schema, value: &Value, context: &mut ValidationContext) -> bool {
    let Some(items) = value.as_array() else {
        context.report(ViolationKind::StructuralMismatch {
            expected: "array".to_string(),
            got: type_name(value).to_string(),
        });
        return false;
    };

    let mut ok = true;
    for (index, item) in items.iter().enumerate() {
        if !context.with_index(index, |ctx| matches(element, item, ctx)) {
            ok = false;
            if context.fail_fast {
                return false;
            }
        }
    }
    ok
}

fn match_field(field: &FieldSchema, value: &Value, context: &mut ValidationContext) -> bool {
    let mut ok = true;

    if let Some(type_schema) = &field.type_schema {
        if !matches(type_schema, value, context) {
            ok = false;
            if context.fail_fast {
                return false;
            }
        }
    }

    if let Some(test) = &field.test
        && !invoke(test, value, context)
    {
        context.report(ViolationKind::TypeMismatch {
            expected: test.name().to_string(),
            got: type_name(value).to_string(),
        });
        ok = false;
        if context.fail_fast {
            return false;
        }
    }

    // Only an otherwise-matched value enters the uniqueness scope.
    if ok
        && let Some(tracker) = &field.unique
        && !tracker.observe(value)
    {
        context.report(ViolationKind::NonUniqueValue {
            value: value.to_string(),
        });
        ok = false;
    }

    ok
}

fn match_object(
    fields: &std::collections::BTreeMap<String, Schema>,
    value: &Value,
    context: &mut ValidationContext,
) -> bool {
    // An empty object schema constrains nothing, not even the value's shape.
    if fields.is_empty() {
        return true;
    }

    let Some(map) = value.as_object() else {
        context.report(ViolationKind::StructuralMismatch {
            expected: "object".to_string(),
            got: type_name(value).to_string(),
        });
        return false;
    };

    let mut ok = true;

    for (key, child) in fields {
        match map.get(key) {
            Some(field_value) => {
                if !context.with_key(key, |ctx| matches(child, field_value, ctx)) {
                    ok = false;
                    if context.fail_fast {
                        return false;
                    }
                }
            }
            None => {
                if !child.is_optional() {
                    context.report(ViolationKind::MissingProperty {
                        property: key.clone(),
                    });
                    ok = false;
                    if context.fail_fast {
                        return false;
                    }
                }
            }
        }
    }

    if context.config.on_extraneous == ExtraneousPolicy::Error {
        for key in map.keys() {
            if !fields.contains_key(key) {
                context.report(ViolationKind::ExtraneousProperty {
                    property: key.clone(),
                });
                ok = false;
                if context.fail_fast {
                    return false;
                }
            }
        }
    }

    ok
}

fn match_literal(literal: &Value, value: &Value, context: &mut ValidationContext) -> bool {
    if literal == value {
        return true;
    }
    let expected = type_name(literal);
    let got = type_name(value);
    if (literal.is_object() || literal.is_array()) && expected != got {
        context.report(ViolationKind::StructuralMismatch {
            expected: expected.to_string(),
            got: got.to_string(),
        });
    } else {
        context.report(ViolationKind::TypeMismatch {
            expected: literal.to_string(),
            got: value.to_string(),
        });
    }
    false
}

/// Human-readable type name for a data value
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;
    use serde_json::json;

    #[test]
    fn test_verify_type_reference() {
        let schema = Schema::of(types::int());
        assert!(verify(&schema, &json!(5)));
        assert!(!verify(&schema, &json!("hello")));
    }

    #[test]
    fn test_structural_mismatch_for_scalar_against_array_schema() {
        let schema = Schema::array(Schema::of(types::int()));
        let violations = validate(&schema, &json!(5));
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].kind,
            ViolationKind::StructuralMismatch { .. }
        ));
    }

    #[test]
    fn test_fail_fast_stops_at_first_element() {
        let schema = Schema::array(Schema::of(types::int()));
        // Early-exit mode reports exactly one violation.
        let mut context = ValidationContext::new(ValidationConfig::default(), true);
        assert!(!matches(&schema, &json!(["a", "b"]), &mut context));
        assert_eq!(context.violations.len(), 1);
    }

    #[test]
    fn test_collect_all_visits_every_element() {
        let schema = Schema::array(Schema::of(types::int()));
        let violations = validate(&schema, &json!(["a", 1, "b"]));
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].path.to_string(), "[0]");
        assert_eq!(violations[1].path.to_string(), "[2]");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!(true)), "boolean");
        assert_eq!(type_name(&json!(5)), "integer");
        assert_eq!(type_name(&json!(5.5)), "float");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!([])), "array");
        assert_eq!(type_name(&json!({})), "object");
    }
}
