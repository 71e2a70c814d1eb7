// Schema node model for structural conformance checking

use crate::error::{SchemaError, SchemaResult};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};

/// Directive keys reserved inside plain-data schema descriptions
const DIRECTIVE_KEYS: [&str; 4] = ["$type", "$test", "$optional", "$unique"];
const ELEMENT_KEY: &str = "$element";

/// A named one-argument boolean test over a data value.
///
/// Predicates are opaque to the engine: it invokes them and never inspects
/// them. The name is only used in violation messages.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    test: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
}

impl Predicate {
    /// Create a named predicate from any `Fn(&Value) -> bool`
    pub fn new(
        name: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            test: Arc::new(test),
        }
    }

    /// The display name used in violation messages and registry lookups
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the predicate against a data value
    pub fn test(&self, value: &Value) -> bool {
        (self.test)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("name", &self.name).finish()
    }
}

/// One recursive unit of a schema description
#[derive(Debug, Clone)]
pub enum Schema {
    /// Deep structural equality against a literal value
    Literal(Value),
    /// A named or inline predicate the value must satisfy
    Type(Predicate),
    /// Field-by-field object schema with an exact key-set contract
    Object(BTreeMap<String, Schema>),
    /// Validation rules for a single value slot (`$type`/`$test`/`$optional`/`$unique`)
    Field(FieldSchema),
    /// Sequence schema: every element must match the element schema
    Array(Box<Schema>),
}

impl Schema {
    /// Literal-equality schema
    pub fn literal(value: impl Into<Value>) -> Self {
        Schema::Literal(value.into())
    }

    /// Type-reference schema from a predicate
    pub fn of(predicate: Predicate) -> Self {
        Schema::Type(predicate)
    }

    /// Object schema from `(name, child)` pairs
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Schema)>,
    {
        Schema::Object(
            fields
                .into_iter()
                .map(|(key, child)| (key.into(), child))
                .collect(),
        )
    }

    /// Array schema from an element schema
    pub fn array(element: Schema) -> Self {
        Schema::Array(Box::new(element))
    }

    /// Empty directive node, to be filled via the [`FieldSchema`] builders
    pub fn field() -> FieldSchema {
        FieldSchema::new()
    }

    /// Whether an object field holding this node may be absent from the data
    pub fn is_optional(&self) -> bool {
        matches!(self, Schema::Field(field) if field.optional)
    }

    /// Compile a plain-data schema description.
    ///
    /// Mappings carrying `$type`/`$optional`/`$unique` become directive
    /// nodes, mappings carrying `$element` become array schemas, all other
    /// mappings become object schemas, and everything else is a literal.
    /// `$type` given as a string is resolved through the registry; given as
    /// a mapping it is compiled recursively. `$test` cannot be expressed in
    /// plain data and is rejected; build such nodes with
    /// [`FieldSchema::with_test`] instead.
    pub fn from_value(value: &Value, registry: &TypeRegistry) -> SchemaResult<Schema> {
        let Some(map) = value.as_object() else {
            return Ok(Schema::Literal(value.clone()));
        };

        if map.contains_key("$test") {
            return Err(SchemaError::InvalidDirective {
                directive: "$test",
                message: "predicate functions cannot be expressed in plain data".to_string(),
            });
        }

        if DIRECTIVE_KEYS.iter().any(|key| map.contains_key(*key)) {
            return Self::field_from_value(map, registry);
        }

        if let Some(element) = map.get(ELEMENT_KEY) {
            if let Some(stray) = map.keys().find(|key| *key != ELEMENT_KEY) {
                return Err(SchemaError::StrayKey { key: stray.clone() });
            }
            return Ok(Schema::array(Self::from_value(element, registry)?));
        }

        let mut fields = BTreeMap::new();
        for (key, child) in map {
            fields.insert(key.clone(), Self::from_value(child, registry)?);
        }
        Ok(Schema::Object(fields))
    }

    fn field_from_value(
        map: &serde_json::Map<String, Value>,
        registry: &TypeRegistry,
    ) -> SchemaResult<Schema> {
        if let Some(stray) = map.keys().find(|key| !DIRECTIVE_KEYS.contains(&key.as_str())) {
            return Err(SchemaError::StrayKey { key: stray.clone() });
        }

        let mut field = FieldSchema::new();

        if let Some(type_value) = map.get("$type") {
            let child = match type_value {
                Value::String(name) => registry
                    .resolve(name)
                    .cloned()
                    .map(Schema::Type)
                    .ok_or_else(|| SchemaError::UnknownType(name.clone()))?,
                other => Self::from_value(other, registry)?,
            };
            field = field.with_type(child);
        }

        if let Some(optional) = map.get("$optional") {
            match optional {
                Value::Bool(true) => field = field.optional(),
                Value::Bool(false) => {}
                other => {
                    return Err(SchemaError::InvalidDirective {
                        directive: "$optional",
                        message: format!("expected a boolean, got {}", other),
                    });
                }
            }
        }

        if let Some(unique) = map.get("$unique") {
            match unique {
                Value::Bool(true) => field = field.unique(),
                Value::Bool(false) => {}
                other => {
                    return Err(SchemaError::InvalidDirective {
                        directive: "$unique",
                        message: format!("expected a boolean, got {}", other),
                    });
                }
            }
        }

        Ok(Schema::Field(field))
    }
}

impl From<FieldSchema> for Schema {
    fn from(field: FieldSchema) -> Self {
        Schema::Field(field)
    }
}

impl From<Predicate> for Schema {
    fn from(predicate: Predicate) -> Self {
        Schema::Type(predicate)
    }
}

/// Validation rules for a single value slot.
///
/// `$type` and `$test` compose with logical AND. `$optional` is consulted by
/// the enclosing object schema, not by this node itself. `$unique` attaches
/// a [`UniqueTracker`] whose scope is the lifetime of this schema value.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    pub(crate) type_schema: Option<Box<Schema>>,
    pub(crate) test: Option<Predicate>,
    pub(crate) optional: bool,
    pub(crate) unique: Option<UniqueTracker>,
}

impl FieldSchema {
    /// Create an empty directive node (required, no checks)
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the value to match a child schema (the `$type` directive)
    pub fn with_type(mut self, schema: impl Into<Schema>) -> Self {
        self.type_schema = Some(Box::new(schema.into()));
        self
    }

    /// Require the value to pass a custom test (the `$test` directive)
    pub fn with_test(
        mut self,
        name: impl Into<String>,
        test: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.test = Some(Predicate::new(name, test));
        self
    }

    /// Allow the containing field to be absent (the `$optional` directive)
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Reject values already observed at this schema position across prior
    /// validation calls (the `$unique` directive)
    pub fn unique(mut self) -> Self {
        self.unique = Some(UniqueTracker::new());
        self
    }
}

/// Per-schema-node memory of previously accepted values.
///
/// The tracker lives as long as the schema node that owns it: reusing one
/// schema value across calls reuses the scope, constructing a fresh schema
/// yields a fresh scope, and cloning a schema shares the scope. The
/// check-then-insert is atomic under a mutex so concurrent validations of
/// the same value admit exactly one of them.
#[derive(Clone, Default)]
pub struct UniqueTracker {
    seen: Arc<Mutex<HashSet<String>>>,
}

impl UniqueTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value; returns false if it was already observed.
    pub fn observe(&self, value: &Value) -> bool {
        // A poisoned set is still a valid observation set.
        let mut seen = self
            .seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.insert(canonical(value))
    }

    /// Number of distinct values observed so far
    pub fn observed(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl fmt::Debug for UniqueTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniqueTracker")
            .field("observed", &self.observed())
            .finish()
    }
}

/// Canonical rendering used for deep-equality bookkeeping.
///
/// `serde_json::Map` keeps keys ordered, so structurally equal values render
/// identically.
fn canonical(value: &Value) -> String {
    value.to_string()
}

/// Registry of named type predicates, supplied wholesale by the caller.
///
/// The engine resolves `$type` names through the registry when compiling
/// plain-data schemas; it never validates the registry's own contents.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    predicates: BTreeMap<String, Predicate>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate under its own name, replacing any previous entry
    pub fn register(&mut self, predicate: Predicate) {
        self.predicates
            .insert(predicate.name().to_string(), predicate);
    }

    /// Look up a predicate by name
    pub fn resolve(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Names of all registered predicates
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.predicates.keys().map(String::as_str)
    }
}
