// Violation and path types for conformance checking

use std::fmt;
use thiserror::Error;

/// Stable reason code: a value failed a type, test, or literal check.
pub const INVALID_VALUE: &str = "INVALID_VALUE";
/// Stable reason code: a required property is absent from the data.
pub const MISSING_PROPERTY: &str = "MISSING_PROPERTY";
/// Stable reason code: a `$unique` value duplicates a prior observation.
pub const NON_UNIQUE_PROPERTY: &str = "NON_UNIQUE_PROPERTY";
/// Stable reason code: a data property has no schema counterpart.
pub const EXTRANEOUS_PROPERTY: &str = "EXTRANEOUS_PROPERTY";

/// Errors that can occur while compiling a schema from a plain-data description
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// `$type` named a predicate not present in the registry
    #[error("unknown type '{0}' (not present in the registry)")]
    UnknownType(String),

    /// A directive key carried a value of the wrong shape
    #[error("invalid {directive} directive: {message}")]
    InvalidDirective {
        directive: &'static str,
        message: String,
    },

    /// A directive-bearing mapping also carried ordinary keys
    #[error("key '{key}' cannot appear alongside directive keys")]
    StrayKey { key: String },
}

/// Result type for schema compilation
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Structured violation kinds
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ViolationKind {
    /// Value failed a type reference, `$type`, `$test`, or literal equality
    TypeMismatch { expected: String, got: String },

    /// Required property absent from the data object
    MissingProperty { property: String },

    /// Data property with no schema counterpart
    ExtraneousProperty { property: String },

    /// `$unique` value already observed at this schema position
    NonUniqueValue { value: String },

    /// Container-level shape mismatch (expected sequence got scalar, etc.)
    StructuralMismatch { expected: String, got: String },
}

impl ViolationKind {
    /// Get the stable reason code for this kind.
    ///
    /// Structural mismatches report under [`INVALID_VALUE`]; the kind
    /// variant keeps the container/scalar distinction machine-readable.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::TypeMismatch { .. } | ViolationKind::StructuralMismatch { .. } => {
                INVALID_VALUE
            }
            ViolationKind::MissingProperty { .. } => MISSING_PROPERTY,
            ViolationKind::ExtraneousProperty { .. } => EXTRANEOUS_PROPERTY,
            ViolationKind::NonUniqueValue { .. } => NON_UNIQUE_PROPERTY,
        }
    }

    /// Format a human-readable message from this kind
    pub fn message(&self) -> String {
        match self {
            ViolationKind::TypeMismatch { expected, got } => {
                format!("Expected {}, got {}", expected, got)
            }
            ViolationKind::MissingProperty { property } => {
                format!("Missing required property '{}'", property)
            }
            ViolationKind::ExtraneousProperty { property } => {
                format!("Extraneous property '{}'", property)
            }
            ViolationKind::NonUniqueValue { value } => {
                format!("Value {} was already observed at this position", value)
            }
            ViolationKind::StructuralMismatch { expected, got } => {
                format!("Expected {}, got {}", expected, got)
            }
        }
    }
}

/// One way the data failed to conform to the schema
#[derive(Debug, Clone, PartialEq, Error)]
pub struct Violation {
    /// What went wrong
    pub kind: ViolationKind,
    /// Where in the data tree it went wrong (e.g. `a.b[0].c`)
    pub path: InstancePath,
}

impl Violation {
    /// Create a new violation
    pub fn new(kind: ViolationKind, path: InstancePath) -> Self {
        Self { kind, path }
    }

    /// The stable reason code for this violation
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}: {}",
            self.kind.code(),
            self.path,
            self.kind.message()
        )
    }
}

/// A segment in an instance path
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PathSegment {
    /// Object key
    Key(String),
    /// Array index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Path from the data root to the value a violation refers to
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InstancePath {
    segments: Vec<PathSegment>,
}

impl InstancePath {
    /// Create a new empty instance path
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a key segment onto the path
    pub fn push_key(&mut self, key: impl Into<String>) {
        self.segments.push(PathSegment::Key(key.into()));
    }

    /// Push an index segment onto the path
    pub fn push_index(&mut self, index: usize) {
        self.segments.push(PathSegment::Index(index));
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    /// Get the segments as a slice
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get the length of the path
    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(_) if i > 0 => write!(f, ".{}", segment)?,
                _ => write!(f, "{}", segment)?,
            }
        }
        Ok(())
    }
}
