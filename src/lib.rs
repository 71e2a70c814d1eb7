// Structural conformance checking for JSON-shaped data
//
// A schema is an explicit tree of nodes: literal values matched by deep
// equality, named or inline predicates, field-by-field object shapes,
// per-slot directive rules ($type/$test/$optional/$unique), and element-wise
// array rules. `verify` stops at the first violation; `validate` collects
// every violation with its instance path.

pub mod error;
pub mod schema;
pub mod types;
pub mod validator;

pub use error::{
    EXTRANEOUS_PROPERTY, INVALID_VALUE, InstancePath, MISSING_PROPERTY, NON_UNIQUE_PROPERTY,
    PathSegment, SchemaError, SchemaResult, Violation, ViolationKind,
};
pub use schema::{FieldSchema, Predicate, Schema, TypeRegistry, UniqueTracker};
pub use validator::{
    ExtraneousPolicy, PredicatePanicPolicy, ValidationConfig, validate, validate_with, verify,
    verify_with,
};

#[cfg(test)]
mod tests;
