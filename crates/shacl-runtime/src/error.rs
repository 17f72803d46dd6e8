//! Error types for decoding, validation, narrowing and registry construction.

use thiserror::Error;

use crate::model::{NodeKind, Path};

/// Error raised while decoding a document.
///
/// Decoding is fail-fast: the first error aborts the whole decode and no
/// partial object is handed back. The path locates the offending node.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{path}: {kind}")]
pub struct DecodeError {
    pub path: Path,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(path: &Path, kind: DecodeErrorKind) -> Self {
        Self {
            path: path.clone(),
            kind,
        }
    }
}

/// What went wrong while decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeErrorKind {
    // === Document envelope ===
    #[error("@context missing")]
    MissingContext,

    #[error("@context must be a string, or list of string")]
    ContextNotString,

    #[error("Wrong context URL '{found}'")]
    WrongContext { found: String },

    #[error("Unknown top level key '{key}'")]
    UnknownTopLevelKey { key: String },

    // === Typed objects ===
    #[error("Expected object, found {found}")]
    ExpectedObject { found: &'static str },

    #[error("type missing")]
    MissingType,

    #[error("@type must be a string, found {found}")]
    TypeNotString { found: &'static str },

    #[error("Type {type_iri} is not valid where {expected} is expected")]
    TypeNotValid { type_iri: String, expected: String },

    #[error("Unable to create abstract type '{type_iri}'")]
    AbstractType { type_iri: String },

    #[error("Unable to create object of type '{type_iri}' (no matching extensible object)")]
    NoMatchingExtensible { type_iri: String },

    #[error("Unknown property '{key}'")]
    UnknownProperty { key: String },

    #[error("'@id' is not allowed for {class} which has an ID alias")]
    IdNotAllowed { class: String },

    #[error("Invalid identifier: {0}")]
    InvalidId(ValidationError),

    #[error("Nesting exceeds maximum depth of {max}")]
    DepthExceeded { max: usize },

    // === Primitive values ===
    #[error("Expected string, found {found}")]
    ExpectedString { found: &'static str },

    #[error("Expected boolean, found {found}")]
    ExpectedBoolean { found: &'static str },

    #[error("Expected integer, found {found}")]
    ExpectedInteger { found: &'static str },

    #[error("Value must be an integer, found {value}")]
    NotAnInteger { value: f64 },

    #[error("Expected float, found {found}")]
    ExpectedFloat { found: &'static str },

    #[error("Invalid float '{value}'")]
    InvalidFloat { value: String },

    #[error("Expected list, found {found}")]
    ExpectedList { found: &'static str },

    #[error("Must be blank node or IRI. Got '{value}'")]
    NotIriOrBlank { value: String },

    #[error("Invalid date time string '{value}'")]
    InvalidDateTime { value: String },

    #[error("Unsupported value of type {found}")]
    UnsupportedValue { found: &'static str },

    #[error("Property slot does not match its declared kind")]
    SlotMismatch,
}

/// A semantic constraint violation found by a validator or by object validation.
///
/// Validation accumulates these through an [`ErrorHandler`](crate::validate::ErrorHandler)
/// instead of stopping at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{property}: {reason}")]
pub struct ValidationError {
    pub property: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(property: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            property: property.into(),
            reason,
        }
    }
}

/// Why a value failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("Must be an IRI or a Blank Node")]
    NotIriOrBlank,

    #[error("Value '{value}' does not match pattern")]
    PatternMismatch { value: String, pattern: String },

    #[error("Value {value} is less than minimum {min}")]
    BelowMinimum { value: i64, min: i64 },

    #[error("Value {value} is greater than maximum {max}")]
    AboveMaximum { value: i64, max: i64 },

    #[error("Value '{value}' is not a valid enumerated value")]
    NotEnumerated { value: String },

    #[error("Value is required")]
    Required,

    #[error("Too few elements. Minimum of {min} required")]
    TooFew { min: usize },

    #[error("Too many elements. Maximum of {max} allowed")]
    TooMany { max: usize },

    #[error("{}", node_kind_message(.0))]
    NodeKind(NodeKind),
}

fn node_kind_message(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::BlankNode => "ID must be a blank node",
        NodeKind::Iri => "ID must be an IRI",
        NodeKind::BlankNodeOrIri => "ID must be a blank node or IRI",
    }
}

/// Narrowing a reference or object to an incompatible type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unable to convert from {from} to {to}")]
pub struct ConversionError {
    pub from: String,
    pub to: String,
}

/// Configuration error found while building a [`Registry`](crate::model::Registry).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("class {class} names unknown parent {parent}")]
    UnknownParent { class: String, parent: String },

    #[error("inheritance cycle through {class}")]
    Cycle { class: String },

    #[error("property {property} references unknown class {class}")]
    UnknownClass { property: String, class: String },

    #[error("property {property} has invalid pattern: {message}")]
    InvalidPattern { property: String, message: String },

    #[error("constraint {constraint} does not apply to {kind} property {property}")]
    InvalidConstraint {
        property: String,
        constraint: &'static str,
        kind: &'static str,
    },
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown class '{class}'")]
    UnknownClass { class: String },

    #[error("class {class} has no property {name}")]
    UnknownProperty { class: String, name: String },

    #[error("property {name} holds {found}, not {expected}")]
    PropertyKind {
        name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Unable to create abstract type '{type_iri}'")]
    AbstractType { type_iri: String },

    #[error("class {class} is not extensible")]
    NotExtensible { class: String },
}
