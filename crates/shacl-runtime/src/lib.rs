//! Schema-driven runtime for SHACL-shaped JSON-LD object graphs.
//!
//! This crate decodes JSON-LD documents into typed objects, validates them
//! against the constraints declared by their classes, and encodes them back.
//!
//! # Overview
//!
//! Classes are declared once, by the output of a shapes compiler, through a
//! [`RegistryBuilder`]:
//! - **Closed hierarchy**: every class has an IRI, optional parents and a
//!   fixed set of typed properties
//! - **Extensible classes**: unknown properties are captured instead of
//!   rejected, and unregistered `@type`s may resolve to them
//! - **Accumulating validation**: decode is fail-fast, validation reports
//!   every violation to an [`ErrorHandler`](validate::ErrorHandler)
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use shacl_runtime::{NoopHandler, ObjectSet, PropertyDef, Registry, TypeDef, ValueKind};
//!
//! let registry = Registry::builder("https://example.org/context.json")
//!     .register(
//!         TypeDef::new("https://example.org/Person")
//!             .compact("Person")
//!             .property(
//!                 PropertyDef::new("name", "https://example.org/name", ValueKind::String)
//!                     .compact("name")
//!                     .required(),
//!             ),
//!     )
//!     .build()
//!     .unwrap();
//! let registry = Arc::new(registry);
//!
//! let document = json!({
//!     "@context": "https://example.org/context.json",
//!     "@type": "Person",
//!     "@id": "https://example.org/alice",
//!     "name": "Alice"
//! });
//!
//! let set = ObjectSet::from_value(&document, &registry).unwrap();
//! assert!(set.validate(&mut NoopHandler));
//! assert_eq!(set.to_value(), document);
//! ```
//!
//! # Modules
//!
//! - [`model`]: Paths, properties, references, type descriptors, the
//!   registry, objects and object sets
//! - [`codec`]: Value codecs, the object engine and document envelopes
//! - [`validate`]: Validators and validation error handlers
//! - [`util`]: IRI shapes and date-time literals
//! - [`error`]: Error types
//! - [`limits`]: Limits for decoding untrusted input
//!
//! # Lifecycle
//!
//! A [`Registry`] is built once and is read-only afterwards. Share it behind
//! an `Arc`; any number of object sets may decode against it concurrently.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod util;
pub mod validate;

#[cfg(test)]
mod test_model;

// Re-export commonly used types at crate root
pub use codec::{
    decode_document, decode_document_with_options, encode_document, encode_document_with_options,
    DecodeOptions, EncodeOptions,
};
pub use error::{
    ConversionError, DecodeError, DecodeErrorKind, Error, RegistryError, ValidationError,
    ValidationReason,
};
pub use model::{
    AnyValue, Constraint, Context, ListProperty, NodeKind, ObjectSet, Path, Property,
    PropertyDef, PropertyDescriptor, Ref, RefListProperty, RefProperty, Registry,
    RegistryBuilder, ShaclObject, Slot, SlotValue, TypeDef, TypeDescriptor, ValueKind,
};
pub use util::DateTime;
pub use validate::{ErrorHandler, FnHandler, NoopHandler, TracingHandler, Validator};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
