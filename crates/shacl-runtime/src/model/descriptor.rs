//! Resolved class and property metadata.
//!
//! Descriptors are produced by [`RegistryBuilder::build`](crate::model::RegistryBuilder::build)
//! and are immutable afterwards. Parents are held directly, so hierarchy
//! queries never go back through the registry.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::model::{Context, Slot};

/// Constraint on the shape of an object's identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeKind {
    BlankNode,
    Iri,
    #[default]
    BlankNodeOrIri,
}

/// How a property value is read from and written to a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKind {
    String,
    /// A string holding an IRI, compacted through the property context.
    Iri,
    Boolean,
    Integer,
    Float,
    DateTime,
    DateTimeStamp,
    /// A reference to an object of the class with this canonical IRI.
    Object(String),
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Iri => "IRI",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::DateTime => "date-time",
            ValueKind::DateTimeStamp => "date-time-stamp",
            ValueKind::Object(_) => "object",
        }
    }
}

/// One declared property of a class.
#[derive(Debug)]
pub struct PropertyDescriptor {
    pub(crate) name: Arc<str>,
    pub(crate) iri: String,
    pub(crate) compact: Option<String>,
    pub(crate) kind: ValueKind,
    pub(crate) list: bool,
    pub(crate) min_count: Option<usize>,
    pub(crate) max_count: Option<usize>,
    pub(crate) context: Context,
    /// Empty container with the compiled validator chain; cloned into every
    /// new object.
    pub(crate) template: Slot,
}

impl PropertyDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn compact_iri(&self) -> Option<&str> {
        self.compact.as_deref()
    }

    /// The key written on encode: the compact alias if any, else the IRI.
    pub fn key(&self) -> &str {
        self.compact.as_deref().unwrap_or(&self.iri)
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    pub fn min_count(&self) -> Option<usize> {
        self.min_count
    }

    pub fn max_count(&self) -> Option<usize> {
        self.max_count
    }

    pub fn is_required(&self) -> bool {
        self.min_count.is_some_and(|min| min > 0)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// True if `key` is this property's IRI or compact alias.
    pub fn matches_key(&self, key: &str) -> bool {
        self.iri == key || self.compact.as_deref() == Some(key)
    }
}

/// A resolved class.
pub struct TypeDescriptor {
    pub(crate) iri: String,
    pub(crate) compact: Option<String>,
    pub(crate) node_kind: Option<NodeKind>,
    pub(crate) id_alias: Option<String>,
    pub(crate) is_abstract: bool,
    pub(crate) extensible: Option<bool>,
    pub(crate) parents: Vec<Arc<TypeDescriptor>>,
    pub(crate) properties: Vec<Arc<PropertyDescriptor>>,
    /// Every property of the class and its ancestors, base first.
    pub(crate) layout: Vec<Arc<PropertyDescriptor>>,
    /// Property IRI and compact alias to layout position.
    pub(crate) key_index: FxHashMap<String, usize>,
    /// Property name to layout position.
    pub(crate) name_index: FxHashMap<String, usize>,
}

impl TypeDescriptor {
    pub fn iri(&self) -> &str {
        &self.iri
    }

    pub fn compact_iri(&self) -> Option<&str> {
        self.compact.as_deref()
    }

    /// The type name written on encode: the compact alias if any, else the IRI.
    pub fn type_name(&self) -> &str {
        self.compact.as_deref().unwrap_or(&self.iri)
    }

    pub fn parents(&self) -> &[Arc<TypeDescriptor>] {
        &self.parents
    }

    /// Properties declared by this class only.
    pub fn properties(&self) -> &[Arc<PropertyDescriptor>] {
        &self.properties
    }

    /// Properties of this class and its ancestors, base first.
    pub fn layout(&self) -> &[Arc<PropertyDescriptor>] {
        &self.layout
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Declared node kind, else the first parent's, else either.
    pub fn node_kind(&self) -> NodeKind {
        match self.node_kind {
            Some(kind) => kind,
            None => self
                .parents
                .first()
                .map(|parent| parent.node_kind())
                .unwrap_or_default(),
        }
    }

    /// Declared id alias, else the first one found among the ancestors.
    pub fn id_alias(&self) -> Option<&str> {
        match &self.id_alias {
            Some(alias) => Some(alias),
            None => self.parents.iter().find_map(|parent| parent.id_alias()),
        }
    }

    /// Declared extensibility, else true if any ancestor is extensible.
    pub fn is_extensible(&self) -> bool {
        match self.extensible {
            Some(extensible) => extensible,
            None => self.parents.iter().any(|parent| parent.is_extensible()),
        }
    }

    /// True if this class is `iri` or derives from it. Reflexive.
    pub fn is_subclass_of(&self, iri: &str) -> bool {
        self.iri == iri || self.parents.iter().any(|parent| parent.is_subclass_of(iri))
    }

    /// Looks up a property by IRI or compact alias.
    pub fn property_by_key(&self, key: &str) -> Option<&Arc<PropertyDescriptor>> {
        self.key_index.get(key).map(|&idx| &self.layout[idx])
    }

    /// Layout position of a property given by name, IRI or compact alias.
    pub fn slot_index(&self, key: &str) -> Option<usize> {
        self.name_index
            .get(key)
            .or_else(|| self.key_index.get(key))
            .copied()
    }

    pub(crate) fn key_slot(&self, key: &str) -> Option<usize> {
        self.key_index.get(key).copied()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("iri", &self.iri)
            .field("compact", &self.compact)
            .field("node_kind", &self.node_kind)
            .field("id_alias", &self.id_alias)
            .field("is_abstract", &self.is_abstract)
            .field("extensible", &self.extensible)
            .field(
                "parents",
                &self.parents.iter().map(|p| p.iri.as_str()).collect::<Vec<_>>(),
            )
            .field(
                "properties",
                &self.layout.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
