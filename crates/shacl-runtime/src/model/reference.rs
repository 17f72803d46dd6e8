//! References between objects.

use std::sync::Arc;

use crate::error::ConversionError;
use crate::model::ShaclObject;

/// A reference held by a [`RefProperty`](crate::model::RefProperty).
///
/// Exactly one of: unset, a bare IRI that was never resolved, or an object
/// owned by the reference. Objects are behind an [`Arc`] so that graphs
/// built by callers may reach one object from several places; decoding
/// always allocates a fresh object per occurrence.
#[derive(Debug, Clone, Default)]
pub enum Ref {
    #[default]
    Unset,
    Iri(String),
    Object(Arc<ShaclObject>),
}

impl Ref {
    pub fn iri(iri: impl Into<String>) -> Self {
        Ref::Iri(iri.into())
    }

    pub fn object(obj: ShaclObject) -> Self {
        Ref::Object(Arc::new(obj))
    }

    pub fn shared(obj: Arc<ShaclObject>) -> Self {
        Ref::Object(obj)
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, Ref::Unset)
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Ref::Iri(_))
    }

    pub fn is_obj(&self) -> bool {
        matches!(self, Ref::Object(_))
    }

    /// The IRI this reference points at.
    ///
    /// For an object this is the object's identifier, if it has one.
    pub fn get_iri(&self) -> Option<&str> {
        match self {
            Ref::Unset => None,
            Ref::Iri(iri) => Some(iri),
            Ref::Object(obj) => obj.id().get().map(String::as_str),
        }
    }

    pub fn get_obj(&self) -> Option<&Arc<ShaclObject>> {
        match self {
            Ref::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Mutable access to the referenced object, cloning it first if it is
    /// shared with another reference.
    pub fn get_obj_mut(&mut self) -> Option<&mut ShaclObject> {
        match self {
            Ref::Object(obj) => Some(Arc::make_mut(obj)),
            _ => None,
        }
    }

    /// Narrows to an object whose class is `class` or derives from it.
    pub fn narrow(&self, class: &str) -> Result<&ShaclObject, ConversionError> {
        match self {
            Ref::Object(obj) if obj.class().is_subclass_of(class) => Ok(obj),
            Ref::Object(obj) => Err(ConversionError {
                from: obj.class().iri().to_string(),
                to: class.to_string(),
            }),
            Ref::Iri(_) => Err(ConversionError {
                from: "IRI".to_string(),
                to: class.to_string(),
            }),
            Ref::Unset => Err(ConversionError {
                from: "unset reference".to_string(),
                to: class.to_string(),
            }),
        }
    }
}

impl From<ShaclObject> for Ref {
    fn from(obj: ShaclObject) -> Self {
        Ref::object(obj)
    }
}

impl From<Arc<ShaclObject>> for Ref {
    fn from(obj: Arc<ShaclObject>) -> Self {
        Ref::Object(obj)
    }
}
