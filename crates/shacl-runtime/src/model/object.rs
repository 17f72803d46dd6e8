//! Typed object instances.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, ValidationError, ValidationReason};
use crate::model::descriptor::{NodeKind, PropertyDescriptor, TypeDescriptor};
use crate::model::property::{ListProperty, Property, RefListProperty, RefProperty, Visit};
use crate::model::slot::SlotValue;
use crate::model::{Path, Ref, Slot};
use crate::util::{is_blank_node, is_iri};
use crate::validate::{ErrorHandler, IdValidator};

/// An untyped value captured by an extensible object.
#[derive(Debug, Clone)]
pub enum AnyValue {
    Ref(Ref),
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<AnyValue>),
}

/// An instance of a class from a [`Registry`](crate::model::Registry).
///
/// Holds the identifier, one [`Slot`] per property in the class layout, the
/// `@type` string seen on decode (when it should be written back verbatim)
/// and, for extensible classes, captured extension properties.
#[derive(Clone)]
pub struct ShaclObject {
    class: Arc<TypeDescriptor>,
    id: Property<String>,
    type_iri: Option<String>,
    slots: Vec<Slot>,
    extensions: BTreeMap<String, Vec<AnyValue>>,
}

impl ShaclObject {
    /// Creates an empty object of a concrete class.
    pub fn new(class: &Arc<TypeDescriptor>) -> Result<Self, Error> {
        if class.is_abstract() {
            return Err(Error::AbstractType {
                type_iri: class.iri().to_string(),
            });
        }
        Ok(Self::instantiate(class))
    }

    /// Creates an empty object without the abstract check. Decoding uses
    /// this for extensible abstract classes.
    pub(crate) fn instantiate(class: &Arc<TypeDescriptor>) -> Self {
        Self {
            class: class.clone(),
            id: Property::new("id").with_validator(IdValidator),
            type_iri: None,
            slots: class.layout().iter().map(|p| p.template.clone()).collect(),
            extensions: BTreeMap::new(),
        }
    }

    pub fn class(&self) -> &Arc<TypeDescriptor> {
        &self.class
    }

    pub fn id(&self) -> &Property<String> {
        &self.id
    }

    pub fn id_mut(&mut self) -> &mut Property<String> {
        &mut self.id
    }

    /// The `@type` written on encode: the observed type if one was recorded,
    /// else the class compact alias, else its IRI.
    pub fn type_iri(&self) -> &str {
        self.type_iri
            .as_deref()
            .unwrap_or_else(|| self.class.type_name())
    }

    /// The `@type` string recorded on decode, if any.
    pub fn observed_type_iri(&self) -> Option<&str> {
        self.type_iri.as_deref()
    }

    pub fn set_type_iri(&mut self, type_iri: impl Into<String>) {
        self.type_iri = Some(type_iri.into());
    }

    pub fn clear_type_iri(&mut self) {
        self.type_iri = None;
    }

    // =========================================================================
    // PROPERTY ACCESS
    // =========================================================================

    /// Every property descriptor paired with its slot, base class first.
    pub fn slots(&self) -> impl Iterator<Item = (&Arc<PropertyDescriptor>, &Slot)> {
        self.class.layout().iter().zip(self.slots.iter())
    }

    /// Looks up a slot by property name, IRI or compact alias.
    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.class.slot_index(key).map(|idx| &self.slots[idx])
    }

    pub fn slot_mut(&mut self, key: &str) -> Option<&mut Slot> {
        let idx = self.class.slot_index(key)?;
        self.slots.get_mut(idx)
    }

    pub(crate) fn slot_at_mut(&mut self, idx: usize) -> Option<&mut Slot> {
        self.slots.get_mut(idx)
    }

    fn slot_for(&self, key: &str) -> Result<&Slot, Error> {
        self.slot(key).ok_or_else(|| Error::UnknownProperty {
            class: self.class.iri().to_string(),
            name: key.to_string(),
        })
    }

    fn slot_for_mut(&mut self, key: &str) -> Result<&mut Slot, Error> {
        match self.class.slot_index(key) {
            Some(idx) => Ok(&mut self.slots[idx]),
            None => Err(Error::UnknownProperty {
                class: self.class.iri().to_string(),
                name: key.to_string(),
            }),
        }
    }

    pub fn property<T: SlotValue>(&self, key: &str) -> Result<&Property<T>, Error> {
        let slot = self.slot_for(key)?;
        T::scalar(slot).ok_or_else(|| kind_error(key, T::KIND, slot.kind_name()))
    }

    pub fn property_mut<T: SlotValue>(&mut self, key: &str) -> Result<&mut Property<T>, Error> {
        let slot = self.slot_for_mut(key)?;
        let found = slot.kind_name();
        T::scalar_mut(slot).ok_or_else(|| kind_error(key, T::KIND, found))
    }

    pub fn list_property<T: SlotValue>(&self, key: &str) -> Result<&ListProperty<T>, Error> {
        let slot = self.slot_for(key)?;
        T::list(slot).ok_or_else(|| kind_error(key, T::KIND, slot.kind_name()))
    }

    pub fn list_property_mut<T: SlotValue>(
        &mut self,
        key: &str,
    ) -> Result<&mut ListProperty<T>, Error> {
        let slot = self.slot_for_mut(key)?;
        let found = slot.kind_name();
        T::list_mut(slot).ok_or_else(|| kind_error(key, T::KIND, found))
    }

    pub fn ref_property(&self, key: &str) -> Result<&RefProperty, Error> {
        match self.slot_for(key)? {
            Slot::Ref(p) => Ok(p),
            other => Err(kind_error(key, "reference", other.kind_name())),
        }
    }

    pub fn ref_property_mut(&mut self, key: &str) -> Result<&mut RefProperty, Error> {
        match self.slot_for_mut(key)? {
            Slot::Ref(p) => Ok(p),
            other => Err(kind_error(key, "reference", other.kind_name())),
        }
    }

    pub fn ref_list_property(&self, key: &str) -> Result<&RefListProperty, Error> {
        match self.slot_for(key)? {
            Slot::RefList(p) => Ok(p),
            other => Err(kind_error(key, "reference list", other.kind_name())),
        }
    }

    pub fn ref_list_property_mut(&mut self, key: &str) -> Result<&mut RefListProperty, Error> {
        match self.slot_for_mut(key)? {
            Slot::RefList(p) => Ok(p),
            other => Err(kind_error(key, "reference list", other.kind_name())),
        }
    }

    // =========================================================================
    // EXTENSION PROPERTIES
    // =========================================================================

    pub fn ext_property(&self, key: &str) -> Option<&[AnyValue]> {
        self.extensions.get(key).map(Vec::as_slice)
    }

    /// Extension properties in key order.
    pub fn ext_properties(&self) -> impl Iterator<Item = (&str, &[AnyValue])> {
        self.extensions
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    /// Replaces an extension property. An empty list removes it.
    pub fn set_ext_property(
        &mut self,
        key: impl Into<String>,
        values: Vec<AnyValue>,
    ) -> Result<(), Error> {
        if !self.class.is_extensible() {
            return Err(Error::NotExtensible {
                class: self.class.iri().to_string(),
            });
        }
        let key = key.into();
        if values.is_empty() {
            self.extensions.remove(&key);
        } else {
            self.extensions.insert(key, values);
        }
        Ok(())
    }

    pub fn delete_ext_property(&mut self, key: &str) {
        self.extensions.remove(key);
    }

    pub(crate) fn insert_extension(&mut self, key: String, values: Vec<AnyValue>) {
        self.extensions.insert(key, values);
    }

    // =========================================================================
    // VALIDATION AND TRAVERSAL
    // =========================================================================

    fn check_node_kind(&self, path: &Path, handler: &mut dyn ErrorHandler) -> bool {
        let kind = self.class.node_kind();
        let id = self.id.get();
        let valid = match kind {
            NodeKind::BlankNode => id.is_none_or(|id| is_blank_node(id)),
            NodeKind::Iri => id.is_some_and(|id| is_iri(id)),
            NodeKind::BlankNodeOrIri => id.is_none_or(|id| is_blank_node(id) || is_iri(id)),
        };
        if !valid {
            handler.handle_error(
                &ValidationError::new("id", ValidationReason::NodeKind(kind)),
                &path.push_path("id"),
            );
        }
        valid
    }

    /// Validates this object only: node kind, then each property's
    /// validators, then required-ness and list cardinality.
    ///
    /// Referenced objects are not descended into; see
    /// [`ObjectSet::validate`](crate::model::ObjectSet::validate).
    pub fn validate(&self, path: &Path, handler: &mut dyn ErrorHandler) -> bool {
        let mut valid = self.check_node_kind(path, handler);

        for (desc, slot) in self.slots() {
            let prop_path = path.push_path(desc.name());
            if !slot.check(&prop_path, handler) {
                valid = false;
            }

            let reason = if desc.is_list() {
                let len = slot.len();
                match (desc.min_count(), desc.max_count()) {
                    (Some(min), _) if len < min => Some(ValidationReason::TooFew { min }),
                    (_, Some(max)) if len > max => Some(ValidationReason::TooMany { max }),
                    _ => None,
                }
            } else if desc.is_required() && !slot.is_set() {
                Some(ValidationReason::Required)
            } else {
                None
            };

            if let Some(reason) = reason {
                handler.handle_error(&ValidationError::new(desc.name(), reason), &prop_path);
                valid = false;
            }
        }

        valid
    }

    /// Visits the identifier and every set property value.
    pub fn walk<'a>(&'a self, path: &Path, visit: &mut dyn FnMut(&Path, Visit<'a>)) {
        self.id.walk(path, visit);
        for slot in &self.slots {
            slot.walk(path, visit);
        }
    }
}

fn kind_error(key: &str, expected: &'static str, found: &'static str) -> Error {
    Error::PropertyKind {
        name: key.to_string(),
        expected,
        found,
    }
}

impl fmt::Debug for ShaclObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaclObject")
            .field("class", &self.class.iri())
            .field("id", &self.id.get())
            .field("type_iri", &self.type_iri)
            .field(
                "properties",
                &self
                    .slots
                    .iter()
                    .filter(|slot| slot.is_set())
                    .collect::<Vec<_>>(),
            )
            .field("extensions", &self.extensions)
            .finish()
    }
}
