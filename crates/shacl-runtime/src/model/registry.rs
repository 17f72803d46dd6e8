//! Type registry.
//!
//! Generated model code declares its classes with [`TypeDef`] and
//! [`PropertyDef`], registers them on a [`RegistryBuilder`] and calls
//! [`build`](RegistryBuilder::build) once. The resulting [`Registry`] is
//! read-only and can be shared across threads behind an [`Arc`].

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{Error, RegistryError};
use crate::model::descriptor::{NodeKind, PropertyDescriptor, TypeDescriptor, ValueKind};
use crate::model::property::{ListProperty, Property, RefListProperty, RefProperty};
use crate::model::{Context, ShaclObject, Slot};
use crate::util::DateTime;
use crate::validate::{
    EnumValidator, IntegerMaxValidator, IntegerMinValidator, RegexValidator, Validator,
};

// =============================================================================
// DECLARATIONS
// =============================================================================

/// A value constraint declared on a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Pattern(String),
    MinInclusive(i64),
    MaxInclusive(i64),
    /// Allowed values, as full IRIs.
    In(Vec<String>),
}

impl Constraint {
    fn name(&self) -> &'static str {
        match self {
            Constraint::Pattern(_) => "pattern",
            Constraint::MinInclusive(_) => "minInclusive",
            Constraint::MaxInclusive(_) => "maxInclusive",
            Constraint::In(_) => "in",
        }
    }
}

/// Declaration of a property.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    name: String,
    iri: String,
    compact: Option<String>,
    kind: ValueKind,
    list: bool,
    min_count: Option<usize>,
    max_count: Option<usize>,
    context: Vec<(String, String)>,
    constraints: Vec<Constraint>,
}

impl PropertyDef {
    /// Declares a property named `name` stored under `iri`.
    pub fn new(name: impl Into<String>, iri: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            iri: iri.into(),
            compact: None,
            kind,
            list: false,
            min_count: None,
            max_count: None,
            context: Vec::new(),
            constraints: Vec::new(),
        }
    }

    pub fn compact(mut self, compact: impl Into<String>) -> Self {
        self.compact = Some(compact.into());
        self
    }

    /// Makes this a list property.
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    pub fn min_count(mut self, min: usize) -> Self {
        self.min_count = Some(min);
        self
    }

    pub fn max_count(mut self, max: usize) -> Self {
        self.max_count = Some(max);
        self
    }

    /// Marks a scalar property as required.
    pub fn required(self) -> Self {
        self.min_count(1)
    }

    /// Adds a `(full IRI, compact token)` pair to the compaction context.
    pub fn context_entry(mut self, full: impl Into<String>, compact: impl Into<String>) -> Self {
        self.context.push((full.into(), compact.into()));
        self
    }

    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.constraints.push(Constraint::Pattern(pattern.into()));
        self
    }

    pub fn min_inclusive(mut self, min: i64) -> Self {
        self.constraints.push(Constraint::MinInclusive(min));
        self
    }

    pub fn max_inclusive(mut self, max: i64) -> Self {
        self.constraints.push(Constraint::MaxInclusive(max));
        self
    }

    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints
            .push(Constraint::In(values.into_iter().map(Into::into).collect()));
        self
    }
}

/// Declaration of a class.
#[derive(Debug, Clone)]
pub struct TypeDef {
    iri: String,
    compact: Option<String>,
    node_kind: Option<NodeKind>,
    id_alias: Option<String>,
    is_abstract: bool,
    extensible: Option<bool>,
    parents: Vec<String>,
    properties: Vec<PropertyDef>,
}

impl TypeDef {
    pub fn new(iri: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            compact: None,
            node_kind: None,
            id_alias: None,
            is_abstract: false,
            extensible: None,
            parents: Vec::new(),
            properties: Vec::new(),
        }
    }

    pub fn compact(mut self, compact: impl Into<String>) -> Self {
        self.compact = Some(compact.into());
        self
    }

    pub fn node_kind(mut self, kind: NodeKind) -> Self {
        self.node_kind = Some(kind);
        self
    }

    pub fn id_alias(mut self, alias: impl Into<String>) -> Self {
        self.id_alias = Some(alias.into());
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extensible(mut self, extensible: bool) -> Self {
        self.extensible = Some(extensible);
        self
    }

    /// Adds a parent, by canonical IRI or compact alias.
    pub fn parent(mut self, iri: impl Into<String>) -> Self {
        self.parents.push(iri.into());
        self
    }

    pub fn property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Collects class declarations before resolution.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    context_url: String,
    defs: FxHashMap<String, TypeDef>,
    aliases: FxHashMap<String, String>,
    order: Vec<String>,
}

impl RegistryBuilder {
    pub fn new(context_url: impl Into<String>) -> Self {
        Self {
            context_url: context_url.into(),
            defs: FxHashMap::default(),
            aliases: FxHashMap::default(),
            order: Vec::new(),
        }
    }

    /// Registers a class under its IRI and compact alias. Later registrations
    /// replace earlier ones on either key.
    pub fn register(mut self, def: TypeDef) -> Self {
        if let Some(compact) = &def.compact {
            self.aliases.insert(compact.clone(), def.iri.clone());
        }
        if !self.defs.contains_key(&def.iri) {
            self.order.push(def.iri.clone());
        }
        self.defs.insert(def.iri.clone(), def);
        self
    }

    fn canonical<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        if self.defs.contains_key(key) {
            Some(key)
        } else {
            self.aliases.get(key).map(String::as_str)
        }
    }

    /// Resolves parents, flattens property layouts and compiles validators.
    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut resolved: FxHashMap<String, Arc<TypeDescriptor>> = FxHashMap::default();
        let mut in_progress: FxHashSet<String> = FxHashSet::default();

        for iri in &self.order {
            self.resolve(iri, &mut resolved, &mut in_progress)?;
        }

        let mut classes = Vec::with_capacity(self.order.len());
        let mut index = FxHashMap::default();
        for iri in &self.order {
            if let Some(class) = resolved.get(iri) {
                index.insert(iri.clone(), classes.len());
                classes.push(class.clone());
            }
        }
        for (compact, iri) in &self.aliases {
            if let Some(&idx) = index.get(iri) {
                index.insert(compact.clone(), idx);
            }
        }

        for class in &classes {
            for property in class.properties() {
                if let ValueKind::Object(target) = property.kind() {
                    if !index.contains_key(target) {
                        return Err(RegistryError::UnknownClass {
                            property: property.iri().to_string(),
                            class: target.clone(),
                        });
                    }
                }
            }
        }

        debug!(classes = classes.len(), context = %self.context_url, "type registry built");

        Ok(Registry {
            context_url: self.context_url,
            classes,
            index,
        })
    }

    fn resolve(
        &self,
        iri: &str,
        resolved: &mut FxHashMap<String, Arc<TypeDescriptor>>,
        in_progress: &mut FxHashSet<String>,
    ) -> Result<Arc<TypeDescriptor>, RegistryError> {
        if let Some(class) = resolved.get(iri) {
            return Ok(class.clone());
        }
        if !in_progress.insert(iri.to_string()) {
            return Err(RegistryError::Cycle {
                class: iri.to_string(),
            });
        }

        let def = self.defs.get(iri).ok_or_else(|| RegistryError::UnknownParent {
            class: iri.to_string(),
            parent: iri.to_string(),
        })?;

        let mut parents = Vec::with_capacity(def.parents.len());
        for parent in &def.parents {
            let canonical = self.canonical(parent).ok_or_else(|| RegistryError::UnknownParent {
                class: def.iri.clone(),
                parent: parent.clone(),
            })?;
            parents.push(self.resolve(canonical, resolved, in_progress)?);
        }

        let properties = def
            .properties
            .iter()
            .map(|p| compile_property(p).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;

        let class = Arc::new(layout_class(def, parents, properties));
        in_progress.remove(iri);
        resolved.insert(iri.to_string(), class.clone());
        Ok(class)
    }
}

fn layout_class(
    def: &TypeDef,
    parents: Vec<Arc<TypeDescriptor>>,
    properties: Vec<Arc<PropertyDescriptor>>,
) -> TypeDescriptor {
    let mut layout: Vec<Arc<PropertyDescriptor>> = Vec::new();
    let mut seen: FxHashSet<*const PropertyDescriptor> = FxHashSet::default();
    for property in parents
        .iter()
        .flat_map(|parent| parent.layout.iter())
        .chain(properties.iter())
    {
        if seen.insert(Arc::as_ptr(property)) {
            layout.push(property.clone());
        }
    }

    let mut key_index = FxHashMap::default();
    let mut name_index = FxHashMap::default();
    for (idx, property) in layout.iter().enumerate() {
        key_index.insert(property.iri.clone(), idx);
        if let Some(compact) = &property.compact {
            key_index.insert(compact.clone(), idx);
        }
        name_index.insert(property.name.to_string(), idx);
    }

    TypeDescriptor {
        iri: def.iri.clone(),
        compact: def.compact.clone(),
        node_kind: def.node_kind,
        id_alias: def.id_alias.clone(),
        is_abstract: def.is_abstract,
        extensible: def.extensible,
        parents,
        properties,
        layout,
        key_index,
        name_index,
    }
}

// =============================================================================
// VALIDATOR COMPILATION
// =============================================================================

fn invalid_constraint(def: &PropertyDef, constraint: &Constraint) -> RegistryError {
    RegistryError::InvalidConstraint {
        property: def.iri.clone(),
        constraint: constraint.name(),
        kind: def.kind.name(),
    }
}

fn regex(def: &PropertyDef, pattern: &str) -> Result<RegexValidator, RegistryError> {
    RegexValidator::new(pattern).map_err(|e| RegistryError::InvalidPattern {
        property: def.iri.clone(),
        message: e.to_string(),
    })
}

fn string_validators(def: &PropertyDef) -> Result<Vec<Arc<dyn Validator<String>>>, RegistryError> {
    let mut validators: Vec<Arc<dyn Validator<String>>> = Vec::new();
    for constraint in &def.constraints {
        match constraint {
            Constraint::Pattern(pattern) => validators.push(Arc::new(regex(def, pattern)?)),
            Constraint::In(values) => validators.push(Arc::new(EnumValidator::new(values.clone()))),
            other => return Err(invalid_constraint(def, other)),
        }
    }
    Ok(validators)
}

fn integer_validators(def: &PropertyDef) -> Result<Vec<Arc<dyn Validator<i64>>>, RegistryError> {
    let mut validators: Vec<Arc<dyn Validator<i64>>> = Vec::new();
    for constraint in &def.constraints {
        match constraint {
            Constraint::Pattern(pattern) => validators.push(Arc::new(regex(def, pattern)?)),
            Constraint::MinInclusive(min) => {
                validators.push(Arc::new(IntegerMinValidator { min: *min }))
            }
            Constraint::MaxInclusive(max) => {
                validators.push(Arc::new(IntegerMaxValidator { max: *max }))
            }
            other => return Err(invalid_constraint(def, other)),
        }
    }
    Ok(validators)
}

fn datetime_validators(
    def: &PropertyDef,
) -> Result<Vec<Arc<dyn Validator<DateTime>>>, RegistryError> {
    let mut validators: Vec<Arc<dyn Validator<DateTime>>> = Vec::new();
    for constraint in &def.constraints {
        match constraint {
            Constraint::Pattern(pattern) => validators.push(Arc::new(regex(def, pattern)?)),
            other => return Err(invalid_constraint(def, other)),
        }
    }
    Ok(validators)
}

fn no_constraints(def: &PropertyDef) -> Result<(), RegistryError> {
    match def.constraints.first() {
        Some(constraint) => Err(invalid_constraint(def, constraint)),
        None => Ok(()),
    }
}

fn compile_property(def: &PropertyDef) -> Result<PropertyDescriptor, RegistryError> {
    let name: Arc<str> = Arc::from(def.name.as_str());

    let template = match (&def.kind, def.list) {
        (ValueKind::String | ValueKind::Iri, false) => {
            Slot::String(Property::new(name.clone()).with_validators(string_validators(def)?))
        }
        (ValueKind::String | ValueKind::Iri, true) => {
            Slot::StringList(ListProperty::new(name.clone()).with_validators(string_validators(def)?))
        }
        (ValueKind::Integer, false) => {
            Slot::Integer(Property::new(name.clone()).with_validators(integer_validators(def)?))
        }
        (ValueKind::Integer, true) => Slot::IntegerList(
            ListProperty::new(name.clone()).with_validators(integer_validators(def)?),
        ),
        (ValueKind::DateTime | ValueKind::DateTimeStamp, false) => {
            Slot::DateTime(Property::new(name.clone()).with_validators(datetime_validators(def)?))
        }
        (ValueKind::DateTime | ValueKind::DateTimeStamp, true) => Slot::DateTimeList(
            ListProperty::new(name.clone()).with_validators(datetime_validators(def)?),
        ),
        (ValueKind::Boolean, false) => {
            no_constraints(def)?;
            Slot::Boolean(Property::new(name.clone()))
        }
        (ValueKind::Boolean, true) => {
            no_constraints(def)?;
            Slot::BooleanList(ListProperty::new(name.clone()))
        }
        (ValueKind::Float, false) => {
            no_constraints(def)?;
            Slot::Float(Property::new(name.clone()))
        }
        (ValueKind::Float, true) => {
            no_constraints(def)?;
            Slot::FloatList(ListProperty::new(name.clone()))
        }
        (ValueKind::Object(class), false) => {
            no_constraints(def)?;
            Slot::Ref(RefProperty::new(name.clone(), class.as_str()))
        }
        (ValueKind::Object(class), true) => {
            no_constraints(def)?;
            Slot::RefList(RefListProperty::new(name.clone(), class.as_str()))
        }
    };

    Ok(PropertyDescriptor {
        name,
        iri: def.iri.clone(),
        compact: def.compact.clone(),
        kind: def.kind.clone(),
        list: def.list,
        min_count: def.min_count,
        max_count: def.max_count,
        context: Context::from_pairs(def.context.iter().cloned()),
        template,
    })
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Read-only table of resolved classes, keyed by IRI and compact alias.
#[derive(Debug)]
pub struct Registry {
    context_url: String,
    classes: Vec<Arc<TypeDescriptor>>,
    index: FxHashMap<String, usize>,
}

impl Registry {
    pub fn builder(context_url: impl Into<String>) -> RegistryBuilder {
        RegistryBuilder::new(context_url)
    }

    /// The `@context` value documents of this model must carry.
    pub fn context_url(&self) -> &str {
        &self.context_url
    }

    /// Looks up a class by canonical IRI or compact alias.
    pub fn get(&self, iri: &str) -> Option<&Arc<TypeDescriptor>> {
        self.index.get(iri).map(|&idx| &self.classes[idx])
    }

    /// Every class, once each, in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<TypeDescriptor>> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// True if `class` is `parent` or derives from it. Both may be given by
    /// IRI or compact alias; unknown classes are never subclasses.
    pub fn is_subclass_of(&self, class: &str, parent: &str) -> bool {
        match (self.get(class), self.get(parent)) {
            (Some(class), Some(parent)) => class.is_subclass_of(parent.iri()),
            _ => false,
        }
    }

    /// Creates an empty object of a concrete class.
    pub fn create(&self, iri: &str) -> Result<ShaclObject, Error> {
        let class = self.get(iri).ok_or_else(|| Error::UnknownClass {
            class: iri.to_string(),
        })?;
        ShaclObject::new(class)
    }
}
