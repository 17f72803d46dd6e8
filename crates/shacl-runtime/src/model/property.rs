//! Typed property containers.
//!
//! Four shapes cover every declared property:
//! - [`Property<T>`]: optional scalar
//! - [`ListProperty<T>`]: ordered sequence
//! - [`RefProperty`]: one [`Ref`] to an object of a declared class
//! - [`RefListProperty`]: ordered sequence of references
//!
//! Each owns its name, its validator chain and its current value. `set`
//! runs validators fail-fast and keeps the old value on failure; `check`
//! re-runs every validator against the stored value and reports all
//! failures.

use std::sync::Arc;

use crate::error::{ConversionError, Error, ValidationError, ValidationReason};
use crate::model::{Path, Ref};
use crate::util::{is_blank_node, is_iri, DateTime};
use crate::validate::{ErrorHandler, Validator};

/// A value handed to a walk visitor.
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    String(&'a str),
    Boolean(bool),
    Integer(i64),
    Float(f64),
    DateTime(&'a DateTime),
    Ref(&'a Ref),
}

/// Values that can be reported to a walk visitor.
pub trait Walkable {
    fn visit(&self) -> Visit<'_>;
}

impl Walkable for String {
    fn visit(&self) -> Visit<'_> {
        Visit::String(self)
    }
}

impl Walkable for bool {
    fn visit(&self) -> Visit<'_> {
        Visit::Boolean(*self)
    }
}

impl Walkable for i64 {
    fn visit(&self) -> Visit<'_> {
        Visit::Integer(*self)
    }
}

impl Walkable for f64 {
    fn visit(&self) -> Visit<'_> {
        Visit::Float(*self)
    }
}

impl Walkable for DateTime {
    fn visit(&self) -> Visit<'_> {
        Visit::DateTime(self)
    }
}

impl Walkable for Ref {
    fn visit(&self) -> Visit<'_> {
        Visit::Ref(self)
    }
}

fn run_validators<T>(
    validators: &[Arc<dyn Validator<T>>],
    value: &T,
    name: &str,
) -> Result<(), ValidationError> {
    for validator in validators {
        validator.check(value, name)?;
    }
    Ok(())
}

fn check_validators<T>(
    validators: &[Arc<dyn Validator<T>>],
    value: &T,
    name: &str,
    path: &Path,
    handler: &mut dyn ErrorHandler,
) -> bool {
    let mut valid = true;
    for validator in validators {
        if let Err(err) = validator.check(value, name) {
            handler.handle_error(&err, path);
            valid = false;
        }
    }
    valid
}

// =============================================================================
// SCALAR
// =============================================================================

/// An optional scalar value.
#[derive(Debug, Clone)]
pub struct Property<T> {
    name: Arc<str>,
    value: Option<T>,
    validators: Vec<Arc<dyn Validator<T>>>,
}

impl<T> Property<T> {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            value: None,
            validators: Vec::new(),
        }
    }

    /// Appends a validator to the chain.
    pub fn with_validator(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub(crate) fn with_validators(mut self, validators: Vec<Arc<dyn Validator<T>>>) -> Self {
        self.validators = validators;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Replaces the value after every validator accepts it.
    pub fn set(&mut self, value: T) -> Result<(), ValidationError> {
        run_validators(&self.validators, &value, &self.name)?;
        self.value = Some(value);
        Ok(())
    }

    /// Stores a decoded value; validators run later during validation.
    pub(crate) fn assign(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn delete(&mut self) {
        self.value = None;
    }

    /// Re-runs every validator, reporting each failure at `path`.
    ///
    /// `path` is the path of the property itself.
    pub fn check(&self, path: &Path, handler: &mut dyn ErrorHandler) -> bool {
        match &self.value {
            Some(value) => check_validators(&self.validators, value, &self.name, path, handler),
            None => true,
        }
    }
}

impl<T: Walkable> Property<T> {
    /// Visits the value, if set, at `path` extended with the property name.
    pub fn walk<'a>(&'a self, path: &Path, visit: &mut dyn FnMut(&Path, Visit<'a>)) {
        if let Some(value) = &self.value {
            visit(&path.push_path(&*self.name), value.visit());
        }
    }
}

// =============================================================================
// LIST
// =============================================================================

/// An ordered sequence of values. Empty means unset.
#[derive(Debug, Clone)]
pub struct ListProperty<T> {
    name: Arc<str>,
    values: Vec<T>,
    validators: Vec<Arc<dyn Validator<T>>>,
}

impl<T> ListProperty<T> {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            validators: Vec::new(),
        }
    }

    pub fn with_validator(mut self, validator: impl Validator<T> + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub(crate) fn with_validators(mut self, validators: Vec<Arc<dyn Validator<T>>>) -> Self {
        self.validators = validators;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self) -> &[T] {
        &self.values
    }

    pub fn is_set(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replaces the whole list after every element passes every validator.
    pub fn set(&mut self, values: Vec<T>) -> Result<(), ValidationError> {
        for value in &values {
            run_validators(&self.validators, value, &self.name)?;
        }
        self.values = values;
        Ok(())
    }

    /// Appends one validated element.
    pub fn push(&mut self, value: T) -> Result<(), ValidationError> {
        run_validators(&self.validators, &value, &self.name)?;
        self.values.push(value);
        Ok(())
    }

    pub(crate) fn assign(&mut self, values: Vec<T>) {
        self.values = values;
    }

    pub fn delete(&mut self) {
        self.values.clear();
    }

    /// Checks each element, reporting failures at `path.[idx]`.
    pub fn check(&self, path: &Path, handler: &mut dyn ErrorHandler) -> bool {
        let mut valid = true;
        for (idx, value) in self.values.iter().enumerate() {
            if !check_validators(&self.validators, value, &self.name, &path.push_index(idx), handler) {
                valid = false;
            }
        }
        valid
    }
}

impl<T: Walkable> ListProperty<T> {
    /// Visits each element at `path.name.[idx]`.
    pub fn walk<'a>(&'a self, path: &Path, visit: &mut dyn FnMut(&Path, Visit<'a>)) {
        let sub_path = path.push_path(&*self.name);
        for (idx, value) in self.values.iter().enumerate() {
            visit(&sub_path.push_index(idx), value.visit());
        }
    }
}

// =============================================================================
// REFERENCES
// =============================================================================

/// Rejects references that cannot live in a property of class `class`.
fn check_ref(value: &Ref, name: &str, class: &str) -> Result<(), Error> {
    match value {
        Ref::Unset => Ok(()),
        Ref::Iri(iri) => {
            if is_iri(iri) || is_blank_node(iri) {
                Ok(())
            } else {
                Err(ValidationError::new(name, ValidationReason::NotIriOrBlank).into())
            }
        }
        Ref::Object(obj) => {
            if obj.class().is_subclass_of(class) {
                Ok(())
            } else {
                Err(ConversionError {
                    from: obj.class().iri().to_string(),
                    to: class.to_string(),
                }
                .into())
            }
        }
    }
}

/// A reference to an object of `class` (or a subclass), or to an IRI.
#[derive(Debug, Clone)]
pub struct RefProperty {
    name: Arc<str>,
    class: Arc<str>,
    value: Ref,
}

impl RefProperty {
    pub fn new(name: impl Into<Arc<str>>, class: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            value: Ref::Unset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical IRI of the class referenced objects must derive from.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn get(&self) -> &Ref {
        &self.value
    }

    pub fn get_mut(&mut self) -> &mut Ref {
        &mut self.value
    }

    pub fn is_set(&self) -> bool {
        self.value.is_set()
    }

    pub fn is_obj(&self) -> bool {
        self.value.is_obj()
    }

    pub fn is_iri(&self) -> bool {
        self.value.is_iri()
    }

    /// See [`Ref::get_iri`].
    pub fn get_iri(&self) -> Option<&str> {
        self.value.get_iri()
    }

    /// Replaces the reference. Objects must be of the declared class and
    /// IRIs must be IRI- or blank-node-shaped.
    pub fn set(&mut self, value: Ref) -> Result<(), Error> {
        check_ref(&value, &self.name, &self.class)?;
        self.value = value;
        Ok(())
    }

    pub(crate) fn assign(&mut self, value: Ref) {
        self.value = value;
    }

    pub fn delete(&mut self) {
        self.value = Ref::Unset;
    }

    pub fn check(&self, _path: &Path, _handler: &mut dyn ErrorHandler) -> bool {
        true
    }

    pub fn walk<'a>(&'a self, path: &Path, visit: &mut dyn FnMut(&Path, Visit<'a>)) {
        if self.value.is_set() {
            visit(&path.push_path(&*self.name), Visit::Ref(&self.value));
        }
    }
}

/// An ordered sequence of references to objects of `class`.
#[derive(Debug, Clone)]
pub struct RefListProperty {
    name: Arc<str>,
    class: Arc<str>,
    values: Vec<Ref>,
}

impl RefListProperty {
    pub fn new(name: impl Into<Arc<str>>, class: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            class: class.into(),
            values: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn get(&self) -> &[Ref] {
        &self.values
    }

    pub fn get_mut(&mut self) -> &mut [Ref] {
        &mut self.values
    }

    pub fn is_set(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn set(&mut self, values: Vec<Ref>) -> Result<(), Error> {
        for value in &values {
            check_ref(value, &self.name, &self.class)?;
        }
        self.values = values;
        Ok(())
    }

    pub fn push(&mut self, value: Ref) -> Result<(), Error> {
        check_ref(&value, &self.name, &self.class)?;
        self.values.push(value);
        Ok(())
    }

    pub(crate) fn assign(&mut self, values: Vec<Ref>) {
        self.values = values;
    }

    pub fn delete(&mut self) {
        self.values.clear();
    }

    pub fn check(&self, _path: &Path, _handler: &mut dyn ErrorHandler) -> bool {
        true
    }

    pub fn walk<'a>(&'a self, path: &Path, visit: &mut dyn FnMut(&Path, Visit<'a>)) {
        let sub_path = path.push_path(&*self.name);
        for (idx, value) in self.values.iter().enumerate() {
            visit(&sub_path.push_index(idx), Visit::Ref(value));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{IntegerMinValidator, RegexValidator};

    #[test]
    fn test_set_is_fail_fast_and_keeps_old_value() {
        let mut prop = Property::<String>::new("regex")
            .with_validator(RegexValidator::new(r"^foo\d").unwrap());

        prop.set("foo1".to_string()).unwrap();
        let err = prop.set("bar".to_string()).unwrap_err();

        assert_eq!(err.property, "regex");
        assert_eq!(prop.get().map(String::as_str), Some("foo1"));
    }

    #[test]
    fn test_check_reports_every_failure() {
        let mut prop = Property::<i64>::new("n")
            .with_validator(IntegerMinValidator { min: 5 })
            .with_validator(RegexValidator::new(r"^\d{2}$").unwrap());
        prop.assign(3);

        let mut errors: Vec<(Path, ValidationError)> = Vec::new();
        let path = Path::root().push_path("n");
        assert!(!prop.check(&path, &mut errors));
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|(p, _)| p.to_string() == ".n"));
    }

    #[test]
    fn test_unset_property_is_not_walked() {
        let mut prop = Property::<bool>::new("flag");
        let mut seen = Vec::new();
        prop.walk(&Path::root(), &mut |p, v| seen.push((p.to_string(), format!("{:?}", v))));
        assert!(seen.is_empty());

        prop.set(false).unwrap();
        prop.walk(&Path::root(), &mut |p, v| seen.push((p.to_string(), format!("{:?}", v))));
        assert_eq!(seen, vec![(".flag".to_string(), "Boolean(false)".to_string())]);
    }

    #[test]
    fn test_list_check_uses_indexed_paths() {
        let mut prop = ListProperty::<i64>::new("list").with_validator(IntegerMinValidator { min: 0 });
        prop.assign(vec![1, -1, 2, -3]);

        let mut errors: Vec<(Path, ValidationError)> = Vec::new();
        assert!(!prop.check(&Path::root().push_path("list"), &mut errors));
        let paths: Vec<String> = errors.iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(paths, vec![".list.[1]", ".list.[3]"]);
    }

    #[test]
    fn test_list_set_rejects_whole_list() {
        let mut prop = ListProperty::<i64>::new("list").with_validator(IntegerMinValidator { min: 0 });
        prop.set(vec![1, 2]).unwrap();
        assert!(prop.set(vec![3, -1]).is_err());
        assert_eq!(prop.get(), &[1, 2]);

        prop.push(4).unwrap();
        assert_eq!(prop.len(), 3);
        prop.delete();
        assert!(!prop.is_set());
    }

    #[test]
    fn test_list_walk_paths() {
        let mut prop = ListProperty::<String>::new("names");
        prop.set(vec!["a".to_string(), "b".to_string()]).unwrap();

        let mut paths = Vec::new();
        prop.walk(&Path::root().push_index(0), &mut |p, _| paths.push(p.to_string()));
        assert_eq!(paths, vec![".[0].names.[0]", ".[0].names.[1]"]);
    }

    #[test]
    fn test_ref_property_iri_shape() {
        let mut prop = RefProperty::new("link", "http://example.org/link-class");
        prop.set(Ref::iri("http://example.org/target")).unwrap();
        assert!(prop.is_iri());
        assert_eq!(prop.get_iri(), Some("http://example.org/target"));

        let err = prop.set(Ref::iri("not an iri")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(prop.is_iri());

        prop.delete();
        assert!(!prop.is_set());
        assert_eq!(prop.get_iri(), None);
    }
}
