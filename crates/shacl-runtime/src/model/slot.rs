//! Per-object property storage.
//!
//! Every declared property of a class is backed by one [`Slot`]. The variant
//! is fixed when the class is built, so decode, encode and validation reach
//! the typed container through exhaustive matching.

use crate::model::property::{ListProperty, Property, RefListProperty, RefProperty, Visit};
use crate::model::Path;
use crate::util::DateTime;
use crate::validate::ErrorHandler;

#[derive(Debug, Clone)]
pub enum Slot {
    String(Property<String>),
    StringList(ListProperty<String>),
    Boolean(Property<bool>),
    BooleanList(ListProperty<bool>),
    Integer(Property<i64>),
    IntegerList(ListProperty<i64>),
    Float(Property<f64>),
    FloatList(ListProperty<f64>),
    DateTime(Property<DateTime>),
    DateTimeList(ListProperty<DateTime>),
    Ref(RefProperty),
    RefList(RefListProperty),
}

macro_rules! each_slot {
    ($slot:expr, $p:ident => $body:expr) => {
        match $slot {
            Slot::String($p) => $body,
            Slot::StringList($p) => $body,
            Slot::Boolean($p) => $body,
            Slot::BooleanList($p) => $body,
            Slot::Integer($p) => $body,
            Slot::IntegerList($p) => $body,
            Slot::Float($p) => $body,
            Slot::FloatList($p) => $body,
            Slot::DateTime($p) => $body,
            Slot::DateTimeList($p) => $body,
            Slot::Ref($p) => $body,
            Slot::RefList($p) => $body,
        }
    };
}

impl Slot {
    pub fn name(&self) -> &str {
        each_slot!(self, p => p.name())
    }

    pub fn is_set(&self) -> bool {
        each_slot!(self, p => p.is_set())
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Slot::StringList(_)
                | Slot::BooleanList(_)
                | Slot::IntegerList(_)
                | Slot::FloatList(_)
                | Slot::DateTimeList(_)
                | Slot::RefList(_)
        )
    }

    /// Number of stored values: the element count for lists, 0 or 1 otherwise.
    pub fn len(&self) -> usize {
        match self {
            Slot::StringList(p) => p.len(),
            Slot::BooleanList(p) => p.len(),
            Slot::IntegerList(p) => p.len(),
            Slot::FloatList(p) => p.len(),
            Slot::DateTimeList(p) => p.len(),
            Slot::RefList(p) => p.len(),
            _ => usize::from(self.is_set()),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.is_set()
    }

    pub fn delete(&mut self) {
        each_slot!(self, p => p.delete())
    }

    /// Runs the validator chain; `path` is the property's own path.
    pub fn check(&self, path: &Path, handler: &mut dyn ErrorHandler) -> bool {
        each_slot!(self, p => p.check(path, handler))
    }

    /// Visits stored values; `path` is the owning object's path.
    pub fn walk<'a>(&'a self, path: &Path, visit: &mut dyn FnMut(&Path, Visit<'a>)) {
        each_slot!(self, p => p.walk(path, visit))
    }

    /// Human-readable name of the stored kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Slot::String(_) => "string",
            Slot::StringList(_) => "string list",
            Slot::Boolean(_) => "boolean",
            Slot::BooleanList(_) => "boolean list",
            Slot::Integer(_) => "integer",
            Slot::IntegerList(_) => "integer list",
            Slot::Float(_) => "float",
            Slot::FloatList(_) => "float list",
            Slot::DateTime(_) => "date-time",
            Slot::DateTimeList(_) => "date-time list",
            Slot::Ref(_) => "reference",
            Slot::RefList(_) => "reference list",
        }
    }
}

/// Scalar types that have a scalar and a list slot variant.
pub trait SlotValue: Sized + 'static {
    const KIND: &'static str;

    fn scalar(slot: &Slot) -> Option<&Property<Self>>;
    fn scalar_mut(slot: &mut Slot) -> Option<&mut Property<Self>>;
    fn list(slot: &Slot) -> Option<&ListProperty<Self>>;
    fn list_mut(slot: &mut Slot) -> Option<&mut ListProperty<Self>>;
}

macro_rules! impl_slot_value {
    ($ty:ty, $scalar:ident, $list:ident, $kind:literal) => {
        impl SlotValue for $ty {
            const KIND: &'static str = $kind;

            fn scalar(slot: &Slot) -> Option<&Property<Self>> {
                match slot {
                    Slot::$scalar(p) => Some(p),
                    _ => None,
                }
            }

            fn scalar_mut(slot: &mut Slot) -> Option<&mut Property<Self>> {
                match slot {
                    Slot::$scalar(p) => Some(p),
                    _ => None,
                }
            }

            fn list(slot: &Slot) -> Option<&ListProperty<Self>> {
                match slot {
                    Slot::$list(p) => Some(p),
                    _ => None,
                }
            }

            fn list_mut(slot: &mut Slot) -> Option<&mut ListProperty<Self>> {
                match slot {
                    Slot::$list(p) => Some(p),
                    _ => None,
                }
            }
        }
    };
}

impl_slot_value!(String, String, StringList, "string");
impl_slot_value!(bool, Boolean, BooleanList, "boolean");
impl_slot_value!(i64, Integer, IntegerList, "integer");
impl_slot_value!(f64, Float, FloatList, "float");
impl_slot_value!(DateTime, DateTime, DateTimeList, "date-time");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_len_and_delete() {
        let mut slot = Slot::IntegerList(ListProperty::new("n"));
        if let Slot::IntegerList(p) = &mut slot {
            p.set(vec![1, 2, 3]).unwrap();
        }
        assert!(slot.is_list());
        assert_eq!(slot.len(), 3);

        slot.delete();
        assert_eq!(slot.len(), 0);
        assert!(!slot.is_set());

        let mut scalar = Slot::Boolean(Property::new("b"));
        assert_eq!(scalar.len(), 0);
        if let Some(p) = bool::scalar_mut(&mut scalar) {
            p.set(false).unwrap();
        }
        assert_eq!(scalar.len(), 1);
        assert_eq!(scalar.name(), "b");
    }

    #[test]
    fn test_slot_value_kind_mismatch() {
        let slot = Slot::String(Property::new("s"));
        assert!(String::scalar(&slot).is_some());
        assert!(String::list(&slot).is_none());
        assert!(i64::scalar(&slot).is_none());
        assert_eq!(slot.kind_name(), "string");
    }
}
