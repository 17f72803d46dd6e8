//! Typed object decoding and encoding.
//!
//! [`Decoder`] turns a JSON object into a [`ShaclObject`], resolving `@type`
//! through the registry and, for unregistered types, searching the
//! extensible classes valid at that position. [`Encoder`] writes objects
//! back base class first, extensions last.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use serde_json::{Map, Number, Value};
use tracing::{debug, trace};

use crate::codec::value::{
    decode_boolean, decode_datetime, decode_datetime_stamp, decode_float, decode_integer,
    decode_iri, decode_list, decode_string, encode_boolean, encode_datetime, encode_float,
    encode_integer, encode_iri, encode_list, encode_string, json_type_name,
};
use crate::error::{DecodeError, DecodeErrorKind};
use crate::model::{
    AnyValue, Context, Path, PropertyDescriptor, Ref, Registry, ShaclObject, Slot,
    TypeDescriptor, ValueKind,
};
use crate::util::is_iri;
use crate::validate::{IdValidator, Validator};

const TYPE_KEY: &str = "@type";
const ID_KEY: &str = "@id";

// =============================================================================
// DECODING
// =============================================================================

/// Decodes typed objects against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'r> {
    registry: &'r Registry,
    max_depth: usize,
}

impl<'r> Decoder<'r> {
    pub fn new(registry: &'r Registry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Decodes one typed object at `path`.
    ///
    /// With a `target`, the resolved class must derive from it. An
    /// unregistered `@type` is accepted when the target is extensible, or
    /// when some extensible class valid here decodes the object.
    pub fn decode_object(
        &self,
        value: &Value,
        path: &Path,
        target: Option<&Arc<TypeDescriptor>>,
    ) -> Result<ShaclObject, DecodeError> {
        if path.len() > self.max_depth {
            return Err(DecodeError::new(
                path,
                DecodeErrorKind::DepthExceeded {
                    max: self.max_depth,
                },
            ));
        }

        let map = match value {
            Value::Object(map) => map,
            other => {
                return Err(DecodeError::new(
                    path,
                    DecodeErrorKind::ExpectedObject {
                        found: json_type_name(other),
                    },
                ));
            }
        };

        let type_iri = match map.get(TYPE_KEY) {
            Some(Value::String(s)) => s.as_str(),
            Some(other) => {
                return Err(DecodeError::new(
                    path,
                    DecodeErrorKind::TypeNotString {
                        found: json_type_name(other),
                    },
                ));
            }
            None => return Err(DecodeError::new(path, DecodeErrorKind::MissingType)),
        };

        let class = match self.registry.get(type_iri) {
            Some(class) => {
                if let Some(target) = target {
                    if !class.is_subclass_of(target.iri()) {
                        return Err(DecodeError::new(
                            path,
                            DecodeErrorKind::TypeNotValid {
                                type_iri: type_iri.to_string(),
                                expected: target.iri().to_string(),
                            },
                        ));
                    }
                }
                if class.is_abstract() {
                    return Err(DecodeError::new(
                        path,
                        DecodeErrorKind::AbstractType {
                            type_iri: type_iri.to_string(),
                        },
                    ));
                }
                class
            }
            // An extensible target may be abstract.
            None => match target {
                Some(target) if target.is_extensible() => target,
                _ => return self.disambiguate(value, path, type_iri, target),
            },
        };

        let mut obj = ShaclObject::instantiate(class);
        obj.set_type_iri(type_iri);
        self.decode_properties(&mut obj, map, path)?;
        Ok(obj)
    }

    /// Tries each extensible, concrete class valid at this position in IRI
    /// order and keeps the first that decodes.
    fn disambiguate(
        &self,
        value: &Value,
        path: &Path,
        type_iri: &str,
        target: Option<&Arc<TypeDescriptor>>,
    ) -> Result<ShaclObject, DecodeError> {
        if is_iri(type_iri) {
            let mut candidates: Vec<&Arc<TypeDescriptor>> = self
                .registry
                .classes()
                .filter(|class| class.is_extensible() && !class.is_abstract())
                .filter(|class| target.is_none_or(|target| class.is_subclass_of(target.iri())))
                .collect();
            candidates.sort_by(|a, b| a.iri().cmp(b.iri()));

            for candidate in candidates {
                match self.decode_object(value, path, Some(candidate)) {
                    Ok(mut obj) => {
                        debug!(%path, type_iri, chosen = candidate.iri(), "resolved extensible type");
                        obj.set_type_iri(type_iri);
                        return Ok(obj);
                    }
                    Err(err) => {
                        trace!(%path, candidate = candidate.iri(), error = %err, "extensible candidate rejected");
                    }
                }
            }
        }

        Err(DecodeError::new(
            path,
            DecodeErrorKind::NoMatchingExtensible {
                type_iri: type_iri.to_string(),
            },
        ))
    }

    fn decode_properties(
        &self,
        obj: &mut ShaclObject,
        map: &Map<String, Value>,
        path: &Path,
    ) -> Result<(), DecodeError> {
        let class = obj.class().clone();
        let id_alias = class.id_alias();

        for (key, value) in map {
            if key == TYPE_KEY {
                continue;
            }

            let sub_path = path.push_path(key.as_str());

            let is_id = match id_alias {
                Some(alias) if key == alias => true,
                Some(_) if key == ID_KEY => {
                    return Err(DecodeError::new(
                        &sub_path,
                        DecodeErrorKind::IdNotAllowed {
                            class: class.iri().to_string(),
                        },
                    ));
                }
                _ => key == ID_KEY,
            };
            if is_id {
                let id = decode_id(value, &sub_path)?;
                obj.id_mut().assign(id);
                continue;
            }

            if let Some(idx) = class.key_slot(key) {
                let desc = &class.layout()[idx];
                let slot = obj
                    .slot_at_mut(idx)
                    .ok_or_else(|| DecodeError::new(&sub_path, DecodeErrorKind::SlotMismatch))?;
                self.decode_slot(desc, slot, value, &sub_path)?;
                continue;
            }

            if class.is_extensible() {
                let values = match value {
                    Value::Array(_) => decode_list(value, &sub_path, |v, p| self.decode_any(v, p))?,
                    other => vec![self.decode_any(other, &sub_path)?],
                };
                obj.insert_extension(key.clone(), values);
                continue;
            }

            return Err(DecodeError::new(
                path,
                DecodeErrorKind::UnknownProperty { key: key.clone() },
            ));
        }

        Ok(())
    }

    /// Decodes `value` into the slot backing `desc`.
    ///
    /// Values are stored without running the slot's validators; object
    /// validation reports them later.
    fn decode_slot(
        &self,
        desc: &PropertyDescriptor,
        slot: &mut Slot,
        value: &Value,
        path: &Path,
    ) -> Result<(), DecodeError> {
        let context = desc.context();
        match (desc.kind(), slot) {
            (ValueKind::String, Slot::String(p)) => p.assign(decode_string(value, path)?),
            (ValueKind::String, Slot::StringList(p)) => {
                p.assign(decode_list(value, path, decode_string)?)
            }
            (ValueKind::Iri, Slot::String(p)) => p.assign(decode_iri(value, path, context)?),
            (ValueKind::Iri, Slot::StringList(p)) => {
                p.assign(decode_list(value, path, |v, at| decode_iri(v, at, context))?)
            }
            (ValueKind::Boolean, Slot::Boolean(p)) => p.assign(decode_boolean(value, path)?),
            (ValueKind::Boolean, Slot::BooleanList(p)) => {
                p.assign(decode_list(value, path, decode_boolean)?)
            }
            (ValueKind::Integer, Slot::Integer(p)) => p.assign(decode_integer(value, path)?),
            (ValueKind::Integer, Slot::IntegerList(p)) => {
                p.assign(decode_list(value, path, decode_integer)?)
            }
            (ValueKind::Float, Slot::Float(p)) => p.assign(decode_float(value, path)?),
            (ValueKind::Float, Slot::FloatList(p)) => {
                p.assign(decode_list(value, path, decode_float)?)
            }
            (ValueKind::DateTime, Slot::DateTime(p)) => p.assign(decode_datetime(value, path)?),
            (ValueKind::DateTime, Slot::DateTimeList(p)) => {
                p.assign(decode_list(value, path, decode_datetime)?)
            }
            (ValueKind::DateTimeStamp, Slot::DateTime(p)) => {
                p.assign(decode_datetime_stamp(value, path)?)
            }
            (ValueKind::DateTimeStamp, Slot::DateTimeList(p)) => {
                p.assign(decode_list(value, path, decode_datetime_stamp)?)
            }
            (ValueKind::Object(class), Slot::Ref(p)) => {
                let target = self.registry.get(class);
                p.assign(self.decode_ref(value, path, context, target)?)
            }
            (ValueKind::Object(class), Slot::RefList(p)) => {
                let target = self.registry.get(class);
                p.assign(decode_list(value, path, |v, at| {
                    self.decode_ref(v, at, context, target)
                })?)
            }
            _ => return Err(DecodeError::new(path, DecodeErrorKind::SlotMismatch)),
        }
        Ok(())
    }

    /// A string decodes to an IRI reference, anything else to an object.
    pub fn decode_ref(
        &self,
        value: &Value,
        path: &Path,
        context: &Context,
        target: Option<&Arc<TypeDescriptor>>,
    ) -> Result<Ref, DecodeError> {
        match value {
            Value::String(_) => Ok(Ref::Iri(decode_iri(value, path, context)?)),
            _ => Ok(Ref::object(self.decode_object(value, path, target)?)),
        }
    }

    /// Decodes a value of an extension property, inferring its kind from
    /// the JSON shape. Objects decode without a target class.
    pub fn decode_any(&self, value: &Value, path: &Path) -> Result<AnyValue, DecodeError> {
        match value {
            Value::Object(_) => Ok(AnyValue::Ref(Ref::object(
                self.decode_object(value, path, None)?,
            ))),
            Value::String(s) => Ok(AnyValue::String(s.clone())),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(AnyValue::Integer(i)),
                None => Ok(AnyValue::Float(decode_float(value, path)?)),
            },
            Value::Bool(b) => Ok(AnyValue::Boolean(*b)),
            Value::Array(_) => Ok(AnyValue::List(decode_list(value, path, |v, p| {
                self.decode_any(v, p)
            })?)),
            Value::Null => Err(DecodeError::new(
                path,
                DecodeErrorKind::UnsupportedValue { found: "null" },
            )),
        }
    }
}

/// Identifiers decode with an empty context and must be IRI- or
/// blank-node-shaped.
fn decode_id(value: &Value, path: &Path) -> Result<String, DecodeError> {
    let id = decode_string(value, path)?;
    IdValidator
        .check(&id, "id")
        .map_err(|e| DecodeError::new(path, DecodeErrorKind::InvalidId(e)))?;
    Ok(id)
}

// =============================================================================
// ENCODING
// =============================================================================

/// Encodes typed objects.
///
/// An encoder remembers every object it has written in full. A later
/// occurrence of the same object is written as its identifier when it has
/// one, and inlined again otherwise.
#[derive(Debug, Default)]
pub struct Encoder {
    seen: FxHashSet<*const ShaclObject>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `obj` as written so nested occurrences refer to it by IRI.
    pub fn mark_seen(&mut self, obj: &Arc<ShaclObject>) {
        self.seen.insert(Arc::as_ptr(obj));
    }

    /// Writes `@type`, the identifier, every set property in layout order
    /// and finally the extension properties.
    pub fn encode_object(&mut self, obj: &ShaclObject) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(TYPE_KEY.to_string(), Value::String(obj.type_iri().to_string()));

        if let Some(id) = obj.id().get() {
            let key = obj.class().id_alias().unwrap_or(ID_KEY);
            map.insert(key.to_string(), encode_iri(id, &Context::new()));
        }

        for (desc, slot) in obj.slots() {
            if slot.is_set() {
                map.insert(desc.key().to_string(), self.encode_slot(desc, slot));
            }
        }

        for (key, values) in obj.ext_properties() {
            if !values.is_empty() {
                let encoded = values.iter().map(|v| self.encode_any(v)).collect();
                map.insert(key.to_string(), Value::Array(encoded));
            }
        }

        map
    }

    fn encode_slot(&mut self, desc: &PropertyDescriptor, slot: &Slot) -> Value {
        let context = desc.context();
        let iri_valued = matches!(desc.kind(), ValueKind::Iri);
        match slot {
            Slot::String(p) => match p.get() {
                Some(s) if iri_valued => encode_iri(s, context),
                Some(s) => encode_string(s),
                None => Value::Null,
            },
            Slot::StringList(p) if iri_valued => encode_list(p.get(), |s| encode_iri(s, context)),
            Slot::StringList(p) => encode_list(p.get(), |s| encode_string(s)),
            Slot::Boolean(p) => p.get().map_or(Value::Null, |b| encode_boolean(*b)),
            Slot::BooleanList(p) => encode_list(p.get(), |b| encode_boolean(*b)),
            Slot::Integer(p) => p.get().map_or(Value::Null, |i| encode_integer(*i)),
            Slot::IntegerList(p) => encode_list(p.get(), |i| encode_integer(*i)),
            Slot::Float(p) => p.get().map_or(Value::Null, |f| encode_float(*f)),
            Slot::FloatList(p) => encode_list(p.get(), |f| encode_float(*f)),
            Slot::DateTime(p) => p.get().map_or(Value::Null, encode_datetime),
            Slot::DateTimeList(p) => encode_list(p.get(), encode_datetime),
            Slot::Ref(p) => self.encode_ref(p.get(), context),
            Slot::RefList(p) => Value::Array(
                p.get()
                    .iter()
                    .map(|r| self.encode_ref(r, context))
                    .collect(),
            ),
        }
    }

    /// IRI references compact through `context`; objects are inlined.
    pub fn encode_ref(&mut self, r: &Ref, context: &Context) -> Value {
        match r {
            Ref::Unset => Value::Null,
            Ref::Iri(iri) => encode_iri(iri, context),
            Ref::Object(obj) => {
                let first = self.seen.insert(Arc::as_ptr(obj));
                match obj.id().get() {
                    Some(id) if !first => encode_iri(id, context),
                    _ => Value::Object(self.encode_object(obj)),
                }
            }
        }
    }

    fn encode_any(&mut self, value: &AnyValue) -> Value {
        match value {
            AnyValue::Ref(r) => self.encode_ref(r, &Context::new()),
            AnyValue::String(s) => encode_string(s),
            AnyValue::Integer(i) => encode_integer(*i),
            AnyValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            AnyValue::Boolean(b) => encode_boolean(*b),
            AnyValue::List(items) => Value::Array(items.iter().map(|v| self.encode_any(v)).collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::MAX_DEPTH;
    use crate::model::{PropertyDef, TypeDef};
    use crate::test_model;
    use serde_json::json;

    fn decode(registry: &Registry, value: Value) -> Result<ShaclObject, DecodeError> {
        Decoder::new(registry, MAX_DEPTH).decode_object(&value, &Path::root(), None)
    }

    #[test]
    fn test_decode_scalar_values() {
        let registry = test_model::registry();
        let obj = decode(
            &registry,
            json!({
                "@type": "test-class",
                "@id": "http://example.org/obj",
                "test-class/string-scalar-prop": "hello",
                "test-class/integer-prop": 3.0,
                "test-class/float-prop": "1.5",
                "test-class/boolean-prop": true,
                "test-class/enum-prop": "foo",
                "test-class/datetime-scalar-prop": "2024-03-11T01:02:03-05:30",
                "test-class/string-list-prop": ["a", "b"]
            }),
        )
        .unwrap();

        assert_eq!(obj.id().get().map(String::as_str), Some("http://example.org/obj"));
        assert_eq!(obj.observed_type_iri(), Some("test-class"));
        assert_eq!(obj.property::<i64>("testClassIntegerProp").unwrap().get(), Some(&3));
        assert_eq!(obj.property::<f64>("testClassFloatProp").unwrap().get(), Some(&1.5));
        assert_eq!(
            obj.property::<String>("testClassEnumProp").unwrap().get().map(String::as_str),
            Some("http://example.org/enumType/foo")
        );
        let dt = obj
            .property::<crate::util::DateTime>("testClassDatetimeScalarProp")
            .unwrap()
            .get()
            .unwrap();
        assert_eq!(dt.tz_hour(), -5);
        assert_eq!(dt.tz_minute(), 30);
        assert_eq!(obj.list_property::<String>("testClassStringListProp").unwrap().len(), 2);
    }

    #[test]
    fn test_decode_stores_values_without_validators() {
        let registry = test_model::registry();
        let obj = decode(
            &registry,
            json!({
                "@type": "test-class",
                "test-class/regex": "bar",
                "test-class/positive-integer-prop": -1
            }),
        )
        .unwrap();
        assert!(obj.property::<String>("testClassRegex").unwrap().is_set());
        assert!(obj.property::<i64>("testClassPositiveIntegerProp").unwrap().is_set());
    }

    #[test]
    fn test_decode_type_errors() {
        let registry = test_model::registry();

        let err = decode(&registry, json!({"@id": "_:a"})).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::MissingType);

        let err = decode(&registry, json!({"@type": 1})).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::TypeNotString { found: "number" }));

        let err = decode(&registry, json!("test-class")).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::ExpectedObject { found: "string" }));

        let err = decode(&registry, json!({"@type": "abstract-class"})).unwrap_err();
        assert_eq!(err.to_string(), ".: Unable to create abstract type 'abstract-class'");

        let err = decode(&registry, json!({"@type": "not-registered"})).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::NoMatchingExtensible { .. }));
    }

    #[test]
    fn test_decode_rejects_type_not_valid_for_property() {
        let registry = test_model::registry();
        let err = decode(
            &registry,
            json!({
                "@type": "test-class",
                "test-class/class-prop": {"@type": "link-class"}
            }),
        )
        .unwrap_err();
        assert_eq!(err.path.to_string(), ".test-class/class-prop");
        assert_eq!(
            err.kind,
            DecodeErrorKind::TypeNotValid {
                type_iri: "link-class".to_string(),
                expected: "http://example.org/test-class".to_string(),
            }
        );

        let ok = decode(
            &registry,
            json!({
                "@type": "test-class",
                "test-class/class-prop": {"@type": "test-derived-class"},
                "test-class/class-list-prop": ["named", "_:b0"]
            }),
        )
        .unwrap();
        assert!(ok.ref_property("testClassClassProp").unwrap().is_obj());
        let list = ok.ref_list_property("testClassClassListProp").unwrap();
        assert_eq!(list.get()[0].get_iri(), Some("http://example.org/test-class/named"));
        assert_eq!(list.get()[1].get_iri(), Some("_:b0"));
    }

    #[test]
    fn test_id_alias_is_exclusive() {
        let registry = test_model::registry();

        let obj = decode(
            &registry,
            json!({"@type": "inherited-id-prop-class", "testid": "http://example.org/x"}),
        )
        .unwrap();
        assert_eq!(obj.id().get().map(String::as_str), Some("http://example.org/x"));

        let err = decode(
            &registry,
            json!({"@type": "id-prop-class", "@id": "http://example.org/x"}),
        )
        .unwrap_err();
        assert_eq!(err.path.to_string(), ".@id");
        assert!(matches!(err.kind, DecodeErrorKind::IdNotAllowed { .. }));

        let err = decode(&registry, json!({"@type": "link-class", "testid": "_:x"})).unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::UnknownProperty { .. }));

        let err = decode(&registry, json!({"@type": "link-class", "@id": "nope"})).unwrap_err();
        assert_eq!(err.path.to_string(), ".@id");
        assert!(matches!(err.kind, DecodeErrorKind::InvalidId(_)));
    }

    #[test]
    fn test_unknown_property_rejected_or_captured() {
        let registry = test_model::registry();

        let err = decode(
            &registry,
            json!({"@type": "link-class", "http://example.org/custom": 1}),
        )
        .unwrap_err();
        assert_eq!(err.path.to_string(), ".");
        assert_eq!(
            err.kind,
            DecodeErrorKind::UnknownProperty {
                key: "http://example.org/custom".to_string()
            }
        );

        let obj = decode(
            &registry,
            json!({
                "@type": "extensible-class",
                "http://example.org/custom": [1, "two", 2.5],
                "http://example.org/flag": true
            }),
        )
        .unwrap();
        assert!(matches!(
            obj.ext_property("http://example.org/custom"),
            Some([AnyValue::Integer(1), AnyValue::String(_), AnyValue::Float(_)])
        ));
        assert!(matches!(
            obj.ext_property("http://example.org/flag"),
            Some([AnyValue::Boolean(true)])
        ));

        let encoded = Value::Object(Encoder::new().encode_object(&obj));
        assert_eq!(encoded["http://example.org/custom"], json!([1, "two", 2.5]));
        assert_eq!(encoded["http://example.org/flag"], json!([true]));
    }

    #[test]
    fn test_unregistered_type_under_extensible_abstract_target() {
        let registry = test_model::registry();
        let obj = decode(
            &registry,
            json!({
                "@type": "uses-extensible-abstract-class",
                "uses-extensible-abstract-class/prop": {
                    "@type": "http://example.org/custom-type",
                    "http://example.org/extra": "x",
                }
            }),
        )
        .unwrap();

        let inner = obj
            .ref_property("usesExtensibleAbstractClassProp")
            .unwrap()
            .get()
            .get_obj()
            .unwrap();
        assert_eq!(inner.class().iri(), "http://example.org/extensible-abstract-class");
        assert_eq!(inner.type_iri(), "http://example.org/custom-type");

        let err = decode(
            &registry,
            json!({
                "@type": "uses-extensible-abstract-class",
                "uses-extensible-abstract-class/prop": {"@type": "extensible-abstract-class"}
            }),
        )
        .unwrap_err();
        assert!(matches!(err.kind, DecodeErrorKind::AbstractType { .. }));
    }

    #[test]
    fn test_unregistered_root_type_resolves_to_extensible_class() {
        let registry = test_model::registry();
        let obj = decode(
            &registry,
            json!({"@type": "http://example.org/unknown", "extensible-class/property": "p"}),
        )
        .unwrap();
        assert_eq!(obj.class().iri(), "http://example.org/extensible-class");
        assert_eq!(obj.type_iri(), "http://example.org/unknown");

        let encoded = Value::Object(Encoder::new().encode_object(&obj));
        assert_eq!(encoded["@type"], json!("http://example.org/unknown"));
    }

    fn ambiguous_registry() -> Registry {
        let ex = |s: &str| format!("http://example.org/{}", s);
        Registry::builder("http://example.org/context.json")
            .register(
                TypeDef::new(ex("ext-b"))
                    .extensible(true)
                    .property(PropertyDef::new("flag", ex("flag"), ValueKind::Boolean)),
            )
            .register(
                TypeDef::new(ex("ext-a"))
                    .extensible(true)
                    .property(PropertyDef::new("flag", ex("flag-a"), ValueKind::String).compact("ex:flag")),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_disambiguation_is_first_success_in_iri_order() {
        let registry = ambiguous_registry();

        // ext-a sorts first and accepts anything.
        let obj = decode(
            &registry,
            json!({"@type": "http://example.org/other", "http://example.org/flag": true}),
        )
        .unwrap();
        assert_eq!(obj.class().iri(), "http://example.org/ext-a");
        assert!(obj.ext_property("http://example.org/flag").is_some());

        // ext-a rejects a non-string for its typed key, so ext-b is chosen.
        let obj = decode(
            &registry,
            json!({"@type": "http://example.org/other", "ex:flag": 1}),
        )
        .unwrap();
        assert_eq!(obj.class().iri(), "http://example.org/ext-b");
        assert!(obj.ext_property("ex:flag").is_some());

        for _ in 0..5 {
            let again = decode(
                &registry,
                json!({"@type": "http://example.org/other", "ex:flag": 1}),
            )
            .unwrap();
            assert_eq!(again.class().iri(), "http://example.org/ext-b");
        }
    }

    #[test]
    fn test_depth_limit() {
        let registry = test_model::registry();
        let mut value = json!({"@type": "link-class"});
        for _ in 0..4 {
            value = json!({"@type": "link-class", "link-class-link-prop": value});
        }

        assert!(Decoder::new(&registry, 4).decode_object(&value, &Path::root(), None).is_ok());
        let err = Decoder::new(&registry, 3)
            .decode_object(&value, &Path::root(), None)
            .unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::DepthExceeded { max: 3 });
    }

    #[test]
    fn test_decode_any_rejects_null() {
        let registry = test_model::registry();
        let err = decode(
            &registry,
            json!({"@type": "extensible-class", "http://example.org/x": null}),
        )
        .unwrap_err();
        assert_eq!(err.path.to_string(), ".http://example.org/x");
        assert!(matches!(err.kind, DecodeErrorKind::UnsupportedValue { found: "null" }));
    }

    #[test]
    fn test_encode_object_layout() {
        let registry = test_model::registry();
        let mut obj = registry.create("inherited-id-prop-class").unwrap();
        obj.id_mut().set("http://example.org/i".to_string()).unwrap();
        let encoded = Value::Object(Encoder::new().encode_object(&obj));
        assert_eq!(
            encoded,
            json!({"@type": "inherited-id-prop-class", "testid": "http://example.org/i"})
        );

        let mut obj = registry.create("test-class").unwrap();
        obj.property_mut::<f64>("testClassFloatProp").unwrap().set(1e21).unwrap();
        obj.property_mut::<String>("testClassEnumProp")
            .unwrap()
            .set("http://example.org/enumType/bar".to_string())
            .unwrap();
        obj.property_mut::<i64>("testClassIntegerProp").unwrap().set(-4).unwrap();
        let encoded = Value::Object(Encoder::new().encode_object(&obj));
        assert_eq!(
            encoded,
            json!({
                "@type": "test-class",
                "test-class/float-prop": "1000000000000000000000",
                "test-class/enum-prop": "bar",
                "test-class/integer-prop": -4
            })
        );
    }

    #[test]
    fn test_encode_shared_object_once() {
        let registry = test_model::registry();
        let mut shared = registry.create("link-class").unwrap();
        shared.id_mut().set("http://example.org/shared".to_string()).unwrap();
        let shared = Arc::new(shared);
        let anonymous = Arc::new(registry.create("link-class").unwrap());

        let mut root = registry.create("link-class").unwrap();
        root.ref_list_property_mut("linkClassLinkListProp")
            .unwrap()
            .set(vec![
                Ref::shared(shared.clone()),
                Ref::shared(shared.clone()),
                Ref::shared(anonymous.clone()),
                Ref::shared(anonymous)
            ])
            .unwrap();

        let encoded = Value::Object(Encoder::new().encode_object(&root));
        assert_eq!(
            encoded["link-class-link-list-prop"],
            json!([
                {"@type": "link-class", "@id": "http://example.org/shared"},
                "http://example.org/shared",
                {"@type": "link-class"},
                {"@type": "link-class"}
            ])
        );
    }
}
