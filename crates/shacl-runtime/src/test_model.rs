//! Reference model shared by the unit tests.

use std::sync::Arc;

use crate::model::{NodeKind, PropertyDef, Registry, TypeDef, ValueKind};

pub const CONTEXT_URL: &str = "https://spdx.github.io/spdx-3-model/context.json";

const ENUM_VALUES: [&str; 4] = [
    "http://example.org/enumType/bar",
    "http://example.org/enumType/foo",
    "http://example.org/enumType/nolabel",
    "http://example.org/enumType/non-named-individual",
];

fn ex(suffix: &str) -> String {
    format!("http://example.org/{}", suffix)
}

fn class(suffix: &str) -> TypeDef {
    TypeDef::new(ex(suffix)).compact(suffix)
}

fn prop(name: &str, suffix: &str, kind: ValueKind) -> PropertyDef {
    PropertyDef::new(name, ex(suffix), kind).compact(suffix)
}

fn object(suffix: &str) -> ValueKind {
    ValueKind::Object(ex(suffix))
}

fn enum_prop(name: &str, suffix: &str) -> PropertyDef {
    let mut def = prop(name, suffix, ValueKind::Iri).one_of(ENUM_VALUES);
    for value in ENUM_VALUES {
        let token = value.rsplit('/').next().unwrap_or(value);
        def = def.context_entry(value, token);
    }
    def
}

fn named_ref(def: PropertyDef) -> PropertyDef {
    def.context_entry(ex("test-class/named"), "named")
}

pub fn registry() -> Arc<Registry> {
    let registry = Registry::builder(CONTEXT_URL)
        .register(class("abstract-class").abstract_class())
        .register(class("abstract-sh-class").abstract_class())
        .register(class("abstract-spdx-class").abstract_class())
        .register(class("concrete-class").parent(ex("abstract-class")))
        .register(class("concrete-sh-class").parent(ex("abstract-sh-class")))
        .register(class("concrete-spdx-class").parent(ex("abstract-spdx-class")))
        .register(class("enumType"))
        .register(class("extensible-abstract-class").abstract_class().extensible(true))
        .register(class("id-prop-class").id_alias("testid"))
        .register(class("inherited-id-prop-class").parent(ex("id-prop-class")))
        .register(
            class("link-class")
                .property(prop("linkClassExtensible", "link-class-extensible", object("extensible-class")))
                .property(prop("linkClassLinkListProp", "link-class-link-list-prop", object("link-class")).list())
                .property(prop("linkClassLinkProp", "link-class-link-prop", object("link-class")))
                .property(prop("linkClassLinkPropNoClass", "link-class-link-prop-no-class", object("link-class"))),
        )
        .register(class("link-derived-class").parent(ex("link-class")))
        .register(class("node-kind-blank").node_kind(NodeKind::BlankNode).parent(ex("link-class")))
        .register(class("node-kind-iri").node_kind(NodeKind::Iri).parent(ex("link-class")))
        .register(
            class("node-kind-iri-or-blank")
                .node_kind(NodeKind::BlankNodeOrIri)
                .parent(ex("link-class")),
        )
        .register(class("non-shape-class"))
        .register(class("parent-class"))
        .register(
            class("required-abstract").property(
                prop("requiredAbstractAbstractClassProp", "required-abstract/abstract-class-prop", object("abstract-class"))
                    .required(),
            ),
        )
        .register(class("test-another-class"))
        .register(
            class("test-class")
                .parent(ex("parent-class"))
                .property(prop("encode", "encode", ValueKind::String))
                .property(prop("import_", "import", ValueKind::String))
                .property(prop("testClassAnyuriProp", "test-class/anyuri-prop", ValueKind::String))
                .property(prop("testClassBooleanProp", "test-class/boolean-prop", ValueKind::Boolean))
                .property(named_ref(
                    prop("testClassClassListProp", "test-class/class-list-prop", object("test-class")).list(),
                ))
                .property(named_ref(prop("testClassClassProp", "test-class/class-prop", object("test-class"))))
                .property(named_ref(prop(
                    "testClassClassPropNoClass",
                    "test-class/class-prop-no-class",
                    object("test-class"),
                )))
                .property(prop("testClassDatetimeListProp", "test-class/datetime-list-prop", ValueKind::DateTime).list())
                .property(prop("testClassDatetimeScalarProp", "test-class/datetime-scalar-prop", ValueKind::DateTime))
                .property(prop(
                    "testClassDatetimestampScalarProp",
                    "test-class/datetimestamp-scalar-prop",
                    ValueKind::DateTimeStamp,
                ))
                .property(enum_prop("testClassEnumListProp", "test-class/enum-list-prop").list())
                .property(enum_prop("testClassEnumProp", "test-class/enum-prop"))
                .property(enum_prop("testClassEnumPropNoClass", "test-class/enum-prop-no-class"))
                .property(prop("testClassFloatProp", "test-class/float-prop", ValueKind::Float))
                .property(prop("testClassIntegerProp", "test-class/integer-prop", ValueKind::Integer))
                .property(prop("namedProperty", "test-class/named-property", ValueKind::String))
                .property(prop("testClassNonShape", "test-class/non-shape", object("non-shape-class")))
                .property(
                    prop("testClassNonnegativeIntegerProp", "test-class/nonnegative-integer-prop", ValueKind::Integer)
                        .min_inclusive(0),
                )
                .property(
                    prop("testClassPositiveIntegerProp", "test-class/positive-integer-prop", ValueKind::Integer)
                        .min_inclusive(1),
                )
                .property(prop("testClassRegex", "test-class/regex", ValueKind::String).pattern(r"^foo\d"))
                .property(
                    prop("testClassRegexDatetime", "test-class/regex-datetime", ValueKind::DateTime)
                        .pattern(r"^\d\d\d\d-\d\d-\d\dT\d\d:\d\d:\d\d\+01:00$"),
                )
                .property(
                    prop("testClassRegexDatetimestamp", "test-class/regex-datetimestamp", ValueKind::DateTimeStamp)
                        .pattern(r"^\d\d\d\d-\d\d-\d\dT\d\d:\d\d:\d\dZ$"),
                )
                .property(prop("testClassRegexList", "test-class/regex-list", ValueKind::String).list().pattern(r"^foo\d"))
                .property(prop("testClassStringListNoDatatype", "test-class/string-list-no-datatype", ValueKind::String).list())
                .property(prop("testClassStringListProp", "test-class/string-list-prop", ValueKind::String).list())
                .property(prop("testClassStringScalarProp", "test-class/string-scalar-prop", ValueKind::String)),
        )
        .register(
            class("test-class-required")
                .parent(ex("test-class"))
                .property(
                    prop("testClassRequiredStringListProp", "test-class/required-string-list-prop", ValueKind::String)
                        .list()
                        .min_count(1)
                        .max_count(2),
                )
                .property(
                    prop("testClassRequiredStringScalarProp", "test-class/required-string-scalar-prop", ValueKind::String)
                        .required(),
                ),
        )
        .register(
            class("test-derived-class")
                .parent(ex("test-class"))
                .property(prop("testDerivedClassStringProp", "test-derived-class/string-prop", ValueKind::String)),
        )
        .register(
            class("uses-extensible-abstract-class").property(prop(
                "usesExtensibleAbstractClassProp",
                "uses-extensible-abstract-class/prop",
                object("extensible-abstract-class"),
            )),
        )
        .register(class("aaa-derived-class").parent(ex("parent-class")))
        // Node kind left unset so it is inherited from node-kind-iri.
        .register(class("derived-node-kind-iri").parent(ex("node-kind-iri")))
        .register(
            class("extensible-class")
                .extensible(true)
                .parent(ex("link-class"))
                .property(prop("extensibleClassProperty", "extensible-class/property", ValueKind::String))
                .property(prop("extensibleClassRequired", "extensible-class/required", ValueKind::String).required()),
        )
        .build();

    match registry {
        Ok(registry) => Arc::new(registry),
        Err(err) => panic!("test model is invalid: {}", err),
    }
}
