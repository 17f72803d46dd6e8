//! Whole-document decoding and encoding.
//!
//! A document is a JSON object carrying `@context` and either a `@graph`
//! list of typed objects or the fields of exactly one typed object.

use std::io::{Read, Write};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::codec::object::{Decoder, Encoder};
use crate::codec::value::{decode_list, json_type_name};
use crate::error::{DecodeError, DecodeErrorKind, Error};
use crate::limits::MAX_DEPTH;
use crate::model::{ObjectSet, Path, Registry, ShaclObject};

const CONTEXT_KEY: &str = "@context";
const GRAPH_KEY: &str = "@graph";

/// Options for decoding documents.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Deepest path accepted while decoding nested objects.
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

/// Options for encoding documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Indent the written JSON.
    pub pretty: bool,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

/// Decodes a document into a new object set.
pub fn decode_document(value: &Value, registry: &Arc<Registry>) -> Result<ObjectSet, DecodeError> {
    decode_document_with_options(value, registry, DecodeOptions::default())
}

/// Decodes a document with the given options.
pub fn decode_document_with_options(
    value: &Value,
    registry: &Arc<Registry>,
    options: DecodeOptions,
) -> Result<ObjectSet, DecodeError> {
    let mut set = ObjectSet::new(registry.clone());
    decode_into(&mut set, value, options)?;
    Ok(set)
}

/// Decodes the roots of a document and appends them to `set`.
///
/// Nothing is appended unless the whole document decodes.
fn decode_into(set: &mut ObjectSet, value: &Value, options: DecodeOptions) -> Result<(), DecodeError> {
    let path = Path::root();
    let map = match value {
        Value::Object(map) => map,
        other => {
            return Err(DecodeError::new(
                &path,
                DecodeErrorKind::ExpectedObject {
                    found: json_type_name(other),
                },
            ));
        }
    };

    let registry = set.registry().clone();
    check_context(map, &path, registry.context_url())?;

    let decoder = Decoder::new(&registry, options.max_depth);
    let roots = match map.get(GRAPH_KEY) {
        Some(graph) => {
            if let Some(key) = map.keys().find(|k| *k != CONTEXT_KEY && *k != GRAPH_KEY) {
                return Err(DecodeError::new(
                    &path,
                    DecodeErrorKind::UnknownTopLevelKey { key: key.clone() },
                ));
            }
            decode_list(graph, &path.push_path(GRAPH_KEY), |v, at| {
                decoder.decode_object(v, at, None)
            })?
        }
        None => {
            let mut fields = map.clone();
            fields.remove(CONTEXT_KEY);
            vec![decoder.decode_object(&Value::Object(fields), &path, None)?]
        }
    };

    debug!(roots = roots.len(), "decoded document");
    set.extend(roots.into_iter().map(Arc::new).collect());
    Ok(())
}

fn check_context(map: &Map<String, Value>, path: &Path, expected: &str) -> Result<(), DecodeError> {
    let context_path = path.push_path(CONTEXT_KEY);
    match map.get(CONTEXT_KEY) {
        None => Err(DecodeError::new(path, DecodeErrorKind::MissingContext)),
        Some(Value::String(found)) if found == expected => Ok(()),
        Some(Value::String(found)) => Err(DecodeError::new(
            &context_path,
            DecodeErrorKind::WrongContext {
                found: found.clone(),
            },
        )),
        Some(_) => Err(DecodeError::new(&context_path, DecodeErrorKind::ContextNotString)),
    }
}

/// Encodes an object set as a document.
pub fn encode_document(set: &ObjectSet) -> Value {
    let roots: Vec<&Arc<ShaclObject>> = set.objects().collect();
    let mut encoder = Encoder::new();
    for obj in &roots {
        encoder.mark_seen(obj);
    }

    let mut document = Map::new();
    document.insert(
        CONTEXT_KEY.to_string(),
        Value::String(set.registry().context_url().to_string()),
    );

    match roots.as_slice() {
        [] => {}
        [root] => document.extend(encoder.encode_object(root)),
        roots => {
            let graph = roots
                .iter()
                .map(|obj| Value::Object(encoder.encode_object(obj)))
                .collect();
            document.insert(GRAPH_KEY.to_string(), Value::Array(graph));
        }
    }

    debug!(roots = set.len(), "encoded document");
    Value::Object(document)
}

/// Encodes an object set as document text.
pub fn encode_document_with_options(set: &ObjectSet, options: EncodeOptions) -> Result<String, Error> {
    let document = encode_document(set);
    let text = if options.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(text)
}

impl ObjectSet {
    /// Decodes a document value into a new set.
    pub fn from_value(value: &Value, registry: &Arc<Registry>) -> Result<Self, DecodeError> {
        decode_document(value, registry)
    }

    /// Encodes the set as a document value.
    pub fn to_value(&self) -> Value {
        encode_document(self)
    }

    /// Reads one document from `reader` and appends its roots.
    pub fn decode<R: Read>(&mut self, reader: R) -> Result<(), Error> {
        self.decode_with_options(reader, DecodeOptions::default())
    }

    pub fn decode_with_options<R: Read>(
        &mut self,
        reader: R,
        options: DecodeOptions,
    ) -> Result<(), Error> {
        let value: Value = serde_json::from_reader(reader)?;
        decode_into(self, &value, options)?;
        Ok(())
    }

    /// Writes the set as one compact document.
    pub fn encode<W: Write>(&self, writer: W) -> Result<(), Error> {
        self.encode_with_options(writer, EncodeOptions::default())
    }

    pub fn encode_with_options<W: Write>(
        &self,
        mut writer: W,
        options: EncodeOptions,
    ) -> Result<(), Error> {
        let document = encode_document(self);
        if options.pretty {
            serde_json::to_writer_pretty(&mut writer, &document)?;
        } else {
            serde_json::to_writer(&mut writer, &document)?;
        }
        writer.flush()?;
        Ok(())
    }
}
