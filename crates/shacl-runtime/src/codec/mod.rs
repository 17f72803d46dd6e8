//! JSON-LD decoding and encoding.
//!
//! - [`value`]: primitive value codecs
//! - [`object`]: typed object decoding and encoding
//! - [`document`]: the `@context` / `@graph` envelope

pub mod document;
pub mod object;
pub mod value;

pub use document::{
    decode_document, decode_document_with_options, encode_document, encode_document_with_options,
    DecodeOptions, EncodeOptions,
};
pub use object::{Decoder, Encoder};
