//! Limits applied while decoding untrusted documents.

/// Maximum path depth accepted by the decoder.
///
/// Every nested object adds at least one path segment, so this bounds the
/// recursion depth of the decode engine.
pub const MAX_DEPTH: usize = 256;
