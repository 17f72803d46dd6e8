//! Compaction contexts mapping full IRIs to short tokens.

use rustc_hash::FxHashMap;

/// A bidirectional map between full IRIs and compact tokens.
///
/// Each IRI-valued property carries one of these; object identifiers are
/// encoded against the empty context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    compact: FxHashMap<String, String>,
    expand: FxHashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a context from `(full IRI, compact token)` pairs.
    pub fn from_pairs<I, F, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, C)>,
        F: Into<String>,
        C: Into<String>,
    {
        let mut context = Self::default();
        for (full, compact) in pairs {
            context.insert(full, compact);
        }
        context
    }

    pub fn insert(&mut self, full: impl Into<String>, compact: impl Into<String>) {
        let full = full.into();
        let compact = compact.into();
        self.expand.insert(compact.clone(), full.clone());
        self.compact.insert(full, compact);
    }

    /// Maps a full IRI to its compact token, or returns it unchanged.
    pub fn compact<'a>(&'a self, iri: &'a str) -> &'a str {
        self.compact.get(iri).map(String::as_str).unwrap_or(iri)
    }

    /// Maps a compact token to its full IRI, or returns it unchanged.
    pub fn expand<'a>(&'a self, token: &'a str) -> &'a str {
        self.expand.get(token).map(String::as_str).unwrap_or(token)
    }

    pub fn is_empty(&self) -> bool {
        self.compact.is_empty()
    }

    pub fn len(&self) -> usize {
        self.compact.len()
    }
}
