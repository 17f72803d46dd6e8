//! IRI and blank-node shape checks.

/// Prefix that marks a blank node identifier.
pub const BLANK_NODE_PREFIX: &str = "_:";

/// Returns true if `s` is a blank node identifier (`_:` prefix).
pub fn is_blank_node(s: &str) -> bool {
    s.starts_with(BLANK_NODE_PREFIX)
}

/// Returns true if `s` is IRI-shaped: it has a scheme separator and is not a
/// blank node.
pub fn is_iri(s: &str) -> bool {
    !is_blank_node(s) && s.contains(':')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shapes_are_exclusive() {
        assert!(is_iri("http://example.org/a"));
        assert!(!is_blank_node("http://example.org/a"));

        assert!(is_blank_node("_:b0"));
        assert!(!is_iri("_:b0"));

        assert!(!is_iri("foo"));
        assert!(!is_blank_node("foo"));
        assert!(!is_iri(""));
    }

    #[test]
    fn test_compact_curie_counts_as_iri() {
        assert!(is_iri("ex:thing"));
    }
}
