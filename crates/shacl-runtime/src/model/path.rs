//! Breadcrumb paths used to locate decode and validation errors.

use std::fmt;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A property name or JSON key.
    Name(String),
    /// A position inside a list.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Name(name) => f.write_str(name),
            Segment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// An immutable sequence of segments.
///
/// Pushing returns a new path and leaves the receiver untouched, so sibling
/// branches of a traversal can extend the same parent independently.
/// Displayed as `.` followed by the dot-joined segments, e.g.
/// `.@graph.[0].test-class/enum-prop`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with a named segment appended.
    pub fn push_path(&self, name: impl Into<String>) -> Self {
        self.push(Segment::Name(name.into()))
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        self.push(Segment::Index(index))
    }

    fn push(&self, segment: Segment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(".")?;
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_root_display() {
        assert_eq!(Path::root().to_string(), ".");
    }

    #[test]
    fn test_nested_display() {
        let path = Path::root()
            .push_path("@graph")
            .push_index(0)
            .push_path("test-class/enum-prop");
        assert_eq!(path.to_string(), ".@graph.[0].test-class/enum-prop");
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_push_leaves_parent_unchanged() {
        let parent = Path::root().push_path("a");
        let left = parent.push_path("b");
        let right = parent.push_index(1);

        assert_eq!(parent.to_string(), ".a");
        assert_eq!(left.to_string(), ".a.b");
        assert_eq!(right.to_string(), ".a.[1]");
    }

    proptest! {
        #[test]
        fn prop_push_appends_exactly_one_segment(names in prop::collection::vec("[a-z]{1,8}", 0..8), idx in 0usize..100) {
            let mut path = Path::root();
            for name in &names {
                path = path.push_path(name.as_str());
            }
            let before = path.clone();
            let after = path.push_index(idx);

            prop_assert_eq!(&before, &path);
            prop_assert_eq!(after.len(), before.len() + 1);
            prop_assert_eq!(&after.segments()[..before.len()], before.segments());
            let suffix = format!("[{}]", idx);
            prop_assert!(after.to_string().ends_with(&suffix));
        }
    }
}
