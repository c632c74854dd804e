use core::fmt;
use std::cmp::Ordering;

/// A single step into a nested [`Value`](crate::Value).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A string key of an object member.
    Field(String),
    /// A numeric index of an array element.
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(value: &str) -> Self {
        PathSegment::Field(value.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(value: usize) -> Self {
        PathSegment::Index(value)
    }
}

/// A location within a nested value, rendered as `$`, `$.field`, `$[3]` and
/// nested combinations thereof.
///
/// Paths are persistent: [`Path::child_field`] and [`Path::child_index`]
/// return a new, one-segment-longer path and leave the parent untouched, so
/// sibling subtrees enumerated during recursive descent cannot interfere
/// with each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The root path, rendered as `$`.
    #[must_use]
    pub fn root() -> Self {
        Path::default()
    }

    /// Extends this path with an object key, returning a new path.
    #[must_use]
    pub fn child_field(&self, name: &str) -> Self {
        self.child(PathSegment::Field(name.to_string()))
    }

    /// Extends this path with an array index, returning a new path.
    #[must_use]
    pub fn child_index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    pub(crate) fn from_segments(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(segment);
        Path { segments }
    }

    /// The segments of this path, root first.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Renders this path to its canonical string form.
    ///
    /// Rendering is pure and injective: two distinct paths never render to
    /// the same string, so rendered paths are usable as exact lookup keys.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("$");
        let mut buffer = itoa::Buffer::new();
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => {
                    out.push('.');
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    out.push('[');
                    out.push_str(buffer.format(*index));
                    out.push(']');
                }
            }
        }
        out
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Total order by rendered string, so sibling paths sort deterministically
/// in reports regardless of traversal implementation details.
impl Ord for Path {
    fn cmp(&self, other: &Self) -> Ordering {
        self.render().cmp(&other.render())
    }
}

impl PartialOrd for Path {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl serde::Serialize for Path {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::Path;

    #[test]
    fn root_renders_as_dollar() {
        assert_eq!(Path::root().render(), "$");
    }

    #[test]
    fn nested_rendering() {
        let path = Path::root().child_field("a").child_index(2).child_field("b");
        assert_eq!(path.render(), "$.a[2].b");
    }

    #[test]
    fn children_do_not_mutate_parent() {
        let parent = Path::root().child_field("items");
        let first = parent.child_index(0);
        let second = parent.child_index(1);
        assert_eq!(parent.render(), "$.items");
        assert_eq!(first.render(), "$.items[0]");
        assert_eq!(second.render(), "$.items[1]");
    }

    #[test]
    fn ordering_follows_rendered_string() {
        let a = Path::root().child_field("a");
        let b = Path::root().child_field("b");
        let a0 = a.child_index(0);
        assert!(a < a0);
        assert!(a0 < b);
    }
}
