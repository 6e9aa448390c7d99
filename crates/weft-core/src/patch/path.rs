//! Patch paths
//!
//! A path addresses a location inside an entity tree as a list of segments.
//! Rendered paths use JSON Pointer syntax (RFC 6901): `/nodes/root:1/state`.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{Result, WeftError};

/// One step of a patch path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Record field name or mapping key
    Key(String),
    /// Sequence position
    Index(usize),
}

impl PathSegment {
    /// The segment as a field name or mapping key
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            PathSegment::Key(k) => Cow::Borrowed(k),
            PathSegment::Index(i) => Cow::Owned(i.to_string()),
        }
    }

    /// The segment as a sequence position, if it is one
    ///
    /// Keys parse as positions only in canonical decimal form (`"0"`, `"12"`,
    /// never `"012"`), matching JSON Pointer array indices.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Index(i) => Some(*i),
            PathSegment::Key(k) => parse_array_index(k),
        }
    }
}

fn parse_array_index(token: &str) -> Option<usize> {
    let canonical = token == "0"
        || (!token.is_empty()
            && !token.starts_with('0')
            && token.bytes().all(|b| b.is_ascii_digit()));
    if canonical {
        token.parse().ok()
    } else {
        None
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(&encode_token(k)),
            PathSegment::Index(i) => write!(f, "{}", i),
        }
    }
}

/* JSON pointer token encoding according to RFC 6901 */
fn encode_token(s: &str) -> Cow<'_, str> {
    if s.contains(['~', '/']) {
        Cow::Owned(s.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(s)
    }
}

fn decode_token(s: &str) -> String {
    s.replace("~1", "/").replace("~0", "~")
}

/// Location inside an entity tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PatchPath(Vec<PathSegment>);

impl PatchPath {
    /// The empty path, addressing the whole value
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Split into parent segments and the final segment
    pub fn split_last(&self) -> Option<(&PathSegment, &[PathSegment])> {
        self.0.split_last()
    }

    /// New path one field or key deeper
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.push_key(key);
        next
    }

    /// New path one sequence position deeper
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.push_index(index);
        next
    }

    pub fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(PathSegment::Key(key.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

    /// Render as a JSON pointer; the root renders as the empty string
    pub fn to_pointer(&self) -> String {
        self.to_string()
    }

    /// Parse a JSON pointer
    ///
    /// Tokens that look like array indices become [`PathSegment::Index`];
    /// replay still treats them as keys when the parent is not a sequence.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPatchPath` if a non-empty pointer does not start with `/`.
    pub fn parse_pointer(pointer: &str) -> Result<Self> {
        if pointer.is_empty() {
            return Ok(Self::root());
        }
        let rest = pointer
            .strip_prefix('/')
            .ok_or_else(|| WeftError::InvalidPatchPath {
                path: pointer.to_string(),
                reason: "JSON pointer must start with '/'".to_string(),
            })?;
        let segments = rest
            .split('/')
            .map(|token| match parse_array_index(token) {
                Some(i) => PathSegment::Index(i),
                None => PathSegment::Key(decode_token(token)),
            })
            .collect();
        Ok(Self(segments))
    }
}

impl fmt::Display for PatchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for PatchPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_pointer())
    }
}

impl<'de> Deserialize<'de> for PatchPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pointer = String::deserialize(deserializer)?;
        PatchPath::parse_pointer(&pointer).map_err(serde::de::Error::custom)
    }
}
