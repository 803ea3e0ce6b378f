//! Locations inside a value or pattern tree.
//!
//! The matcher threads a [`LazyPath`] through its recursion: a borrowed,
//! stack-allocated chain of segments that costs nothing on the success path
//! and is only turned into an owned [`Path`] when a mismatch is reported.

use std::fmt;

use serde::{Serialize, Serializer};

/// One step from a container to a child.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Ordered sequence of keys and indices from the root to a subtree.
///
/// Displays and serializes as an RFC 6901 JSON pointer; the root is `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend with one more segment.
    pub fn join(mut self, segment: impl Into<Segment>) -> Self {
        self.0.push(segment.into());
        self
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.0 {
            f.write_str("/")?;
            match segment {
                Segment::Key(key) => {
                    for ch in key.chars() {
                        match ch {
                            '~' => f.write_str("~0")?,
                            '/' => f.write_str("~1")?,
                            _ => write!(f, "{ch}")?,
                        }
                    }
                }
                Segment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Borrowed path under construction during recursion.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LazyPath<'a> {
    Root,
    Key(&'a LazyPath<'a>, &'a str),
    Index(&'a LazyPath<'a>, usize),
}

impl<'a> LazyPath<'a> {
    pub(crate) fn key(&'a self, key: &'a str) -> LazyPath<'a> {
        LazyPath::Key(self, key)
    }

    pub(crate) fn index(&'a self, index: usize) -> LazyPath<'a> {
        LazyPath::Index(self, index)
    }

    pub(crate) fn to_path(&self) -> Path {
        let mut segments = Vec::new();
        let mut current = self;
        loop {
            match current {
                LazyPath::Root => break,
                LazyPath::Key(parent, key) => {
                    segments.push(Segment::Key((*key).to_string()));
                    current = parent;
                }
                LazyPath::Index(parent, index) => {
                    segments.push(Segment::Index(*index));
                    current = parent;
                }
            }
        }
        segments.reverse();
        Path(segments)
    }
}
