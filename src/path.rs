//! Dotted key paths and the resolver that materializes table chains.

#[cfg(test)]
#[path = "./path_tests.rs"]
mod tests;

use crate::builder::ChildIndex;
use crate::error::{Error, ErrorKind};
use crate::node::{NodeId, NodeKind, TableKind, Tree};
use std::fmt;

/// An ordered sequence of key segments, as written in a dotted header or
/// key-value path.
#[derive(Clone, PartialEq, Eq, Default, Debug)]
pub struct KeyPath {
    segments: Vec<Box<str>>,
}

impl KeyPath {
    /// Creates an empty path.
    #[inline]
    pub fn new() -> KeyPath {
        KeyPath {
            segments: Vec::new(),
        }
    }

    /// Creates a path from pre-split segments.
    pub fn from_segments<I>(segments: I) -> KeyPath
    where
        I: IntoIterator,
        I::Item: Into<Box<str>>,
    {
        KeyPath {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Splits a dotted path string into segments.
    ///
    /// Segments are separated by `.` with optional surrounding whitespace;
    /// a segment may be a bare key (ASCII alphanumerics, `-`, `_`) or quoted
    /// with `"` or `'`, in which case it is taken verbatim up to the closing
    /// quote. This accepts exactly the paths [`Display`](KeyPath) produces.
    pub fn parse(s: &str) -> Result<KeyPath, Error> {
        let bytes = s.as_bytes();
        let mut segments = Vec::new();
        let mut i = 0;
        loop {
            while bytes.get(i) == Some(&b' ') || bytes.get(i) == Some(&b'\t') {
                i += 1;
            }
            match bytes.get(i) {
                Some(&(q @ (b'"' | b'\''))) => {
                    let start = i + 1;
                    let mut end = start;
                    while end < bytes.len() && bytes[end] != q {
                        end += 1;
                    }
                    if end == bytes.len() {
                        return Err(Error::new(ErrorKind::UnterminatedString, None));
                    }
                    segments.push(Box::from(&s[start..end]));
                    i = end + 1;
                }
                Some(&b) if is_bare_key_byte(b) => {
                    let start = i;
                    while i < bytes.len() && is_bare_key_byte(bytes[i]) {
                        i += 1;
                    }
                    segments.push(Box::from(&s[start..i]));
                }
                _ => {
                    return Err(Error::new(
                        ErrorKind::Wanted {
                            expected: "a table key",
                            found: token_after_dot(bytes.get(i).copied()),
                        },
                        None,
                    ));
                }
            }
            while bytes.get(i) == Some(&b' ') || bytes.get(i) == Some(&b'\t') {
                i += 1;
            }
            match bytes.get(i) {
                None => break,
                Some(b'.') => i += 1,
                Some(_) => {
                    return Err(Error::new(
                        ErrorKind::Wanted {
                            expected: "a period",
                            found: "a character",
                        },
                        None,
                    ));
                }
            }
        }
        Ok(KeyPath { segments })
    }

    /// Appends a segment.
    #[inline]
    pub fn push(&mut self, segment: impl Into<Box<str>>) {
        self.segments.push(segment.into());
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the path has no segments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The ordered segments.
    #[inline]
    pub fn segments(&self) -> &[Box<str>] {
        &self.segments
    }

    /// Splits into (intermediate segments, final segment); `None` when the
    /// path is empty.
    pub(crate) fn split_final(&self) -> Option<(&[Box<str>], &str)> {
        let (last, init) = self.segments.split_last()?;
        Some((init, last))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for seg in &self.segments {
            if !out.is_empty() {
                out.push('.');
            }
            push_segment(&mut out, seg);
        }
        f.write_str(&out)
    }
}

impl From<&str> for KeyPath {
    /// Single-segment path from a plain key name (no splitting).
    fn from(key: &str) -> KeyPath {
        KeyPath {
            segments: vec![Box::from(key)],
        }
    }
}

/// Bare-key byte class: the segment needs no quoting iff every byte is in it.
#[inline]
pub(crate) fn is_bare_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn token_after_dot(b: Option<u8>) -> &'static str {
    match b {
        None => "eof",
        Some(b'.') => "a period",
        Some(_) => "a character",
    }
}

/// Appends `segment` to `out`, double-quoting it when it contains anything
/// outside the bare-key byte class (dots, whitespace, quotes, non-ASCII).
pub(crate) fn push_segment(out: &mut String, segment: &str) {
    let bare = !segment.is_empty() && segment.bytes().all(is_bare_key_byte);
    if bare {
        out.push_str(segment);
        return;
    }
    out.push('"');
    for c in segment.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Walks one path segment down from `at`, creating a `Primitive` table when
/// the segment does not exist yet.
///
/// An existing `Primitive` table is entered unchanged; an existing `Array`
/// table is transparent — the walk continues from its most recently appended
/// element. Any other existing node is terminal and cannot be descended
/// into.
pub(crate) fn descend_segment(
    tree: &mut Tree,
    index: &mut ChildIndex,
    at: NodeId,
    segment: &str,
    line: u32,
) -> Result<NodeId, Error> {
    match index.find(tree, at, segment) {
        Some(existing) => match tree.kind(existing) {
            NodeKind::Table(TableKind::Primitive) => Ok(existing),
            NodeKind::Table(TableKind::Array) => {
                // An array container always holds at least one element; the
                // element is appended in the same step that creates the
                // container.
                let last = *tree.children(existing).last().unwrap();
                Ok(last)
            }
            _ => {
                let mut path = tree.full_path(at);
                if !path.is_empty() {
                    path.push('.');
                }
                push_segment(&mut path, segment);
                Err(Error::new(ErrorKind::UnresolvablePath { path }, Some(line)))
            }
        },
        None => {
            let created = tree.new_table(at, segment, TableKind::Primitive);
            index.record(tree, at, created);
            Ok(created)
        }
    }
}

/// Resolves a chain of intermediate segments starting at `start`, creating
/// missing `Primitive` tables along the way. Returns the node the final
/// segment of the enclosing operation should attach under.
pub(crate) fn resolve_tables(
    tree: &mut Tree,
    index: &mut ChildIndex,
    start: NodeId,
    segments: &[Box<str>],
    line: u32,
) -> Result<NodeId, Error> {
    let mut at = start;
    for segment in segments {
        at = descend_segment(tree, index, at, segment, line)?;
    }
    Ok(at)
}
