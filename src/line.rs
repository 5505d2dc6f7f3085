//! Classified structural lines, the input boundary of the tree engine.
//!
//! The [`classify`](crate::classify) scanner produces these from raw text;
//! callers with their own front end can construct them directly and feed
//! them to [`Builder`](crate::Builder).

use crate::path::KeyPath;
use crate::value::Payload;

/// One classified structural line of a document.
#[derive(Clone, PartialEq, Debug)]
pub enum Line {
    /// A `[path]` header opening a primitive table.
    Table {
        /// The dotted header path.
        path: KeyPath,
        /// 1-based source line.
        line: u32,
    },
    /// A `[[path]]` header appending one array-of-tables element.
    ArrayOfTables {
        /// The dotted header path.
        path: KeyPath,
        /// 1-based source line.
        line: u32,
    },
    /// A `key = value` line, with a possibly-dotted key path.
    KeyValue {
        /// The dotted key path; the final segment names the key-value node.
        path: KeyPath,
        /// The parsed value payload.
        payload: Payload,
        /// 1-based source line.
        line: u32,
    },
}

impl Line {
    /// The key path this line declares.
    pub fn path(&self) -> &KeyPath {
        match self {
            Line::Table { path, .. }
            | Line::ArrayOfTables { path, .. }
            | Line::KeyValue { path, .. } => path,
        }
    }

    /// The 1-based source line number.
    pub fn line(&self) -> u32 {
        match self {
            Line::Table { line, .. }
            | Line::ArrayOfTables { line, .. }
            | Line::KeyValue { line, .. } => *line,
        }
    }
}
