//! The insertion engine: a scope-root state machine over classified lines.
//!
//! Each header line moves the current scope root; each key-value line
//! attaches under it. Redefinition is relaxed throughout: repeated `[x]`
//! headers produce distinct sibling tables, duplicate plain keys are
//! appended, and `[[x]]` over an existing primitive table opens an
//! independent array container rather than failing. Only a key-value node
//! standing where a table operation needs to attach is an error.

#[cfg(test)]
#[path = "./builder_tests.rs"]
mod tests;

use crate::error::{Error, ErrorKind};
use crate::line::Line;
use crate::node::{NodeId, NodeKind, TableKind, Tree};
use crate::path::{self, KeyPath};
use crate::value::Payload;
use std::collections::HashMap;

/// Nodes with at least this many children use the hash index for name
/// lookups; below it a linear scan wins.
const INDEXED_CHILDREN_THRESHOLD: usize = 6;

/// Name lookup accelerator over (parent, child-name) pairs.
///
/// Parents below [`INDEXED_CHILDREN_THRESHOLD`] are scanned linearly; a
/// parent crossing the threshold gets all of its children bulk-indexed, and
/// later inserts index just the appended child. The first occurrence of a
/// name wins on both paths, so the index always agrees with the scan.
pub(crate) struct ChildIndex {
    map: foldhash::HashMap<NodeId, foldhash::HashMap<Box<str>, NodeId>>,
}

impl ChildIndex {
    pub(crate) fn new() -> ChildIndex {
        ChildIndex {
            map: HashMap::default(),
        }
    }

    /// Looks up a child of `parent` by name, returning the first match in
    /// declaration order.
    pub(crate) fn find(&self, tree: &Tree, parent: NodeId, name: &str) -> Option<NodeId> {
        if tree.children(parent).len() >= INDEXED_CHILDREN_THRESHOLD {
            self.map.get(&parent).and_then(|names| names.get(name)).copied()
        } else {
            tree.child_named(parent, name)
        }
    }

    /// Records a just-appended named child of `parent`.
    pub(crate) fn record(&mut self, tree: &Tree, parent: NodeId, child: NodeId) {
        let len = tree.children(parent).len();
        if len == INDEXED_CHILDREN_THRESHOLD {
            self.bulk_index(tree, parent);
        } else if len > INDEXED_CHILDREN_THRESHOLD {
            if let Some(name) = tree.name(child) {
                self.map
                    .entry(parent)
                    .or_default()
                    .entry(name.into())
                    .or_insert(child);
            }
        }
    }

    /// Indexes every child of a parent that just reached the threshold.
    fn bulk_index(&mut self, tree: &Tree, parent: NodeId) {
        let names = self.map.entry(parent).or_default();
        for &child in tree.children(parent) {
            if let Some(name) = tree.name(child) {
                names.entry(name.into()).or_insert(child);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds a [`Tree`] from classified [`Line`]s fed in file order.
///
/// The only state carried across lines is the current scope root: the table
/// or array element that key-value lines and relative dotted paths attach
/// under, updated by each header line.
///
/// Every push is atomic with respect to the tree: a resolution error can
/// only surface before the first node for that line is created, since later
/// segments of a freshly created chain have no existing children to collide
/// with.
pub struct Builder {
    tree: Tree,
    scope: NodeId,
    index: ChildIndex,
}

impl Builder {
    /// Creates a builder whose scope root is the File root.
    pub fn new() -> Builder {
        let tree = Tree::new();
        let scope = tree.root();
        Builder {
            tree,
            scope,
            index: ChildIndex::new(),
        }
    }

    /// Read access to the tree built so far.
    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Processes one classified line.
    pub fn push(&mut self, line: Line) -> Result<(), Error> {
        match line {
            Line::Table { path, line } => self.open_table(&path, line),
            Line::ArrayOfTables { path, line } => self.open_array_table(&path, line),
            Line::KeyValue {
                path,
                payload,
                line,
            } => self.insert_value(&path, payload, line),
        }
    }

    /// Finalizes and returns the tree: every table or array element still
    /// childless gains exactly one stub child. Running the pass on an
    /// already-finalized tree changes nothing, since a node with a stub
    /// child is not childless.
    pub fn finish(mut self) -> Tree {
        finalize(&mut self.tree);
        self.tree
    }

    // -- header processing --------------------------------------------------

    /// Processes `[path]`: resolves intermediates from the File root, applies
    /// the final-segment tie-break, and moves the scope root to the resolved
    /// table.
    fn open_table(&mut self, path: &KeyPath, line: u32) -> Result<(), Error> {
        let Some((intermediate, last)) = path.split_final() else {
            return Err(empty_path(line));
        };
        let root = self.tree.root();
        let base = path::resolve_tables(&mut self.tree, &mut self.index, root, intermediate, line)?;

        let opened = match self.index.find(&self.tree, base, last) {
            // Repeated primitive headers become distinct siblings; an
            // existing array container routes the table into its most
            // recent element.
            Some(existing) => match self.tree.kind(existing) {
                NodeKind::Table(TableKind::Primitive) => {
                    let sibling = self.tree.new_table(base, last, TableKind::Primitive);
                    self.index.record(&self.tree, base, sibling);
                    sibling
                }
                NodeKind::Table(TableKind::Array) => {
                    let element = *self.tree.children(existing).last().unwrap();
                    let table = self.tree.new_table(element, last, TableKind::Primitive);
                    self.index.record(&self.tree, element, table);
                    table
                }
                _ => return Err(kind_conflict(&self.tree, existing, line)),
            },
            None => {
                let table = self.tree.new_table(base, last, TableKind::Primitive);
                self.index.record(&self.tree, base, table);
                table
            }
        };

        self.scope = opened;
        Ok(())
    }

    /// Processes `[[path]]`: reuses the array container at the exact path if
    /// one exists, appends a fresh element, and moves the scope root to it.
    fn open_array_table(&mut self, path: &KeyPath, line: u32) -> Result<(), Error> {
        let Some((intermediate, last)) = path.split_final() else {
            return Err(empty_path(line));
        };
        let root = self.tree.root();
        let base = path::resolve_tables(&mut self.tree, &mut self.index, root, intermediate, line)?;

        let container = match self.index.find(&self.tree, base, last) {
            Some(existing) => match self.tree.kind(existing) {
                NodeKind::Table(TableKind::Array) => existing,
                // No merge across kinds: a primitive table at the same path
                // masks nothing, the array opens as an independent sibling.
                NodeKind::Table(TableKind::Primitive) => {
                    let sibling = self.tree.new_table(base, last, TableKind::Array);
                    self.index.record(&self.tree, base, sibling);
                    sibling
                }
                _ => return Err(kind_conflict(&self.tree, existing, line)),
            },
            None => {
                let container = self.tree.new_table(base, last, TableKind::Array);
                self.index.record(&self.tree, base, container);
                container
            }
        };

        self.scope = self.tree.new_array_element(container);
        Ok(())
    }

    // -- key-value processing -----------------------------------------------

    /// Processes a key-value line: expands dotted intermediates under the
    /// current scope root and appends the key-value node. Duplicate keys are
    /// appended, never rejected.
    fn insert_value(&mut self, path: &KeyPath, payload: Payload, line: u32) -> Result<(), Error> {
        let Some((intermediate, last)) = path.split_final() else {
            return Err(empty_path(line));
        };
        if !self.tree.kind(self.scope).hosts_entries() {
            return Err(Error::new(ErrorKind::InvalidInsertionTarget, Some(line)));
        }
        let target = path::resolve_tables(
            &mut self.tree,
            &mut self.index,
            self.scope,
            intermediate,
            line,
        )?;

        let node = self.tree.new_key_value(target, last, payload, line);
        self.index.record(&self.tree, target, node);
        Ok(())
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}

/// Appends one stub child to every still-childless table and array element.
///
/// Idempotent: a node holding a stub is no longer childless, so a second
/// pass changes nothing. `ids()` snapshots the node range up front; stubs
/// appended during the walk are past the end of that range.
pub(crate) fn finalize(tree: &mut Tree) {
    for id in tree.ids() {
        let childless = tree.children(id).is_empty();
        if childless && matches!(tree.kind(id), NodeKind::Table(_) | NodeKind::ArrayElement) {
            tree.new_stub(id);
        }
    }
}

fn empty_path(line: u32) -> Error {
    Error::new(
        ErrorKind::Wanted {
            expected: "a table key",
            found: "an empty key path",
        },
        Some(line),
    )
}

fn kind_conflict(tree: &Tree, existing: NodeId, line: u32) -> Error {
    Error::new(
        ErrorKind::KindConflict {
            path: tree.full_path(existing),
        },
        Some(line),
    )
}
