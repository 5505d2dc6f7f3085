//! Tree nodes and the arena that owns them.
//!
//! All nodes of one parse live in a single [`Tree`], addressed by [`NodeId`]
//! handles. Parent links are plain handles used for path reconstruction and
//! scope resolution; the arena is the only owner.

#[cfg(test)]
#[path = "./node_tests.rs"]
mod tests;

use crate::path;
use crate::value::{Payload, PayloadKind};
use std::fmt;
use std::ops::Index;

/// Handle of a node within its [`Tree`].
///
/// Handles are only meaningful for the tree that issued them.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(u32);

const _: () = assert!(std::mem::size_of::<NodeId>() == 4);
const _: () = assert!(std::mem::size_of::<Option<NodeId>>() == 8);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind tag of a [`Table`](NodeKind::Table) node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TableKind {
    /// Introduced by `[path]`, or implicitly by a dotted path segment.
    Primitive,
    /// The container for `[[path]]`; its children are array elements.
    Array,
}

/// Variant tag of a tree node.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// The document root.
    File,
    /// A named table.
    Table(TableKind),
    /// One instantiation of an array-of-tables.
    ArrayElement,
    /// A `key = value` line.
    KeyValue(PayloadKind),
    /// Placeholder child of a table or array element that received no real
    /// children before finalization.
    Stub,
}

impl NodeKind {
    /// Returns `true` for node kinds that can own nested tables and
    /// key-values.
    #[inline]
    pub(crate) fn hosts_entries(self) -> bool {
        matches!(
            self,
            NodeKind::File | NodeKind::Table(TableKind::Primitive) | NodeKind::ArrayElement
        )
    }
}

/// A single node: kind tag, optional name, parent handle, ordered children,
/// and (for key-values) the payload and source line.
///
/// `name` is `Some` exactly for tables and key-values. `payload` and `line`
/// are `Some` exactly for key-values.
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    name: Option<Box<str>>,
    children: Vec<NodeId>,
    payload: Option<Payload>,
    line: Option<u32>,
}

impl Node {
    fn unnamed(kind: NodeKind, parent: Option<NodeId>) -> Node {
        Node {
            kind,
            parent,
            name: None,
            children: Vec::new(),
            payload: None,
            line: None,
        }
    }

    /// The node's variant tag.
    #[inline]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The node's own name segment, for tables and key-values.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Handle of the parent node; `None` only for the File root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Ordered child handles, in declaration order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The key-value payload, if this node is a key-value.
    #[inline]
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The 1-based source line, if this node is a key-value.
    #[inline]
    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

// ---------------------------------------------------------------------------
// Tree arena
// ---------------------------------------------------------------------------

/// The arena owning every node of one parse, rooted at a File node.
///
/// Children are stored as ordered handle sequences; appending always pushes
/// at the tail, and nothing is ever reordered, deduplicated, or deleted.
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates a tree containing only the File root.
    pub fn new() -> Tree {
        Tree {
            nodes: vec![Node::unnamed(NodeKind::File, None)],
        }
    }

    /// Handle of the File root.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes, root included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterates over every node handle in creation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + use<> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    // -- read contract ------------------------------------------------------

    /// The variant tag of `id`.
    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self[id].kind
    }

    /// The name segment of `id`, for tables and key-values.
    #[inline]
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self[id].name()
    }

    /// Parent handle of `id`; `None` only for the root.
    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self[id].parent
    }

    /// Ordered children of `id`.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self[id].children
    }

    /// First child of `id` whose name matches, in declaration order.
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        for &child in &self[id].children {
            if let Some(n) = self[child].name() {
                if n == name {
                    return Some(child);
                }
            }
        }
        None
    }

    /// The payload of `id`, if it is a key-value node.
    #[inline]
    pub fn payload(&self, id: NodeId) -> Option<&Payload> {
        self[id].payload.as_ref()
    }

    /// Returns `true` iff `id` is a key-value whose payload is the null
    /// marker.
    pub fn is_null(&self, id: NodeId) -> bool {
        match &self[id].payload {
            Some(payload) => payload.is_null(),
            None => false,
        }
    }

    /// The 1-based source line of `id`, if it is a key-value node.
    #[inline]
    pub fn line_of(&self, id: NodeId) -> Option<u32> {
        self[id].line
    }

    /// Reconstructs the full dotted key path of `id` by walking parent
    /// links. Array elements and the File root contribute no segment; a
    /// segment containing `.`, whitespace, or quotes is re-quoted so the
    /// result is re-parseable.
    pub fn full_path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut at = Some(id);
        while let Some(cur) = at {
            let node = &self[cur];
            if let Some(name) = node.name() {
                segments.push(name);
            }
            at = node.parent;
        }
        let mut out = String::new();
        for seg in segments.iter().rev() {
            if !out.is_empty() {
                out.push('.');
            }
            path::push_segment(&mut out, seg);
        }
        out
    }

    // -- construction (crate-internal) --------------------------------------

    #[inline]
    fn append(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Appends a new table child at the tail of `parent`'s children.
    pub(crate) fn new_table(&mut self, parent: NodeId, name: &str, kind: TableKind) -> NodeId {
        let mut node = Node::unnamed(NodeKind::Table(kind), Some(parent));
        node.name = Some(name.into());
        self.append(parent, node)
    }

    /// Appends a new array element to an `Array` table.
    pub(crate) fn new_array_element(&mut self, parent: NodeId) -> NodeId {
        debug_assert_eq!(self[parent].kind, NodeKind::Table(TableKind::Array));
        self.append(parent, Node::unnamed(NodeKind::ArrayElement, Some(parent)))
    }

    /// Appends a new key-value child with its payload and source line.
    pub(crate) fn new_key_value(
        &mut self,
        parent: NodeId,
        name: &str,
        payload: Payload,
        line: u32,
    ) -> NodeId {
        let mut node = Node::unnamed(NodeKind::KeyValue(payload.kind()), Some(parent));
        node.name = Some(name.into());
        node.payload = Some(payload);
        node.line = Some(line);
        self.append(parent, node)
    }

    /// Appends a stub child. Used only by finalization.
    pub(crate) fn new_stub(&mut self, parent: NodeId) -> NodeId {
        self.append(parent, Node::unnamed(NodeKind::Stub, Some(parent)))
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(
            tree: &Tree,
            id: NodeId,
            depth: usize,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            for _ in 0..depth {
                f.write_str("  ")?;
            }
            let node = &tree[id];
            match node.kind {
                NodeKind::File => f.write_str("file")?,
                NodeKind::Table(TableKind::Primitive) => {
                    write!(f, "table {}", tree.full_path(id))?
                }
                NodeKind::Table(TableKind::Array) => {
                    write!(f, "array-of-tables {}", tree.full_path(id))?
                }
                NodeKind::ArrayElement => f.write_str("element")?,
                NodeKind::KeyValue(_) => match &node.payload {
                    Some(payload) => {
                        write!(f, "{} = {:?}", node.name().unwrap_or(""), payload)?
                    }
                    None => write!(f, "{} =", node.name().unwrap_or(""))?,
                },
                NodeKind::Stub => f.write_str("stub")?,
            }
            f.write_str("\n")?;
            for &child in &node.children {
                write_node(tree, child, depth + 1, f)?;
            }
            Ok(())
        }
        write_node(self, self.root(), 0, f)
    }
}
