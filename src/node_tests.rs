use crate::node::{NodeKind, TableKind, Tree};
use crate::value::{Payload, PayloadKind, Scalar};

#[test]
fn fresh_tree_has_only_the_root() {
    let tree = Tree::new();
    assert_eq!(tree.node_count(), 1);
    assert_eq!(tree.kind(tree.root()), NodeKind::File);
    assert_eq!(tree.parent(tree.root()), None);
    assert_eq!(tree.name(tree.root()), None);
    assert!(tree.children(tree.root()).is_empty());
}

#[test]
fn append_always_goes_to_the_tail() {
    let mut tree = Tree::new();
    let root = tree.root();
    let t = tree.new_table(root, "t", TableKind::Primitive);
    let a = tree.new_key_value(t, "a", Payload::Scalar(Scalar::Integer(1)), 1);
    let b = tree.new_key_value(t, "b", Payload::Scalar(Scalar::Integer(2)), 2);
    let c = tree.new_table(t, "c", TableKind::Primitive);

    assert_eq!(tree.children(root), &[t]);
    assert_eq!(tree.children(t), &[a, b, c]);
}

#[test]
fn parent_links_point_back() {
    let mut tree = Tree::new();
    let root = tree.root();
    let outer = tree.new_table(root, "outer", TableKind::Array);
    let element = tree.new_array_element(outer);
    let kv = tree.new_key_value(element, "k", Payload::Scalar(Scalar::Null), 3);

    assert_eq!(tree.parent(outer), Some(root));
    assert_eq!(tree.parent(element), Some(outer));
    assert_eq!(tree.parent(kv), Some(element));
}

#[test]
fn kind_tags() {
    let mut tree = Tree::new();
    let root = tree.root();
    let prim = tree.new_table(root, "p", TableKind::Primitive);
    let arr = tree.new_table(root, "a", TableKind::Array);
    let element = tree.new_array_element(arr);
    let scalar = tree.new_key_value(prim, "s", Payload::Scalar(Scalar::Boolean(true)), 1);
    let list = tree.new_key_value(prim, "l", Payload::Array(Vec::new()), 2);
    let stub = tree.new_stub(element);

    assert_eq!(tree.kind(prim), NodeKind::Table(TableKind::Primitive));
    assert_eq!(tree.kind(arr), NodeKind::Table(TableKind::Array));
    assert_eq!(tree.kind(element), NodeKind::ArrayElement);
    assert_eq!(tree.kind(scalar), NodeKind::KeyValue(PayloadKind::Scalar));
    assert_eq!(tree.kind(list), NodeKind::KeyValue(PayloadKind::Array));
    assert_eq!(tree.kind(stub), NodeKind::Stub);
}

#[test]
fn child_named_returns_first_match() {
    let mut tree = Tree::new();
    let root = tree.root();
    let first = tree.new_table(root, "dup", TableKind::Primitive);
    let _second = tree.new_table(root, "dup", TableKind::Primitive);

    assert_eq!(tree.child_named(root, "dup"), Some(first));
    assert_eq!(tree.child_named(root, "missing"), None);
}

#[test]
fn full_path_skips_unnamed_links() {
    let mut tree = Tree::new();
    let root = tree.root();
    let servers = tree.new_table(root, "servers", TableKind::Array);
    let element = tree.new_array_element(servers);
    let net = tree.new_table(element, "net", TableKind::Primitive);
    let kv = tree.new_key_value(net, "port", Payload::Scalar(Scalar::Integer(1)), 1);

    assert_eq!(tree.full_path(root), "");
    assert_eq!(tree.full_path(servers), "servers");
    assert_eq!(tree.full_path(element), "servers");
    assert_eq!(tree.full_path(net), "servers.net");
    assert_eq!(tree.full_path(kv), "servers.net.port");
}

#[test]
fn full_path_quotes_awkward_segments() {
    let mut tree = Tree::new();
    let root = tree.root();
    let dotted = tree.new_table(root, "a.b", TableKind::Primitive);
    let spaced = tree.new_key_value(dotted, "x y", Payload::Scalar(Scalar::Null), 1);
    let quoted = tree.new_key_value(dotted, "say \"hi\"", Payload::Scalar(Scalar::Null), 2);
    let empty = tree.new_table(dotted, "", TableKind::Primitive);

    assert_eq!(tree.full_path(dotted), "\"a.b\"");
    assert_eq!(tree.full_path(spaced), "\"a.b\".\"x y\"");
    assert_eq!(tree.full_path(quoted), "\"a.b\".\"say \\\"hi\\\"\"");
    assert_eq!(tree.full_path(empty), "\"a.b\".\"\"");
}

#[test]
fn payload_line_and_null_accessors() {
    let mut tree = Tree::new();
    let root = tree.root();
    let t = tree.new_table(root, "t", TableKind::Primitive);
    let kv = tree.new_key_value(t, "k", Payload::Scalar(Scalar::Null), 42);
    let other = tree.new_key_value(t, "o", Payload::Scalar(Scalar::Integer(7)), 43);

    assert!(tree.is_null(kv));
    assert!(!tree.is_null(other));
    assert!(!tree.is_null(t));
    assert_eq!(tree.line_of(kv), Some(42));
    assert_eq!(tree.line_of(t), None);
    assert_eq!(
        tree.payload(other).and_then(Payload::as_scalar),
        Some(&Scalar::Integer(7))
    );
    assert_eq!(tree.payload(t), None);
}

#[test]
fn ids_cover_every_node_in_creation_order() {
    let mut tree = Tree::new();
    let root = tree.root();
    let t = tree.new_table(root, "t", TableKind::Primitive);
    let kv = tree.new_key_value(t, "k", Payload::Scalar(Scalar::Integer(0)), 1);

    let ids: Vec<_> = tree.ids().collect();
    assert_eq!(ids, vec![root, t, kv]);
    assert_eq!(tree.node_count(), 3);
}

#[test]
fn node_accessors_match_tree_accessors() {
    let mut tree = Tree::new();
    let t = tree.new_table(tree.root(), "t", TableKind::Primitive);
    let node = &tree[t];
    assert_eq!(node.kind(), NodeKind::Table(TableKind::Primitive));
    assert_eq!(node.name(), Some("t"));
    assert_eq!(node.parent(), Some(tree.root()));
    assert!(node.children().is_empty());
    assert_eq!(node.payload(), None);
    assert_eq!(node.line(), None);
}

#[test]
fn debug_rendering_is_indented() {
    let mut tree = Tree::new();
    let root = tree.root();
    let t = tree.new_table(root, "t", TableKind::Primitive);
    tree.new_key_value(t, "k", Payload::Scalar(Scalar::Integer(5)), 1);

    let rendered = format!("{tree:?}");
    assert_eq!(rendered, "file\n  table t\n    k = 5\n");
}
