use crate::builder::ChildIndex;
use crate::node::{NodeKind, TableKind, Tree};
use crate::path::{KeyPath, descend_segment, push_segment, resolve_tables};
use crate::value::{Payload, Scalar};
use crate::ErrorKind;

#[test]
fn parse_splits_on_dots() {
    let cases = [
        ("a", vec!["a"]),
        ("a.b.c", vec!["a", "b", "c"]),
        ("a . b", vec!["a", "b"]),
        ("key-1.key_2", vec!["key-1", "key_2"]),
        ("\"a.b\".c", vec!["a.b", "c"]),
        ("'x y'.z", vec!["x y", "z"]),
        ("\"\"", vec![""]),
    ];
    for (input, expected) in cases {
        let path = KeyPath::parse(input)
            .unwrap_or_else(|e| panic!("parse failed for {input:?}: {e}"));
        let segments: Vec<&str> = path.segments().iter().map(|s| s.as_ref()).collect();
        assert_eq!(segments, expected, "input: {input}");
    }
}

#[test]
fn parse_rejects_malformed_paths() {
    for input in ["", ".", "a.", ".a", "a..b", "\"unterminated", "a b"] {
        assert!(KeyPath::parse(input).is_err(), "accepted {input:?}");
    }
}

#[test]
fn display_requotes_awkward_segments() {
    let path = KeyPath::from_segments(["plain", "a.b", "x y", ""]);
    assert_eq!(path.to_string(), "plain.\"a.b\".\"x y\".\"\"");

    // Display output parses back to the same segments.
    let reparsed = KeyPath::parse(&path.to_string()).unwrap();
    assert_eq!(reparsed, path);
}

#[test]
fn push_segment_quotes_only_when_needed() {
    let mut out = String::new();
    push_segment(&mut out, "plain-key_9");
    assert_eq!(out, "plain-key_9");

    let mut out = String::new();
    push_segment(&mut out, "needs \"quoting\"");
    assert_eq!(out, "\"needs \\\"quoting\\\"\"");
}

#[test]
fn resolver_creates_missing_chain() {
    let mut tree = Tree::new();
    let mut index = ChildIndex::new();
    let root = tree.root();

    let path = KeyPath::parse("a.b.c").unwrap();
    let end = resolve_tables(&mut tree, &mut index, root, path.segments(), 1).unwrap();

    assert_eq!(tree.full_path(end), "a.b.c");
    assert_eq!(tree.kind(end), NodeKind::Table(TableKind::Primitive));
    // The whole chain hangs off the root.
    let a = tree.child_named(root, "a").unwrap();
    let b = tree.child_named(a, "b").unwrap();
    assert_eq!(tree.child_named(b, "c"), Some(end));
}

#[test]
fn resolver_reuses_existing_tables() {
    let mut tree = Tree::new();
    let mut index = ChildIndex::new();
    let root = tree.root();

    let first = resolve_tables(
        &mut tree,
        &mut index,
        root,
        KeyPath::parse("a.b").unwrap().segments(),
        1,
    )
    .unwrap();
    let count = tree.node_count();
    let second = resolve_tables(
        &mut tree,
        &mut index,
        root,
        KeyPath::parse("a.b").unwrap().segments(),
        2,
    )
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(tree.node_count(), count);
}

#[test]
fn resolver_descends_into_latest_array_element() {
    let mut tree = Tree::new();
    let mut index = ChildIndex::new();
    let root = tree.root();

    let container = tree.new_table(root, "arr", TableKind::Array);
    index.record(&tree, root, container);
    let first = tree.new_array_element(container);

    let at = descend_segment(&mut tree, &mut index, root, "arr", 1).unwrap();
    assert_eq!(at, first);

    let second = tree.new_array_element(container);
    let at = descend_segment(&mut tree, &mut index, root, "arr", 2).unwrap();
    assert_eq!(at, second);
}

#[test]
fn resolver_refuses_terminal_nodes() {
    let mut tree = Tree::new();
    let mut index = ChildIndex::new();
    let root = tree.root();

    let t = tree.new_table(root, "t", TableKind::Primitive);
    index.record(&tree, root, t);
    let kv = tree.new_key_value(t, "leaf", Payload::Scalar(Scalar::Integer(1)), 1);
    index.record(&tree, t, kv);

    let e = resolve_tables(
        &mut tree,
        &mut index,
        root,
        KeyPath::parse("t.leaf.deeper").unwrap().segments(),
        9,
    )
    .unwrap_err();
    match e.kind {
        ErrorKind::UnresolvablePath { path } => assert_eq!(path, "t.leaf"),
        other => panic!("unexpected kind: {other}"),
    }
    assert_eq!(e.line, Some(9));
}

#[test]
fn from_str_is_a_single_segment() {
    let path = KeyPath::from("a.b");
    assert_eq!(path.len(), 1);
    assert_eq!(path.segments()[0].as_ref(), "a.b");
    assert_eq!(path.to_string(), "\"a.b\"");
}
