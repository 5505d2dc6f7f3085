//! A relaxed TOML structure parser that builds an ordered, navigable parse
//! tree.
//!
//! The tree is an arena of nodes addressed by [`NodeId`] handles: the File
//! root owns tables, array-of-tables containers with their elements, and
//! key-value leaves, all in declaration order. Redefinition handling is
//! deliberately relaxed — repeating a `[header]` opens a distinct sibling
//! table instead of failing — and after parsing, every table or array
//! element that stayed empty carries a single [`Stub`](NodeKind::Stub)
//! child, so downstream consumers never see a childless container.
//!
//! Value literals stay shallow on purpose: strings, integers, floats,
//! booleans, `null`, and value arrays come out as opaque [`Payload`]s for a
//! typed binder to interpret.
//!
//! # Examples
//!
//! ```
//! use toml_arbor::{NodeKind, TableKind};
//!
//! let content = r#"
//! dev-mode = true
//!
//! [[things]]
//! name = "hammer"
//! value = 43
//!
//! [[things]]
//! name = "drill"
//! color = null
//! "#;
//!
//! let tree = toml_arbor::parse(content)?;
//! let root = tree.root();
//!
//! let things = tree.child_named(root, "things").unwrap();
//! assert_eq!(tree.kind(things), NodeKind::Table(TableKind::Array));
//! assert_eq!(tree.children(things).len(), 2);
//!
//! let second = tree.children(things)[1];
//! let color = tree.child_named(second, "color").unwrap();
//! assert!(tree.is_null(color));
//! assert_eq!(tree.line_of(color), Some(10));
//! assert_eq!(tree.full_path(color), "things.color");
//! # Ok::<(), toml_arbor::Error>(())
//! ```

mod builder;
mod classify;
mod error;
mod line;
mod node;
mod path;
mod value;

pub use builder::Builder;
pub use classify::classify;
pub use error::{Error, ErrorKind};
pub use line::Line;
pub use node::{Node, NodeId, NodeKind, TableKind, Tree};
pub use path::KeyPath;
pub use value::{Payload, PayloadKind, Scalar};

/// Parses a document into a finalized [`Tree`].
///
/// Classifies the input into structural lines, folds them through a
/// [`Builder`], and finalizes the result. Callers that already have
/// classified [`Line`]s can drive a [`Builder`] directly instead.
pub fn parse(input: &str) -> Result<Tree, Error> {
    let mut builder = Builder::new();
    for line in classify::classify(input)? {
        builder.push(line)?;
    }
    Ok(builder.finish())
}
