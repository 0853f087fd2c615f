//! # docx-tree
//!
//! The intermediate layer between declarative element trees and a document
//! packager. Elements are reconciled into a mutable node tree through the
//! [`HostConfig`] contract; the finished tree is handed out as owned
//! [`Node`]s, one per element, each tagged with a [`NodeKind`] and carrying its
//! property bag untouched.
//!
//! ```
//! use docx_tree::components::*;
//! use docx_tree::{NodeKind, build_tree};
//!
//! let element = document()
//!     .child(section().child(paragraph().child(text_run("Hello"))))
//!     .build();
//! let root = build_tree(element).unwrap().unwrap();
//! assert_eq!(root.kind, NodeKind::Document);
//! ```

pub mod components;
pub mod element;
pub mod error;
pub mod host;
pub mod node;
pub mod reconciler;

mod builder;

pub use builder::{Container, NodeId, TreeBuilder};
pub use element::{ComponentElement, Element, HostElement};
pub use error::{TreeError, TreeResult};
pub use host::{DocxHost, build_tree};
pub use node::{Node, NodeKind, Props};
pub use reconciler::{HostConfig, Reconciler};

#[cfg(test)]
mod tests;
