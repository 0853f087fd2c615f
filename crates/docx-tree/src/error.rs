//! Error handling for the document node tree.
//!
//! This module provides the error type raised while turning declarative
//! elements into tree nodes.

use ecow::EcoString;

use std::error::Error;
use std::fmt::{self, Display};

/// Errors that can occur while building the document node tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TreeError {
    /// An element tag does not name any known node kind.
    UnknownElementKind(EcoString),
}

impl Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::UnknownElementKind(tag) => write!(f, "Unknown element kind: {tag}"),
        }
    }
}

impl Error for TreeError {}

/// Result type alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
