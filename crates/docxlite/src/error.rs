use core::fmt;
use std::{borrow::Cow, ops::Deref};

use docx_tree::TreeError;

/// An error that can occur while rendering a document.
#[derive(Clone)]
pub struct Error(Box<Repr>);

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The node tree violates a structural rule.
    Structural,
    /// A property bag does not fit its packager object.
    InvalidProperties,
    /// The packager rejected the object graph or failed to encode it.
    Packager,
    /// The element tree could not be turned into nodes.
    Tree,
    /// Anything else.
    Other,
}

#[derive(Clone)]
enum Repr {
    /// Just a message.
    Msg(Cow<'static, str>),
    Structural(Cow<'static, str>),
    InvalidProperties {
        kind: &'static str,
        message: String,
    },
    Packager(Cow<'static, str>),
    Tree(TreeError),
}

impl Error {
    /// A structural rule violation.
    pub fn structural(msg: impl Into<Cow<'static, str>>) -> Self {
        Error(Box::new(Repr::Structural(msg.into())))
    }

    /// A property bag of `kind` that failed to deserialize.
    pub fn invalid_properties(kind: &'static str, message: impl fmt::Display) -> Self {
        Error(Box::new(Repr::InvalidProperties {
            kind,
            message: message.to_string(),
        }))
    }

    /// A packaging failure.
    pub fn packager(msg: impl Into<Cow<'static, str>>) -> Self {
        Error(Box::new(Repr::Packager(msg.into())))
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self.0.deref() {
            Repr::Msg(_) => ErrorKind::Other,
            Repr::Structural(_) => ErrorKind::Structural,
            Repr::InvalidProperties { .. } => ErrorKind::InvalidProperties,
            Repr::Packager(_) => ErrorKind::Packager,
            Repr::Tree(_) => ErrorKind::Tree,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.deref() {
            Repr::Msg(s) | Repr::Structural(s) | Repr::Packager(s) => write!(f, "{s}"),
            Repr::InvalidProperties { kind, message } => {
                write!(f, "Invalid properties for {kind}: {message}")
            }
            Repr::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl From<TreeError> for Error {
    fn from(e: TreeError) -> Self {
        Error(Box::new(Repr::Tree(e)))
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<fmt::Error> for Error {
    fn from(e: fmt::Error) -> Self {
        Error(Box::new(Repr::Msg(e.to_string().into())))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error(Box::new(Repr::Msg(format!("Invalid element tree: {e}").into())))
    }
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error(Box::new(Repr::Msg(s.into())))
    }
}
