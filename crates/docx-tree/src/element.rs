//! Declarative element descriptions.
//!
//! An [`Element`] is what a render pass is asked to produce. The
//! [`Reconciler`](crate::Reconciler) turns successive element trees into host
//! mutations.

use std::fmt;
use std::rc::Rc;

use ecow::EcoString;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::node::Props;

/// A declarative description of part of a document.
#[derive(Clone, Default)]
pub enum Element {
    /// Renders nothing.
    #[default]
    Empty,
    /// A bare text value.
    Text(EcoString),
    /// A list of sibling elements.
    Fragment(Vec<Element>),
    /// An element backed by a host node.
    Host(HostElement),
    /// A function component.
    Component(ComponentElement),
}

/// An element backed by a host node.
#[derive(Debug, Clone, PartialEq)]
pub struct HostElement {
    /// The element tag, e.g. `"Paragraph"`.
    pub tag: EcoString,
    /// Identity among siblings.
    pub key: Option<EcoString>,
    /// The property bag.
    pub props: Props,
    /// Ordered children.
    pub children: Vec<Element>,
}

/// A named render function producing an element on demand.
#[derive(Clone)]
pub struct ComponentElement {
    /// The component name, used as its type identity.
    pub name: EcoString,
    /// Identity among siblings.
    pub key: Option<EcoString>,
    render: Rc<dyn Fn() -> Element>,
}

impl ComponentElement {
    /// Invokes the render function.
    pub fn render(&self) -> Element {
        (self.render)()
    }
}

impl fmt::Debug for ComponentElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentElement")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Empty => f.write_str("Empty"),
            Element::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Element::Fragment(children) => f.debug_tuple("Fragment").field(children).finish(),
            Element::Host(host) => host.fmt(f),
            Element::Component(component) => component.fmt(f),
        }
    }
}

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Element::Empty, Element::Empty) => true,
            (Element::Text(a), Element::Text(b)) => a == b,
            (Element::Fragment(a), Element::Fragment(b)) => a == b,
            (Element::Host(a), Element::Host(b)) => a == b,
            (Element::Component(a), Element::Component(b)) => {
                a.name == b.name && a.key == b.key && Rc::ptr_eq(&a.render, &b.render)
            }
            _ => false,
        }
    }
}

impl Element {
    /// Creates a host element.
    pub fn host(tag: impl Into<EcoString>, props: Props, children: Vec<Element>) -> Self {
        Element::Host(HostElement {
            tag: tag.into(),
            key: None,
            props,
            children,
        })
    }

    /// Creates a text element.
    pub fn text(text: impl Into<EcoString>) -> Self {
        Element::Text(text.into())
    }

    /// Creates a fragment.
    pub fn fragment(children: impl IntoIterator<Item = Element>) -> Self {
        Element::Fragment(children.into_iter().collect())
    }

    /// Creates a function component.
    pub fn component(name: impl Into<EcoString>, render: impl Fn() -> Element + 'static) -> Self {
        Element::Component(ComponentElement {
            name: name.into(),
            key: None,
            render: Rc::new(render),
        })
    }

    /// Sets the key of a host element or component; other elements are
    /// returned unchanged.
    pub fn with_key(mut self, key: impl Into<EcoString>) -> Self {
        match &mut self {
            Element::Host(host) => host.key = Some(key.into()),
            Element::Component(component) => component.key = Some(key.into()),
            _ => {}
        }
        self
    }

    /// The explicit key, if any.
    pub fn key(&self) -> Option<&EcoString> {
        match self {
            Element::Host(host) => host.key.as_ref(),
            Element::Component(component) => component.key.as_ref(),
            _ => None,
        }
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::text(text)
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::text(text)
    }
}

impl From<Vec<Element>> for Element {
    fn from(children: Vec<Element>) -> Self {
        Element::Fragment(children)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawElement {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<RawElement>),
    Host {
        #[serde(rename = "type")]
        tag: String,
        #[serde(default)]
        key: Option<Value>,
        #[serde(default)]
        props: Props,
        #[serde(default)]
        children: Vec<RawElement>,
    },
}

impl From<RawElement> for Element {
    fn from(raw: RawElement) -> Self {
        match raw {
            RawElement::Null | RawElement::Bool(_) => Element::Empty,
            RawElement::Number(number) => Element::text(number.to_string()),
            RawElement::Text(text) => Element::text(text),
            RawElement::List(items) => Element::fragment(items.into_iter().map(Element::from)),
            RawElement::Host {
                tag,
                key,
                props,
                children,
            } => Element::Host(HostElement {
                tag: tag.into(),
                key: key.and_then(|key| match key {
                    Value::String(key) => Some(key.into()),
                    Value::Number(key) => Some(key.to_string().into()),
                    _ => None,
                }),
                props,
                children: children.into_iter().map(Element::from).collect(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Element {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawElement::deserialize(deserializer).map(Element::from)
    }
}
