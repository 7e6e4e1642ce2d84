//! The minimal host element model.
//!
//! The styling layer does not implement a rendering framework. It only needs
//! a shape to hand back from a render pass: a concrete tag, an attribute map,
//! and children. Attributes travel as JSON maps so any host framework (or a
//! test) can construct and inspect them without an adapter layer.

use serde_json::Value;
use std::fmt;

/// Attribute and prop maps are plain JSON objects.
pub type PropMap = serde_json::Map<String, Value>;

/// The concrete render target of an element: either a plain markup tag
/// (`div`, `button`) or a named host component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementTag {
    /// A plain markup tag, rendered verbatim.
    Tag(String),
    /// An opaque host component, identified by display name.
    Component(String),
}

impl ElementTag {
    /// Returns true for plain markup tags (as opposed to host components).
    pub fn is_plain(&self) -> bool {
        matches!(self, ElementTag::Tag(_))
    }

    /// The tag or component name.
    pub fn name(&self) -> &str {
        match self {
            ElementTag::Tag(name) | ElementTag::Component(name) => name,
        }
    }
}

/// A child of an element: nested markup or a text run.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A rendered element: the host framework's element-creation call produces
/// one of these from a tag, merged attributes, and unchanged children.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: ElementTag,
    attrs: PropMap,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: ElementTag, attrs: PropMap, children: Vec<Node>) -> Self {
        Self {
            tag,
            attrs,
            children,
        }
    }

    pub fn tag(&self) -> &ElementTag {
        &self.tag
    }

    pub fn attrs(&self) -> &PropMap {
        &self.attrs
    }

    /// Looks up a single attribute.
    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// The `class` attribute, when present and a string.
    pub fn class(&self) -> Option<&str> {
        self.attrs.get("class").and_then(Value::as_str)
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Serializes the element to HTML text.
    ///
    /// This is a convenience for server rendering and tests, not a full HTML
    /// serializer: attributes are emitted in map order, and component tags are
    /// emitted under their display name.
    pub fn to_html(&self) -> String {
        self.to_string()
    }

    fn write_attr_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
        match value {
            Value::String(text) => write!(f, "{}", escape_attr(text)),
            other => write!(f, "{}", escape_attr(&other.to_string())),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag.name())?;
        for (name, value) in &self.attrs {
            if value.is_null() {
                continue;
            }
            write!(f, " {}=\"", name)?;
            Self::write_attr_value(f, value)?;
            write!(f, "\"")?;
        }
        write!(f, ">")?;
        for child in &self.children {
            match child {
                Node::Element(element) => write!(f, "{}", element)?,
                Node::Text(text) => write!(f, "{}", escape_text(text))?,
            }
        }
        write!(f, "</{}>", self.tag.name())
    }
}

fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;").replace('"', "&quot;")
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
