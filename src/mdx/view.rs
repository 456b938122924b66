//! View tree produced by the renderer.
//!
//! Owned, serializable, and convertible to HTML.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Element properties, ordered by name
pub type Props = BTreeMap<String, PropValue>;

/// HTML elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropValue {
    /// Quoted string attribute (`title="x"`)
    Literal(String),

    /// Decoded literal expression (`{1}`, `{true}`, `{["a"]}`) or bare flag
    Json(Value),

    /// Expression source that was not evaluated
    Expression(String),
}

impl PropValue {
    /// String view of the value, if it has a natural one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Literal(s) => Some(s),
            PropValue::Json(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Attribute text for HTML output, `None` when the attribute is omitted
    fn attribute_text(&self) -> Option<String> {
        match self {
            PropValue::Literal(s) => Some(s.clone()),
            PropValue::Json(Value::Bool(false)) | PropValue::Json(Value::Null) => None,
            PropValue::Json(Value::String(s)) => Some(s.clone()),
            PropValue::Json(value) => Some(value.to_string()),
            PropValue::Expression(source) => Some(source.clone()),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Literal(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Literal(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Json(Value::Bool(b))
    }
}

/// An element with a tag name, properties and children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub props: Props,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewNode>,
}

/// A node in the rendered view tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewNode {
    Element(Element),
    Text { value: String },
    Fragment { children: Vec<ViewNode> },
}

impl ViewNode {
    /// Element with no props and no children
    pub fn element(tag: impl Into<String>) -> Self {
        ViewNode::Element(Element {
            tag: tag.into(),
            props: Props::new(),
            children: Vec::new(),
        })
    }

    /// Element with the given props and children
    pub fn element_with(tag: impl Into<String>, props: Props, children: Vec<ViewNode>) -> Self {
        ViewNode::Element(Element {
            tag: tag.into(),
            props,
            children,
        })
    }

    /// Text node
    pub fn text(value: impl Into<String>) -> Self {
        ViewNode::Text {
            value: value.into(),
        }
    }

    /// Fragment grouping several nodes without a wrapper
    pub fn fragment(children: Vec<ViewNode>) -> Self {
        ViewNode::Fragment { children }
    }

    /// Set a prop (builder style). No-op on text and fragments.
    pub fn with_prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        if let ViewNode::Element(element) = &mut self {
            element.props.insert(name.into(), value.into());
        }
        self
    }

    /// Append a child (builder style). Text nodes are left unchanged.
    pub fn with_child(mut self, child: ViewNode) -> Self {
        match &mut self {
            ViewNode::Element(element) => element.children.push(child),
            ViewNode::Fragment { children } => children.push(child),
            ViewNode::Text { .. } => {}
        }
        self
    }

    /// Tag name, for elements
    pub fn tag(&self) -> Option<&str> {
        match self {
            ViewNode::Element(element) => Some(&element.tag),
            _ => None,
        }
    }

    /// Prop value, for elements
    pub fn prop(&self, name: &str) -> Option<&PropValue> {
        match self {
            ViewNode::Element(element) => element.props.get(name),
            _ => None,
        }
    }

    /// Direct children (empty for text)
    pub fn children(&self) -> &[ViewNode] {
        match self {
            ViewNode::Element(element) => &element.children,
            ViewNode::Fragment { children } => children,
            ViewNode::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            ViewNode::Text { value } => out.push_str(value),
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Depth-first search for the first element with `tag`
    pub fn find(&self, tag: &str) -> Option<&ViewNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(tag))
    }

    /// Depth-first list of every element with `tag`
    pub fn find_all<'a>(&'a self, tag: &str) -> Vec<&'a ViewNode> {
        let mut found = Vec::new();
        self.collect_tag(tag, &mut found);
        found
    }

    fn collect_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a ViewNode>) {
        if self.tag() == Some(tag) {
            found.push(self);
        }
        for child in self.children() {
            child.collect_tag(tag, found);
        }
    }

    /// Render as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            ViewNode::Text { value } => out.push_str(&escape_html(value)),
            ViewNode::Fragment { children } => {
                for child in children {
                    child.write_html(out);
                }
            }
            ViewNode::Element(element) => {
                out.push('<');
                out.push_str(&element.tag);
                for (name, value) in &element.props {
                    match (value, value.attribute_text()) {
                        (PropValue::Json(Value::Bool(true)), _) => {
                            let _ = write!(out, " {}", name);
                        }
                        (_, Some(text)) => {
                            let _ = write!(out, " {}=\"{}\"", name, escape_html(&text));
                        }
                        (_, None) => {}
                    }
                }

                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    out.push_str(" />");
                    return;
                }

                out.push('>');
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
