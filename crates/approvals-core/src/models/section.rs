//! Declarative section trees.
//!
//! Sections are plain data supplied by templates (and, through them, by
//! untrusted requesters). They describe *which* allowlisted element to build
//! and with what props; they never carry code.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Props = Map<String, Value>;

/// One entry of a section list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section {
    Text(String),
    Node(SectionNode),
    /// `null` entries; skipped when rendering
    Empty,
    /// Any other JSON scalar or array. Falsy ones are skipped, the rest are
    /// reported as malformed nodes.
    Other(Value),
}

/// `{ element, children, props }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionNode {
    /// Allowlist token. Missing tokens render like unknown ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Children>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Props,
}

/// The `children` slot of a node, and the root input of the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Children {
    Text(String),
    List(Vec<Section>),
    Single(Box<Section>),
}

impl Section {
    pub fn text(text: impl Into<String>) -> Self {
        Section::Text(text.into())
    }

    /// Start a node for `element`
    pub fn element(element: impl Into<String>) -> SectionNode {
        SectionNode::new(element)
    }

    /// Mirrors JS truthiness for the non-node variants
    pub fn is_falsy(&self) -> bool {
        match self {
            Section::Empty => true,
            Section::Other(value) => match value {
                Value::Null => true,
                Value::Bool(b) => !b,
                Value::Number(n) => n.as_f64() == Some(0.0),
                _ => false,
            },
            Section::Text(_) | Section::Node(_) => false,
        }
    }
}

impl SectionNode {
    pub fn new(element: impl Into<String>) -> Self {
        Self {
            element: Some(element.into()),
            children: None,
            props: Props::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children = Some(Children::Text(text.into()));
        self
    }

    pub fn with_children(mut self, children: Vec<Section>) -> Self {
        self.children = Some(Children::List(children));
        self
    }

    /// Merge a JSON object into the props. Non-object values are ignored.
    pub fn with_props(mut self, props: Value) -> Self {
        if let Value::Object(map) = props {
            self.props.extend(map);
        }
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.props.insert(key.into(), value);
        self
    }
}

impl From<SectionNode> for Section {
    fn from(node: SectionNode) -> Self {
        Section::Node(node)
    }
}

impl From<&str> for Section {
    fn from(text: &str) -> Self {
        Section::Text(text.to_string())
    }
}

impl From<String> for Section {
    fn from(text: String) -> Self {
        Section::Text(text)
    }
}

impl Children {
    /// An empty string or empty list counts as "no children"
    pub fn is_empty(&self) -> bool {
        match self {
            Children::Text(text) => text.is_empty(),
            Children::List(list) => list.is_empty(),
            Children::Single(_) => false,
        }
    }
}

impl From<Vec<Section>> for Children {
    fn from(list: Vec<Section>) -> Self {
        Children::List(list)
    }
}
