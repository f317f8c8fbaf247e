use serde_json::Value;

use crate::models::{Props, Severity};

/// Output of the renderer: text leaves and constructed elements.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedNode {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Order-derived identity (`"{token}{index}"`), stable across re-renders
    pub key: String,
    pub kind: ElementKind,
    /// The single child slot; `None` when the section had no children
    pub children: Option<Vec<RenderedNode>>,
}

/// Every element the allowlist can produce, with its props already parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// `Box`, `div`
    Container,
    /// `p`
    Paragraph,
    Typography(TypographyProps),
    /// `b`
    Strong,
    Span,
    /// `a`
    Link { href: Option<String> },
    Button { primary: bool },
    Callout { severity: Severity },
    Chip { label: Option<String> },
    SiteIcon { name: String, icon: Option<String> },
    /// `DefinitionList`, `TruncatedDefinitionList`
    DefinitionList(DefinitionListProps),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TypographyProps {
    pub variant: Option<String>,
    pub align: TextAlign,
    pub bold: bool,
    /// Bottom margin in spacing units, from `boxProps.margin`
    pub margin_bottom: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinitionListProps {
    pub title: Option<String>,
    pub entries: Vec<(String, String)>,
    pub tooltips: Vec<(String, String)>,
    /// Terms shown before the list is expanded
    pub preface_keys: Vec<String>,
    pub truncated: bool,
}

impl RenderedNode {
    /// Concatenated text of this subtree, for assertions and plain output
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            RenderedNode::Text(text) => out.push_str(text),
            RenderedNode::Element(element) => {
                for child in element.children.iter().flatten() {
                    child.collect_text(out);
                }
            }
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            RenderedNode::Element(element) => Some(element),
            RenderedNode::Text(_) => None,
        }
    }
}

// ===== Prop parsing helpers used by the allowlist factories =====

pub(crate) fn prop_str(props: &Props, key: &str) -> Option<String> {
    props.get(key).and_then(Value::as_str).map(str::to_string)
}

pub(crate) fn prop_bool(props: &Props, key: &str) -> bool {
    props.get(key).and_then(Value::as_bool).unwrap_or(false)
}

/// Display form of a scalar prop value (numbers keep their decimal form)
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub(crate) fn prop_pairs(props: &Props, key: &str) -> Vec<(String, String)> {
    props
        .get(key)
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .map(|(term, value)| (term.clone(), display_value(value)))
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn prop_strings(props: &Props, key: &str) -> Vec<String> {
    props
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(display_value).collect())
        .unwrap_or_default()
}

/// Largest margin a section may request; anything above is clamped
pub const MAX_MARGIN_UNITS: u64 = 16;

/// Bottom margin from a CSS-style shorthand: `n`, `[all]`, `[v, h]`,
/// `[top, h, bottom]` or `[top, right, bottom, left]`, clamped to
/// [`MAX_MARGIN_UNITS`]
pub(crate) fn margin_bottom(props: &Props) -> u64 {
    let margin = props
        .get("boxProps")
        .and_then(|box_props| box_props.get("margin"));
    let units = match margin {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::Array(parts)) => {
            let index = match parts.len() {
                0 => return 0,
                1 | 2 => 0,
                _ => 2,
            };
            parts.get(index).and_then(Value::as_u64).unwrap_or(0)
        }
        _ => 0,
    };
    units.min(MAX_MARGIN_UNITS)
}
