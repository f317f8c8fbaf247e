use std::rc::Rc;

use super::allowlist::{registry, AllowlistRegistry, ElementInit};
use super::node::RenderedNode;
use crate::models::{Children, Section, SectionNode};

const MISSING_TOKEN: &str = "<missing>";
const MALFORMED_TOKEN: &str = "<malformed>";

/// Result of rendering one section tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderOutput {
    pub nodes: Vec<RenderedNode>,
    /// Tokens that were skipped because they are not allowlisted, in the
    /// order they were encountered (including nested ones)
    pub rejected: Vec<String>,
}

impl RenderOutput {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.nodes.iter().map(RenderedNode::plain_text).collect()
    }
}

/// Render `sections` against `registry`.
///
/// Never fails: unknown or malformed nodes are logged, recorded in
/// `rejected` and skipped without affecting their siblings.
pub fn render_sections(registry: &AllowlistRegistry, sections: Option<&Children>) -> RenderOutput {
    let mut rejected = Vec::new();
    let nodes = match sections {
        // An empty root string is falsy, like a missing root
        None => Vec::new(),
        Some(Children::Text(text)) if text.is_empty() => Vec::new(),
        Some(children) => render_children(registry, children, &mut rejected),
    };
    RenderOutput { nodes, rejected }
}

fn render_children(
    registry: &AllowlistRegistry,
    children: &Children,
    rejected: &mut Vec<String>,
) -> Vec<RenderedNode> {
    match children {
        Children::Text(text) => vec![RenderedNode::Text(text.clone())],
        Children::List(list) => render_list(registry, list, rejected),
        Children::Single(section) => render_list(registry, std::slice::from_ref(section), rejected),
    }
}

fn render_list(
    registry: &AllowlistRegistry,
    list: &[Section],
    rejected: &mut Vec<String>,
) -> Vec<RenderedNode> {
    let mut out = Vec::with_capacity(list.len());
    for (index, section) in list.iter().enumerate() {
        match section {
            Section::Text(text) => out.push(RenderedNode::Text(text.clone())),
            Section::Node(node) => {
                if let Some(rendered) = render_node(registry, node, index, rejected) {
                    out.push(rendered);
                }
            }
            other if other.is_falsy() => {}
            Section::Empty => {}
            Section::Other(value) => {
                tracing::warn!(
                    "malformed section entry {} is not in the safe component list and will not be rendered",
                    value
                );
                rejected.push(MALFORMED_TOKEN.to_string());
            }
        }
    }
    out
}

fn render_node(
    registry: &AllowlistRegistry,
    node: &SectionNode,
    index: usize,
    rejected: &mut Vec<String>,
) -> Option<RenderedNode> {
    let token = node.element.as_deref().unwrap_or(MISSING_TOKEN);
    let Some(factory) = node.element.as_deref().and_then(|t| registry.resolve(t)) else {
        tracing::warn!(
            "{} is not in the safe component list and will not be rendered",
            token
        );
        rejected.push(token.to_string());
        return None;
    };

    let children = node
        .children
        .as_ref()
        .filter(|children| !children.is_empty())
        .map(|children| render_children(registry, children, rejected));

    let element = factory(ElementInit {
        key: format!("{}{}", token, index),
        props: &node.props,
        children,
    });
    Some(RenderedNode::Element(element))
}

/// Memoizing renderer.
///
/// Holds the last input and output; a deep-equal input returns the previous
/// `Rc` without walking the tree again.
pub struct TemplateRenderer {
    registry: &'static AllowlistRegistry,
    last: Option<(Option<Children>, Rc<RenderOutput>)>,
    render_count: u64,
}

impl TemplateRenderer {
    pub fn new() -> Self {
        Self::with_registry(registry())
    }

    pub fn with_registry(registry: &'static AllowlistRegistry) -> Self {
        Self {
            registry,
            last: None,
            render_count: 0,
        }
    }

    pub fn render(&mut self, sections: Option<&Children>) -> Rc<RenderOutput> {
        if let Some((input, output)) = &self.last {
            if input.as_ref() == sections {
                return Rc::clone(output);
            }
        }

        let output = Rc::new(render_sections(self.registry, sections));
        self.last = Some((sections.cloned(), Rc::clone(&output)));
        self.render_count += 1;
        output
    }

    /// Number of full renders performed (memo hits excluded)
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Drop the memo, e.g. when the hosting view is torn down
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::node::{ElementKind, TextAlign};
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Children {
        serde_json::from_value(value).unwrap()
    }

    fn keys(nodes: &[RenderedNode]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(RenderedNode::as_element)
            .map(|e| e.key.clone())
            .collect()
    }

    #[test]
    fn test_none_renders_nothing() {
        let output = render_sections(registry(), None);
        assert!(output.is_empty());
        assert!(output.rejected.is_empty());
    }

    #[test]
    fn test_string_root_is_single_text_node() {
        let output = render_sections(registry(), Some(&Children::Text("hello".into())));
        assert_eq!(output.nodes, vec![RenderedNode::Text("hello".into())]);
    }

    #[test]
    fn test_empty_string_root_renders_nothing() {
        let output = render_sections(registry(), Some(&Children::Text(String::new())));
        assert!(output.is_empty());

        let mut renderer = TemplateRenderer::new();
        assert!(renderer.render(Some(&parse(json!("")))).is_empty());
    }

    #[test]
    fn test_unknown_element_skipped_siblings_kept() {
        let sections = parse(json!([
            { "element": "b", "children": "before" },
            { "element": "script", "children": "alert(1)" },
            { "element": "span", "children": "after" }
        ]));
        let output = render_sections(registry(), Some(&sections));

        assert_eq!(output.nodes.len(), 2);
        assert_eq!(output.plain_text(), "beforeafter");
        assert_eq!(output.rejected, vec!["script".to_string()]);
        // Keys come from the original positions, skipped entries included
        assert_eq!(keys(&output.nodes), vec!["b0", "span2"]);
    }

    #[test]
    fn test_missing_element_treated_as_unknown() {
        let sections = parse(json!([
            { "children": "orphan" },
            "tail"
        ]));
        let output = render_sections(registry(), Some(&sections));
        assert_eq!(output.nodes, vec![RenderedNode::Text("tail".into())]);
        assert_eq!(output.rejected, vec![MISSING_TOKEN.to_string()]);
    }

    #[test]
    fn test_falsy_entries_skipped_silently() {
        let sections = parse(json!([null, false, 0, "x", true]));
        let output = render_sections(registry(), Some(&sections));
        assert_eq!(output.nodes, vec![RenderedNode::Text("x".into())]);
        // `true` is not falsy, so it is reported
        assert_eq!(output.rejected, vec![MALFORMED_TOKEN.to_string()]);
    }

    #[test]
    fn test_nested_children_render_recursively() {
        let sections = parse(json!([{
            "element": "Typography",
            "props": { "align": "center" },
            "children": [
                { "element": "b", "children": "Only add networks you trust " },
                { "element": "iframe" },
                "Untrustworthy networks can be risky"
            ]
        }]));
        let output = render_sections(registry(), Some(&sections));

        let typography = output.nodes[0].as_element().unwrap();
        assert!(matches!(
            &typography.kind,
            ElementKind::Typography(props) if props.align == TextAlign::Center
        ));
        let children = typography.children.as_ref().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].as_element().unwrap().key, "b0");
        assert_eq!(
            output.plain_text(),
            "Only add networks you trust Untrustworthy networks can be risky"
        );
        assert_eq!(output.rejected, vec!["iframe".to_string()]);
    }

    #[test]
    fn test_unknown_parent_drops_its_subtree() {
        let sections = parse(json!([{
            "element": "marquee",
            "children": [{ "element": "b", "children": "hidden" }]
        }]));
        let output = render_sections(registry(), Some(&sections));
        assert!(output.is_empty());
        // Children of a rejected node are never visited
        assert_eq!(output.rejected, vec!["marquee".to_string()]);
    }

    #[test]
    fn test_element_without_children_has_empty_slot() {
        let sections = parse(json!([
            { "element": "Box" },
            { "element": "div", "children": "" },
            { "element": "p", "children": [] }
        ]));
        let output = render_sections(registry(), Some(&sections));
        assert_eq!(output.nodes.len(), 3);
        for node in &output.nodes {
            assert!(node.as_element().unwrap().children.is_none());
        }
    }

    #[test]
    fn test_memo_returns_same_output_for_deep_equal_input() {
        let mut renderer = TemplateRenderer::new();
        let first_input = parse(json!([{ "element": "b", "children": "x" }, "y"]));
        let second_input = parse(json!([{ "element": "b", "children": "x" }, "y"]));

        let first = renderer.render(Some(&first_input));
        let second = renderer.render(Some(&second_input));

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(renderer.render_count(), 1);
    }

    #[test]
    fn test_memo_rerenders_on_change() {
        let mut renderer = TemplateRenderer::new();
        let first = renderer.render(Some(&Children::Text("a".into())));
        let second = renderer.render(Some(&Children::Text("b".into())));
        assert!(!Rc::ptr_eq(&first, &second));
        assert_eq!(renderer.render_count(), 2);

        let empty = renderer.render(None);
        assert!(empty.is_empty());
        let again = renderer.render(None);
        assert!(Rc::ptr_eq(&empty, &again));
        assert_eq!(renderer.render_count(), 3);
    }
}
