//! Closed allowlist of renderable elements.
//!
//! The only place where section data selects code to run. Tokens map to
//! plain factory functions; the table is fixed at compile time and exposed
//! through a lazily built, read-only registry.

use std::collections::HashMap;
use std::sync::OnceLock;

use super::node::{
    margin_bottom, prop_bool, prop_pairs, prop_str, prop_strings, DefinitionListProps, Element,
    ElementKind, RenderedNode, TextAlign, TypographyProps,
};
use crate::models::{Props, Severity};

/// Everything a factory gets to build one element
pub struct ElementInit<'a> {
    pub key: String,
    pub props: &'a Props,
    pub children: Option<Vec<RenderedNode>>,
}

pub type ElementFactory = fn(ElementInit<'_>) -> Element;

const SAFE_ELEMENTS: &[(&str, ElementFactory)] = &[
    ("Box", container),
    ("Button", button),
    ("Callout", callout),
    ("Chip", chip),
    ("DefinitionList", definition_list),
    ("SiteIcon", site_icon),
    ("TruncatedDefinitionList", truncated_definition_list),
    ("Typography", typography),
    ("a", link),
    ("b", strong),
    ("div", container),
    ("p", paragraph),
    ("span", span),
];

pub struct AllowlistRegistry {
    factories: HashMap<&'static str, ElementFactory>,
}

impl AllowlistRegistry {
    fn standard() -> Self {
        Self {
            factories: SAFE_ELEMENTS.iter().copied().collect(),
        }
    }

    /// Look up the factory for `token`. Pure; no fallbacks, no case folding.
    pub fn resolve(&self, token: &str) -> Option<ElementFactory> {
        self.factories.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.factories.contains_key(token)
    }

    /// All allowed tokens, sorted
    pub fn tokens(&self) -> Vec<&'static str> {
        let mut tokens: Vec<&'static str> = self.factories.keys().copied().collect();
        tokens.sort_unstable();
        tokens
    }
}

/// Process-wide registry (lazy initialized)
pub fn registry() -> &'static AllowlistRegistry {
    static REGISTRY: OnceLock<AllowlistRegistry> = OnceLock::new();
    REGISTRY.get_or_init(AllowlistRegistry::standard)
}

fn build(init: ElementInit<'_>, kind: ElementKind) -> Element {
    Element {
        key: init.key,
        kind,
        children: init.children,
    }
}

fn container(init: ElementInit<'_>) -> Element {
    build(init, ElementKind::Container)
}

fn paragraph(init: ElementInit<'_>) -> Element {
    build(init, ElementKind::Paragraph)
}

fn strong(init: ElementInit<'_>) -> Element {
    build(init, ElementKind::Strong)
}

fn span(init: ElementInit<'_>) -> Element {
    build(init, ElementKind::Span)
}

fn link(init: ElementInit<'_>) -> Element {
    let href = prop_str(init.props, "href");
    build(init, ElementKind::Link { href })
}

fn button(init: ElementInit<'_>) -> Element {
    let primary = prop_str(init.props, "type").as_deref() == Some("primary");
    build(init, ElementKind::Button { primary })
}

fn callout(init: ElementInit<'_>) -> Element {
    let severity = prop_str(init.props, "severity")
        .as_deref()
        .and_then(Severity::from_token)
        .unwrap_or(Severity::Info);
    build(init, ElementKind::Callout { severity })
}

fn chip(init: ElementInit<'_>) -> Element {
    let label = prop_str(init.props, "label");
    build(init, ElementKind::Chip { label })
}

fn site_icon(init: ElementInit<'_>) -> Element {
    let name = prop_str(init.props, "iconName")
        .or_else(|| prop_str(init.props, "name"))
        .unwrap_or_default();
    let icon = prop_str(init.props, "icon");
    build(init, ElementKind::SiteIcon { name, icon })
}

fn typography(init: ElementInit<'_>) -> Element {
    let props = init.props;
    let align = match prop_str(props, "align").as_deref() {
        Some("center") => TextAlign::Center,
        Some("right") => TextAlign::Right,
        _ => TextAlign::Left,
    };
    let bold = prop_str(props, "fontWeight").as_deref() == Some("bold");
    let typography = TypographyProps {
        variant: prop_str(props, "variant"),
        align,
        bold,
        margin_bottom: margin_bottom(props),
    };
    build(init, ElementKind::Typography(typography))
}

fn definition_list_props(props: &Props, truncated: bool) -> DefinitionListProps {
    DefinitionListProps {
        title: prop_str(props, "title"),
        entries: prop_pairs(props, "dictionary"),
        tooltips: prop_pairs(props, "tooltips"),
        preface_keys: prop_strings(props, "prefaceKeys"),
        truncated: truncated || prop_bool(props, "truncated"),
    }
}

fn definition_list(init: ElementInit<'_>) -> Element {
    let list = definition_list_props(init.props, false);
    build(init, ElementKind::DefinitionList(list))
}

fn truncated_definition_list(init: ElementInit<'_>) -> Element {
    let list = definition_list_props(init.props, true);
    build(init, ElementKind::DefinitionList(list))
}
