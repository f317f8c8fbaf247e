//! Allowlisted rendering of declarative section trees.
//!
//! - `allowlist`: the closed token → factory registry
//! - `node`: the environment-neutral output tree and typed element props
//! - `renderer`: the recursive walk plus the deep-equality memo

pub mod allowlist;
pub mod node;
pub mod renderer;

pub use allowlist::{registry, AllowlistRegistry, ElementFactory, ElementInit};
pub use node::{
    DefinitionListProps, Element, ElementKind, RenderedNode, TextAlign, TypographyProps,
    MAX_MARGIN_UNITS,
};
pub use renderer::{render_sections, RenderOutput, TemplateRenderer};
