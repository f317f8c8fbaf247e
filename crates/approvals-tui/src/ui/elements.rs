// Terminal presentation of rendered template trees
// Maps each allowlisted element kind to styled ratatui lines

use approvals_core::render::{
    DefinitionListProps, Element, ElementKind, RenderedNode, TextAlign, TypographyProps,
};
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::ui::{layout, theme};

/// Labels for the truncated definition list toggle
#[derive(Debug, Clone)]
pub struct DetailLabels {
    pub view_all: String,
    pub show_less: String,
}

fn is_block(kind: &ElementKind) -> bool {
    matches!(
        kind,
        ElementKind::Container
            | ElementKind::Paragraph
            | ElementKind::Typography(_)
            | ElementKind::Callout { .. }
            | ElementKind::DefinitionList(_)
    )
}

fn alignment(align: TextAlign) -> Alignment {
    match align {
        TextAlign::Left => Alignment::Left,
        TextAlign::Center => Alignment::Center,
        TextAlign::Right => Alignment::Right,
    }
}

fn typography_style(props: &TypographyProps, base: Style) -> Style {
    let heading = matches!(props.variant.as_deref(), Some("h1" | "h2" | "h3" | "h4"));
    if heading || props.bold {
        base.add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

/// Accumulates inline spans into lines; block elements start new lines
pub struct LineWriter<'a> {
    lines: Vec<Line<'static>>,
    pending: Vec<Span<'static>>,
    alignment: Alignment,
    show_details: bool,
    labels: &'a DetailLabels,
}

impl<'a> LineWriter<'a> {
    pub fn new(show_details: bool, labels: &'a DetailLabels) -> Self {
        Self {
            lines: Vec::new(),
            pending: Vec::new(),
            alignment: Alignment::Left,
            show_details,
            labels,
        }
    }

    pub fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        self.lines
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.pending);
        self.lines.push(Line::from(spans).alignment(self.alignment));
    }

    fn blank(&mut self, count: usize) {
        for _ in 0..count {
            self.lines.push(Line::default());
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        let mut segments = text.split('\n').peekable();
        while let Some(segment) = segments.next() {
            if !segment.is_empty() {
                self.pending.push(Span::styled(segment.to_string(), style));
            }
            if segments.peek().is_some() {
                self.flush();
            }
        }
    }

    pub fn write(&mut self, nodes: &[RenderedNode], style: Style) {
        for node in nodes {
            match node {
                RenderedNode::Text(text) => self.push_text(text, style),
                RenderedNode::Element(element) if is_block(&element.kind) => {
                    self.flush();
                    self.write_block(element, style);
                }
                RenderedNode::Element(element) => self.write_inline(element, style),
            }
        }
    }

    fn write_children(&mut self, element: &Element, style: Style) {
        if let Some(children) = &element.children {
            self.write(children, style);
        }
    }

    fn write_inline(&mut self, element: &Element, style: Style) {
        match &element.kind {
            ElementKind::Strong => self.write_children(element, style.add_modifier(Modifier::BOLD)),
            ElementKind::Link { .. } => self.write_children(element, style.patch(theme::link())),
            ElementKind::Chip { label } => {
                if let Some(label) = label {
                    self.pending
                        .push(Span::styled(format!(" {} ", label), theme::chip()));
                }
                self.write_children(element, style);
            }
            ElementKind::SiteIcon { name, icon } => {
                let glyph = icon.clone().unwrap_or_else(|| {
                    name.chars()
                        .next()
                        .map(|c| c.to_uppercase().to_string())
                        .unwrap_or_default()
                });
                if !glyph.is_empty() {
                    self.pending
                        .push(Span::styled(format!("({}) ", glyph), theme::text_muted()));
                }
            }
            ElementKind::Button { primary } => {
                let button = if *primary {
                    theme::button_primary()
                } else {
                    theme::button_secondary()
                };
                self.pending.push(Span::styled("[ ", button));
                self.write_children(element, button);
                self.pending.push(Span::styled(" ]", button));
            }
            _ => self.write_children(element, style),
        }
    }

    fn write_block(&mut self, element: &Element, style: Style) {
        match &element.kind {
            ElementKind::Typography(props) => {
                let previous = self.alignment;
                self.alignment = alignment(props.align);
                self.write_children(element, typography_style(props, style));
                self.flush();
                self.alignment = previous;
                self.blank(layout::margin_lines(props.margin_bottom));
            }
            ElementKind::Callout { severity } => {
                self.pending.push(Span::styled(
                    format!("{} ", severity.icon()),
                    theme::severity_style(*severity),
                ));
                self.write_children(element, style);
                self.flush();
            }
            ElementKind::DefinitionList(list) => self.write_definition_list(list, style),
            _ => {
                self.write_children(element, style);
                self.flush();
            }
        }
    }

    fn write_definition_list(&mut self, list: &DefinitionListProps, style: Style) {
        if let Some(title) = &list.title {
            self.lines
                .push(Line::from(Span::styled(title.clone(), theme::text_bold())));
        }

        let collapsed = list.truncated && !self.show_details;
        let entries: Vec<&(String, String)> = if collapsed {
            list.preface_keys
                .iter()
                .filter_map(|key| list.entries.iter().find(|(term, _)| term == key))
                .collect()
        } else {
            list.entries.iter().collect()
        };

        for (term, value) in entries {
            let mut spans = vec![Span::styled(term.clone(), theme::text_muted())];
            if let Some((_, tip)) = list.tooltips.iter().find(|(t, _)| t == term) {
                spans.push(Span::styled(format!(" ⓘ {}", tip), theme::text_dim()));
            }
            self.lines.push(Line::from(spans));
            self.lines
                .push(Line::from(Span::styled(format!("  {}", value), style)));
        }

        if list.truncated {
            let hint = if collapsed {
                format!("▸ {} (v)", self.labels.view_all)
            } else {
                format!("▾ {} (v)", self.labels.show_less)
            };
            self.lines.push(Line::from(Span::styled(hint, theme::link())));
        }
    }
}

/// Lines for a whole rendered tree
pub fn render_lines(
    nodes: &[RenderedNode],
    show_details: bool,
    labels: &DetailLabels,
) -> Vec<Line<'static>> {
    let mut writer = LineWriter::new(show_details, labels);
    writer.write(nodes, theme::text_primary());
    writer.finish()
}
