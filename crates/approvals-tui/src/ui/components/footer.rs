// Confirmation footer: alert callouts stacked above the action bar

use approvals_core::alerts::Callout;
use approvals_core::models::Severity;
use approvals_core::render::{registry, render_sections};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::elements::{render_lines, DetailLabels};
use crate::ui::theme;

/// A callout ready to draw
pub struct CalloutView {
    pub lines: Vec<Line<'static>>,
    pub severity: Severity,
    pub is_first: bool,
    pub is_last: bool,
    pub removing: bool,
}

impl CalloutView {
    fn borders(&self) -> Borders {
        let mut borders = Borders::LEFT;
        if self.is_first {
            borders |= Borders::TOP;
        }
        if self.is_last {
            borders |= Borders::BOTTOM;
        }
        borders
    }

    fn height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(1).max(1) as usize;
        let body: usize = self
            .lines
            .iter()
            .map(|line| line.width().div_ceil(inner).max(1))
            .sum();
        let chrome = usize::from(self.is_first) + usize::from(self.is_last);
        (body + chrome) as u16
    }
}

pub fn callout_views(callouts: &[Callout<'_>], labels: &DetailLabels) -> Vec<CalloutView> {
    callouts
        .iter()
        .enumerate()
        .map(|(index, callout)| {
            let output = render_sections(registry(), Some(&callout.alert.content));
            let mut lines = render_lines(&output.nodes, false, labels);
            let marker = Span::styled(
                format!("{} ", callout.alert.severity.icon()),
                theme::severity_style(callout.alert.severity),
            );
            let dismiss = Span::styled(format!("  [{}] ✕", index + 1), theme::key_hint());
            match lines.first_mut() {
                Some(first) => {
                    first.spans.insert(0, marker);
                    first.spans.push(dismiss);
                }
                None => lines.push(Line::from(vec![marker, dismiss])),
            }
            if callout.removing {
                lines = lines
                    .into_iter()
                    .map(|line| line.style(theme::text_dim()))
                    .collect();
            }
            CalloutView {
                lines,
                severity: callout.alert.severity,
                is_first: callout.is_first,
                is_last: callout.is_last,
                removing: callout.removing,
            }
        })
        .collect()
}

pub fn callouts_height(views: &[CalloutView], width: u16) -> u16 {
    views.iter().map(|view| view.height(width)).sum()
}

pub fn render_callouts(f: &mut Frame, area: Rect, views: &[CalloutView]) {
    let constraints: Vec<Constraint> = views
        .iter()
        .map(|view| Constraint::Length(view.height(area.width)))
        .collect();
    let slots = Layout::vertical(constraints).split(area);

    for (view, slot) in views.iter().zip(slots.iter()) {
        let border_style = if view.removing {
            theme::text_dim()
        } else {
            theme::severity_style(view.severity)
        };
        let block = Block::default()
            .borders(view.borders())
            .border_style(border_style);
        let paragraph = Paragraph::new(view.lines.clone())
            .block(block)
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, *slot);
    }
}

pub fn render_action_bar(
    f: &mut Frame,
    area: Rect,
    cancel_text: &str,
    approval_text: &str,
) {
    let line = Line::from(vec![
        Span::styled(format!(" Esc  {} ", cancel_text), theme::button_secondary()),
        Span::styled("   ", Style::default()),
        Span::styled(format!(" Enter  {} ", approval_text), theme::button_primary()),
    ])
    .centered();
    f.render_widget(Paragraph::new(line), area);
}
