use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::{theme, App};

/// Default route shown once nothing is waiting for confirmation
pub fn render_home(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .split(area);

    let lines = vec![
        Line::from(Span::styled(
            app.translate("noPendingConfirmations", &[]),
            theme::text_muted(),
        ))
        .centered(),
        Line::default(),
        Line::from(Span::styled("q quit", theme::key_hint())).centered(),
    ];
    f.render_widget(Paragraph::new(lines), rows[1]);
}
