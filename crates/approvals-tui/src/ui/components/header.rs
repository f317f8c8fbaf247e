use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::components::statusbar::truncate_with_ellipsis;
use crate::ui::{theme, App};

/// Queue position with previous/next affordances, then the requesting site
pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(area);

    let machine = app.machine();
    let arrow = |enabled: bool| {
        if enabled {
            theme::text_primary()
        } else {
            theme::text_dim()
        }
    };

    let mut navigation = Vec::new();
    if machine.len() > 1 {
        let position = (machine.current_index() + 1).to_string();
        let total = machine.len().to_string();
        navigation.push(Span::styled("‹ ", arrow(machine.can_go_previous())));
        navigation.push(Span::styled(
            app.translate("pendingConfirmations", &[&position, &total]),
            theme::text_muted(),
        ));
        navigation.push(Span::styled(" ›", arrow(machine.can_go_next())));
    }
    let environment = machine.environment().label();
    let nav_columns = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(environment.len() as u16),
    ])
    .split(rows[0]);
    f.render_widget(Paragraph::new(Line::from(navigation)), nav_columns[0]);
    f.render_widget(
        Paragraph::new(environment).style(theme::text_dim()),
        nav_columns[1],
    );

    if let Some(origin) = app.origin() {
        let glyph = origin.icon.clone().unwrap_or_else(|| {
            origin
                .name
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default()
        });
        let label = truncate_with_ellipsis(&origin.host, rows[1].width.saturating_sub(6) as usize);
        let chip = Line::from(vec![
            Span::styled(format!(" {} ", glyph), Style::default().fg(theme::ACCENT_PRIMARY)),
            Span::styled(format!(" {} ", label), theme::chip()),
        ])
        .centered();
        f.render_widget(Paragraph::new(chip), rows[1]);
    }
}
