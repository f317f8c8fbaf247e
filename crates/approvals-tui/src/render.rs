use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
    Frame,
};

use crate::ui;
use crate::ui::components::render_statusbar;
use crate::ui::layout;
use crate::ui::{App, View};

const CONFIRMATION_HINTS: &str = "←/→ navigate · v details · 1-9 dismiss · x clear · q quit";
const HOME_HINTS: &str = "x clear · q quit";

pub(crate) fn render(f: &mut Frame, app: &mut App) {
    // Fill entire frame with app background
    let bg_block = Block::default().style(Style::default().bg(ui::theme::BG_APP));
    f.render_widget(bg_block, f.area());

    let chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(layout::STATUSBAR_HEIGHT),
    ])
    .split(f.area());

    let hints = match app.view {
        View::Confirmation => {
            ui::views::render_confirmation(f, app, chunks[0]);
            CONFIRMATION_HINTS
        }
        View::Home => {
            ui::views::render_home(f, app, chunks[0]);
            HOME_HINTS
        }
    };

    // Status bar at the very bottom (always visible)
    render_statusbar(f, chunks[1], app.current_notification(), hints);
}
