use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::ui::components::{
    callout_views, callouts_height, render_action_bar, render_callouts, render_header,
};
use crate::ui::elements::render_lines;
use crate::ui::{layout, theme, App};

/// Header, template body, alert callouts and the approve/cancel bar
pub fn render_confirmation(f: &mut Frame, app: &mut App, area: Rect) {
    let column = layout::with_content_padding(layout::centered_column(area, layout::PAGE_MAX_WIDTH));
    let labels = app.detail_labels();

    let views = callout_views(&app.callouts(), &labels);
    let callout_cap = (column.height as f32 * layout::CALLOUT_MAX_HEIGHT_PERCENT) as u16;
    let callout_height = callouts_height(&views, column.width).min(callout_cap);

    let chunks = Layout::vertical([
        Constraint::Length(layout::HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(callout_height),
        Constraint::Length(layout::ACTION_BAR_HEIGHT),
    ])
    .split(column);

    render_header(f, app, chunks[0]);

    let loading = app.machine().is_loading();
    let spinner = app.spinner();
    let show_details = app.show_details;
    let scroll = app.scroll;

    let Some(page) = app.page_content() else {
        // Queue drained in a window that never redirects; the host closes it
        let waiting = Paragraph::new(Line::from(Span::styled(
            app.translate("noPendingConfirmations", &[]),
            theme::text_muted(),
        )))
        .centered();
        f.render_widget(waiting, chunks[1]);
        return;
    };

    let mut lines = render_lines(&page.content.nodes, show_details, &labels);
    if loading {
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", spinner), theme::status_info()),
            Span::styled(app.translate("checkingNetworkDetails", &[]), theme::text_dim()),
        ]));
    }
    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(body, chunks[1]);

    render_callouts(f, chunks[2], &views);
    render_action_bar(f, chunks[3], &page.cancel_text, &page.approval_text);
}
