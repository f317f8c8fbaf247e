// Status bar at the very bottom of the app
// Notification on the left, key hints on the right

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::ui::notifications::{Notification, NotificationLevel};
use crate::ui::theme;

/// Render the status bar: the current notification (icon plus message,
/// coloured by level) fills the left, the view's key hints are right-aligned
/// and never take more than half the width.
pub fn render_statusbar(
    f: &mut Frame,
    area: Rect,
    current_notification: Option<&Notification>,
    hints: &str,
) {
    let hints_width = (hints.width() + 1).min(area.width as usize / 2) as u16;
    let chunks = Layout::horizontal([Constraint::Min(0), Constraint::Length(hints_width)]).split(area);
    let notification_area = chunks[0];
    let hints_area = chunks[1];

    let notification_paragraph = if let Some(notification) = current_notification {
        let color = match notification.level {
            NotificationLevel::Info => theme::ACCENT_PRIMARY,
            NotificationLevel::Success => theme::ACCENT_SUCCESS,
            NotificationLevel::Warning => theme::ACCENT_WARNING,
            NotificationLevel::Error => theme::ACCENT_ERROR,
        };
        let icon = notification.level.icon();
        let icon_width = icon.width() + 2;
        let available = (notification_area.width as usize).saturating_sub(icon_width);
        let message = truncate_with_ellipsis(&notification.message, available);

        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {} ", icon), Style::default().fg(color)),
            Span::styled(message, Style::default().fg(color)),
        ]))
    } else {
        Paragraph::new("")
    };
    f.render_widget(notification_paragraph, notification_area);

    let hints = truncate_with_ellipsis(hints, hints_area.width as usize);
    let padding = (hints_area.width as usize).saturating_sub(hints.width());
    f.render_widget(
        Paragraph::new(format!("{}{}", " ".repeat(padding), hints)).style(theme::key_hint()),
        hints_area,
    );
}

/// Truncate to `max_width` columns, adding an ellipsis when there is room.
/// Grapheme-aware so emoji and combining characters are never split.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let (target_width, ellipsis) = if max_width <= 3 {
        (max_width, "")
    } else {
        (max_width - 3, "...")
    };

    let mut current_width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let grapheme_width = grapheme.width();
        if current_width + grapheme_width > target_width {
            break;
        }
        result.push_str(grapheme);
        current_width += grapheme_width;
    }
    result.push_str(ellipsis);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_fits() {
        assert_eq!(truncate_with_ellipsis("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_small_width() {
        assert_eq!(truncate_with_ellipsis("hello", 2), "he");
        assert_eq!(truncate_with_ellipsis("hello", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is 2 columns wide
        assert_eq!(truncate_with_ellipsis("日本語テキスト", 7), "日本...");
    }
}
