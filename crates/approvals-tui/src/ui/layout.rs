// Centralized layout constants and utilities for consistent UI across all views

use ratatui::layout::Rect;

// =============================================================================
// PADDING CONSTANTS
// =============================================================================

/// Standard horizontal padding for main content areas (left + right)
pub const CONTENT_PADDING_H: u16 = 2;

/// Maximum width of the confirmation page; wider terminals center it
pub const PAGE_MAX_WIDTH: u16 = 72;

// =============================================================================
// CHROME CONSTANTS - Header/footer heights
// =============================================================================

/// Navigation line + origin line
pub const HEADER_HEIGHT: u16 = 3;

/// Approve / Cancel buttons
pub const ACTION_BAR_HEIGHT: u16 = 1;

/// Status bar height (single line at very bottom of app)
pub const STATUSBAR_HEIGHT: u16 = 1;

/// Callouts never take more than this share of the page
pub const CALLOUT_MAX_HEIGHT_PERCENT: f32 = 0.4;

/// Terminal lines per design-system spacing unit (`margin: [0, 0, 4]` -> 1 line)
pub const SPACING_UNITS_PER_LINE: u64 = 4;

// =============================================================================
// LAYOUT HELPER FUNCTIONS
// =============================================================================

/// Apply horizontal padding to a Rect (reduces width and shifts x)
#[inline]
pub fn with_horizontal_padding(area: Rect, padding: u16) -> Rect {
    Rect {
        x: area.x + padding,
        y: area.y,
        width: area.width.saturating_sub(padding * 2),
        height: area.height,
    }
}

/// Apply content padding to a Rect (uses CONTENT_PADDING_H)
#[inline]
pub fn with_content_padding(area: Rect) -> Rect {
    with_horizontal_padding(area, CONTENT_PADDING_H)
}

/// Center a column of at most `max_width` inside `area`
pub fn centered_column(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}

/// Blank lines for a bottom margin given in spacing units
pub fn margin_lines(units: u64) -> usize {
    units.div_ceil(SPACING_UNITS_PER_LINE) as usize
}
