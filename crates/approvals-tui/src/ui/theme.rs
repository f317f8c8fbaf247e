// Centralized theme system for consistent UI styling
// All colors and styles are defined here - edit this file to change the look

use approvals_core::Severity;
use ratatui::style::{Color, Modifier, Style};

// =============================================================================
// COLOR PALETTE
// =============================================================================

/// App background - pure black for contrast
pub const BG_APP: Color = Color::Rgb(0, 0, 0);

/// Card background - very subtle lift from black
pub const BG_CARD: Color = Color::Rgb(18, 18, 18);

/// Primary action background
pub const BG_BUTTON_PRIMARY: Color = Color::Rgb(37, 77, 122);

/// Secondary action background
pub const BG_BUTTON_SECONDARY: Color = Color::Rgb(32, 32, 32);

// -----------------------------------------------------------------------------
// Text Colors
// -----------------------------------------------------------------------------

/// Primary text - off-white for readability
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);

/// Secondary/muted text
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);

/// Dimmed text for hints, placeholders and fading callouts
pub const TEXT_DIM: Color = Color::Rgb(90, 90, 90);

// -----------------------------------------------------------------------------
// Accent Colors - Muted, not harsh
// -----------------------------------------------------------------------------

/// Primary accent - muted blue (links, focus, info callouts)
pub const ACCENT_PRIMARY: Color = Color::Rgb(86, 156, 214);

/// Success/positive - muted green
pub const ACCENT_SUCCESS: Color = Color::Rgb(106, 153, 85);

/// Warning - muted amber/orange
pub const ACCENT_WARNING: Color = Color::Rgb(206, 145, 120);

/// Error/danger - muted red
pub const ACCENT_ERROR: Color = Color::Rgb(244, 112, 112);

// -----------------------------------------------------------------------------
// Border Colors
// -----------------------------------------------------------------------------

pub const BORDER_ACTIVE: Color = Color::Rgb(100, 100, 100);

pub const BORDER_INACTIVE: Color = Color::Rgb(60, 60, 60);

// =============================================================================
// STYLE FUNCTIONS - Semantic styles for common UI patterns
// =============================================================================

pub fn text_primary() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn text_dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn text_bold() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn border_inactive() -> Style {
    Style::default().fg(BORDER_INACTIVE)
}

pub fn link() -> Style {
    Style::default()
        .fg(ACCENT_PRIMARY)
        .add_modifier(Modifier::UNDERLINED)
}

pub fn chip() -> Style {
    Style::default().fg(TEXT_PRIMARY).bg(BG_CARD)
}

// -----------------------------------------------------------------------------
// Severity Styles - callouts and alert banners
// -----------------------------------------------------------------------------

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => ACCENT_PRIMARY,
        Severity::Warning => ACCENT_WARNING,
        Severity::Danger => ACCENT_ERROR,
    }
}

pub fn severity_style(severity: Severity) -> Style {
    Style::default().fg(severity_color(severity))
}

// -----------------------------------------------------------------------------
// Action Bar Styles
// -----------------------------------------------------------------------------

pub fn button_primary() -> Style {
    Style::default()
        .fg(TEXT_PRIMARY)
        .bg(BG_BUTTON_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn button_secondary() -> Style {
    Style::default().fg(TEXT_PRIMARY).bg(BG_BUTTON_SECONDARY)
}

pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

// -----------------------------------------------------------------------------
// Status Styles
// -----------------------------------------------------------------------------

pub fn status_success() -> Style {
    Style::default().fg(ACCENT_SUCCESS)
}

pub fn status_warning() -> Style {
    Style::default().fg(ACCENT_WARNING)
}

pub fn status_error() -> Style {
    Style::default().fg(ACCENT_ERROR)
}

pub fn status_info() -> Style {
    Style::default().fg(ACCENT_PRIMARY)
}
