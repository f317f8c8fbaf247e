pub mod footer;
pub mod header;
pub mod statusbar;

pub use footer::{callout_views, callouts_height, render_action_bar, render_callouts, CalloutView};
pub use header::render_header;
pub use statusbar::{render_statusbar, truncate_with_ellipsis};
