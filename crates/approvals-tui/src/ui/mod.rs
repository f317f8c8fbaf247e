pub mod animation_clock;
pub mod app;
pub mod components;
pub mod elements;
pub mod layout;
pub mod notifications;
pub mod terminal;
pub mod theme;
pub mod views;

pub use app::{App, PageContent, View};
pub use terminal::{init as init_terminal, restore as restore_terminal, Tui};
