pub mod confirmation;
pub mod home;

pub use confirmation::render_confirmation;
pub use home::render_home;
