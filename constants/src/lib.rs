pub mod difficulty;
pub mod layout;
pub mod palette;
pub mod render_settings;
