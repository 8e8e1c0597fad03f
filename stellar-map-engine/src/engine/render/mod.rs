pub mod core_sun;
pub mod governor;
