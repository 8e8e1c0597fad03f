pub mod connectors;
pub mod entities;
pub mod layout;
