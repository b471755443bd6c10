pub mod settings;
pub mod version;
