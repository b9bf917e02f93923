pub mod config;
pub mod database;
pub mod model;
pub mod policy;
pub mod prefs;
pub mod store;

pub use config::AppConfig;
pub use database::Database;
pub use model::{Item, SortMethod};
pub use prefs::Preferences;
pub use store::ItemStore;
