//! List state synchronization: keeps the in-memory item collection, its
//! visible projection, and the multi-select editing session consistent with
//! the persistent store.

pub mod controller;

pub use controller::state::{EditMode, StoreJob};
pub use controller::ListController;
