//! Session state and queued persistence work for the list controller.

use tome_core::model::Item;
use uuid::Uuid;

/// Multi-select editing session state.
///
/// `Inactive → Active` when the user selects an item or toggles editing on;
/// back to `Inactive` on an explicit toggle or forced when the authoritative
/// collection becomes empty. Leaving the mode always clears the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Inactive,
    Active,
}

impl EditMode {
    pub fn is_editing(self) -> bool {
        matches!(self, EditMode::Active)
    }
}

/// A unit of deferred persistence work. The in-memory collection has already
/// changed by the time a job is queued; jobs replay that change against the
/// store, best-effort, when the queue is drained.
#[derive(Debug, Clone)]
pub enum StoreJob {
    Insert(Item),
    Delete(Uuid),
    Save(Vec<Item>),
}

impl StoreJob {
    pub fn label(&self) -> &'static str {
        match self {
            StoreJob::Insert(_) => "insert",
            StoreJob::Delete(_) => "delete",
            StoreJob::Save(_) => "save",
        }
    }
}
