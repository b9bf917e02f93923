//! The list state controller: single writer over the authoritative item
//! collection, the selection set, and the composer draft.

use std::collections::{BTreeSet, VecDeque};

use tome_core::model::{sample_items, Item, SortMethod};
use tome_core::{policy, ItemStore, Preferences};
use uuid::Uuid;

mod jobs;
pub mod state;
mod update;


use state::{EditMode, StoreJob};

/// Owns the authoritative in-memory collection and orchestrates every
/// mutation against both the projection and the item store.
///
/// Mutations apply to memory synchronously for immediate UI feedback;
/// persistence is queued as [`StoreJob`]s and reloads are coalesced behind a
/// single-slot flag until the embedding shell calls
/// [`run_pending`](ListController::run_pending). The controller must be
/// driven from one logical execution context; it is not a shared handle.
pub struct ListController {
    pub(crate) store: ItemStore,
    pub(crate) prefs: Preferences,
    pub(crate) items: Vec<Item>,
    pub(crate) selection: BTreeSet<Uuid>,
    pub(crate) draft: Option<Item>,
    pub(crate) search_query: String,
    pub(crate) edit_mode: EditMode,
    pub(crate) jobs: VecDeque<StoreJob>,
    pub(crate) reload_pending: bool,
}

impl ListController {
    /// Store and preference handles are injected explicitly; the controller
    /// holds no ambient global state.
    pub fn new(store: ItemStore, prefs: Preferences) -> Self {
        Self {
            store,
            prefs,
            items: Vec::new(),
            selection: BTreeSet::new(),
            draft: None,
            search_query: String::new(),
            edit_mode: EditMode::Inactive,
            jobs: VecDeque::new(),
            reload_pending: false,
        }
    }

    /// The authoritative collection as last loaded or optimistically mutated.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The filtered, sorted order actually shown. Derived on every call from
    /// the collection, the active preferences, and the search query.
    pub fn visible(&self) -> Vec<Item> {
        policy::visible_projection(
            &self.items,
            self.prefs.sort_method(),
            self.prefs.show_completed(),
            &self.search_query,
        )
    }

    pub fn selection(&self) -> &BTreeSet<Uuid> {
        &self.selection
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn draft(&self) -> Option<&Item> {
        self.draft.as_ref()
    }

    /// Mutable access for the composer UI to bind title/notes fields.
    pub fn draft_mut(&mut self) -> Option<&mut Item> {
        self.draft.as_mut()
    }

    pub fn is_composing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_method(&self) -> SortMethod {
        self.prefs.sort_method()
    }

    pub fn show_completed(&self) -> bool {
        self.prefs.show_completed()
    }

    /// True while a coalesced reload is waiting for the next
    /// [`run_pending`](ListController::run_pending) pass.
    pub fn reload_pending(&self) -> bool {
        self.reload_pending
    }

    pub fn pending_jobs(&self) -> usize {
        self.jobs.len()
    }

    /// Seed the demo data set, but only into an empty store.
    pub fn preload_samples(&mut self) {
        if !self.store.fetch(SortMethod::StoredOrder).is_empty() {
            return;
        }
        tracing::debug!("seeding sample items into empty store");
        for item in sample_items() {
            self.store.insert(&item);
        }
        self.load();
    }
}
