//! Mutating operations translating user gestures into collection, selection,
//! and store changes.

use std::collections::BTreeSet;

use tome_core::model::{Item, SortMethod};
use uuid::Uuid;

use super::state::{EditMode, StoreJob};
use super::ListController;

impl ListController {
    /// Replace the authoritative collection from the store using the active
    /// sort method. Idempotent and safe to call repeatedly; every mutation
    /// schedules one (a full refetch is the accepted tradeoff at this scale).
    pub fn load(&mut self) {
        let method = self.prefs.sort_method();
        self.items = self.store.fetch(method);
        tracing::debug!(count = self.items.len(), sort = %method, "loaded items");
        self.sync_after_mutation();
    }

    // Draft composition

    /// Create an empty unpersisted item and enter the composing sub-state.
    pub fn begin_draft(&mut self) {
        self.draft = Some(Item::new(String::new(), String::new()));
    }

    /// Persist the draft, if any, and leave the composing sub-state. No-op
    /// without a draft.
    pub fn commit_draft(&mut self) {
        if let Some(draft) = self.draft.take() {
            self.insert(draft);
        }
    }

    pub fn discard_draft(&mut self) {
        self.draft = None;
    }

    // Store-facing mutations

    pub fn insert(&mut self, item: Item) {
        self.items.push(item.clone());
        self.reindex();
        self.jobs.push_back(StoreJob::Insert(item));
        self.jobs.push_back(StoreJob::Save(self.items.clone()));
        self.request_reload();
        self.sync_after_mutation();
    }

    pub fn delete(&mut self, id: Uuid) {
        self.delete_many(&[id]);
    }

    /// Optimistically drop the items from the collection and the selection,
    /// then queue the store deletes and a reload.
    pub fn delete_many(&mut self, ids: &[Uuid]) {
        if ids.is_empty() {
            return;
        }
        self.items.retain(|item| !ids.contains(&item.id));
        for id in ids {
            self.selection.remove(id);
            self.jobs.push_back(StoreJob::Delete(*id));
        }
        self.request_reload();
        self.sync_after_mutation();
    }

    pub fn delete_selected(&mut self) {
        let ids: Vec<Uuid> = self.selection.iter().copied().collect();
        self.delete_many(&ids);
    }

    /// Move the items at `from` (positions in the visible projection) so they
    /// sit before the item currently at `to`, reindex, persist, and force the
    /// sort method to stored order: once the user drags an item, an active
    /// title/created sort must not silently re-sort it away.
    pub fn reorder(&mut self, from: &[usize], to: usize) {
        let mut visible = self.visible();
        if from.is_empty()
            || to > visible.len()
            || from.iter().any(|&index| index >= visible.len())
        {
            return;
        }

        let mut sources: Vec<usize> = from.to_vec();
        sources.sort_unstable();
        sources.dedup();

        let mut moved = Vec::with_capacity(sources.len());
        for &index in sources.iter().rev() {
            moved.push(visible.remove(index));
        }
        moved.reverse();

        // Destination counts positions in the pre-removal projection.
        let shift = sources.iter().filter(|&&index| index < to).count();
        let insert_at = to - shift;
        for (offset, item) in moved.into_iter().enumerate() {
            visible.insert(insert_at + offset, item);
        }

        // New visible order first, hidden items after in their previous
        // relative order, so the reindex pass stays contiguous over the
        // whole collection.
        let visible_ids: Vec<Uuid> = visible.iter().map(|item| item.id).collect();
        let mut reordered: Vec<Item> = Vec::with_capacity(self.items.len());
        for id in &visible_ids {
            if let Some(item) = self.items.iter().find(|item| item.id == *id) {
                reordered.push(item.clone());
            }
        }
        for item in &self.items {
            if !visible_ids.contains(&item.id) {
                reordered.push(item.clone());
            }
        }
        self.items = reordered;
        self.reindex();

        tracing::debug!(moved = sources.len(), to, "reordered items manually");
        self.prefs.set_sort_method(SortMethod::StoredOrder);
        self.jobs.push_back(StoreJob::Save(self.items.clone()));
        self.request_reload();
    }

    pub fn toggle_completed(&mut self, id: Uuid) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.completed = !item.completed;
            let snapshot = item.clone();
            self.jobs.push_back(StoreJob::Save(vec![snapshot]));
            self.request_reload();
            self.sync_after_mutation();
        }
    }

    // Display preferences and search

    /// Narrow the visible projection by title. Leaves the authoritative
    /// collection and persisted order untouched.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
        self.sync_after_mutation();
    }

    pub fn set_sort_method(&mut self, method: SortMethod) {
        self.prefs.set_sort_method(method);
        self.request_reload();
    }

    pub fn set_show_completed(&mut self, value: bool) {
        self.prefs.set_show_completed(value);
        self.sync_after_mutation();
    }

    // Selection

    pub fn select(&mut self, id: Uuid) {
        if self.visible().iter().any(|item| item.id == id) {
            self.selection.insert(id);
            self.edit_mode = EditMode::Active;
        }
    }

    pub fn deselect(&mut self, id: Uuid) {
        self.selection.remove(&id);
    }

    /// Select every id currently in the visible projection, not the full
    /// authoritative collection.
    pub fn select_all(&mut self) {
        let visible: BTreeSet<Uuid> = self.visible().iter().map(|item| item.id).collect();
        if !visible.is_empty() {
            self.edit_mode = EditMode::Active;
        }
        self.selection = visible;
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn toggle_select_all(&mut self) {
        if self.is_select_all_active() {
            self.clear_selection();
        } else {
            self.select_all();
        }
    }

    pub fn is_select_all_active(&self) -> bool {
        let visible = self.visible();
        !visible.is_empty() && visible.iter().all(|item| self.selection.contains(&item.id))
    }

    pub fn toggle_edit_mode(&mut self) {
        match self.edit_mode {
            EditMode::Active => self.exit_edit_mode(),
            EditMode::Inactive => self.edit_mode = EditMode::Active,
        }
    }

    pub(crate) fn exit_edit_mode(&mut self) {
        self.edit_mode = EditMode::Inactive;
        self.selection.clear();
    }

    // Internal consistency

    /// Reassign contiguous `0..N-1` order indices over the authoritative
    /// collection in its current order.
    pub(crate) fn reindex(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.order_index = Some(index as i64);
        }
    }

    pub(crate) fn request_reload(&mut self) {
        self.reload_pending = true;
    }

    /// Drop selection entries for items no longer present, and force the
    /// editing session closed when nothing is left to edit.
    pub(crate) fn sync_after_mutation(&mut self) {
        let live: BTreeSet<Uuid> = self.items.iter().map(|item| item.id).collect();
        self.selection.retain(|id| live.contains(id));
        if self.items.is_empty() && self.edit_mode.is_editing() {
            self.exit_edit_mode();
        }
        if self.selection.is_empty() {
            return;
        }
        if self.visible().is_empty() {
            self.selection.clear();
        }
    }
}
