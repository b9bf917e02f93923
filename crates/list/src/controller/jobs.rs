//! Drains queued persistence work against the item store.

use super::state::StoreJob;
use super::ListController;

impl ListController {
    /// Run every queued store job in order, then perform the coalesced
    /// reload if one was requested.
    ///
    /// Any number of mutations between drains collapse into a single refetch,
    /// so a later mutation can never be overwritten by a stale earlier
    /// reload. Jobs are fire-and-forget: the adapter suppresses failures, no
    /// job is retried, and the in-memory state stays the truth until the next
    /// successful reload.
    pub fn run_pending(&mut self) {
        let drained = self.jobs.len();
        while let Some(job) = self.jobs.pop_front() {
            match job {
                StoreJob::Insert(item) => self.store.insert(&item),
                StoreJob::Delete(id) => self.store.delete(&id),
                StoreJob::Save(items) => self.store.save(&items),
            }
        }
        if drained > 0 {
            tracing::debug!(jobs = drained, "drained store job queue");
        }
        if self.reload_pending {
            self.reload_pending = false;
            self.load();
        }
    }
}
