use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::Database;
use crate::model::{Item, SortMethod};

/// Classifies suppressed persistence failures for the log records.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open item store")]
    Open(#[source] anyhow::Error),
    #[error("failed to insert item {id}")]
    Insert {
        id: Uuid,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to delete item {id}")]
    Delete {
        id: Uuid,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to save item {id}")]
    Save {
        id: Uuid,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to fetch items")]
    Fetch(#[source] anyhow::Error),
}

/// Best-effort adapter over the persistent object store.
///
/// This is the single error-suppression boundary: writes that fail are logged
/// and swallowed, a failed fetch yields an empty collection. Callers must not
/// assume a write succeeded; the in-memory state stays the truth until the
/// next successful reload. Every mutating call is its own flush unit.
#[derive(Debug, Clone)]
pub struct ItemStore {
    config: AppConfig,
}

impl ItemStore {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        Database::initialize(&config)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn insert(&self, item: &Item) {
        let result = self
            .open()
            .and_then(|db| {
                db.insert_item(item).map_err(|source| StoreError::Insert {
                    id: item.id,
                    source,
                })
            });
        if let Err(err) = result {
            suppress(&err);
        }
    }

    pub fn delete(&self, id: &Uuid) {
        let result = self.open().and_then(|db| {
            db.delete_item(id)
                .map(|_| ())
                .map_err(|source| StoreError::Delete { id: *id, source })
        });
        if let Err(err) = result {
            suppress(&err);
        }
    }

    /// Flush pending in-place mutations of already-inserted items.
    pub fn save(&self, items: &[Item]) {
        let db = match self.open() {
            Ok(db) => db,
            Err(err) => {
                suppress(&err);
                return;
            }
        };
        for item in items {
            if let Err(source) = db.update_item(item) {
                suppress(&StoreError::Save {
                    id: item.id,
                    source,
                });
            }
        }
    }

    /// All persisted items in the given order. Empty on failure, never an error.
    pub fn fetch(&self, sorted_by: SortMethod) -> Vec<Item> {
        let result = self
            .open()
            .and_then(|db| db.fetch_items(sorted_by).map_err(StoreError::Fetch));
        match result {
            Ok(items) => items,
            Err(err) => {
                suppress(&err);
                Vec::new()
            }
        }
    }

    pub fn count(&self) -> usize {
        let result = self
            .open()
            .and_then(|db| db.count_items().map_err(StoreError::Fetch));
        match result {
            Ok(count) => count,
            Err(err) => {
                suppress(&err);
                0
            }
        }
    }

    fn open(&self) -> Result<Database, StoreError> {
        Database::initialize(&self.config).map_err(StoreError::Open)
    }
}

fn suppress(err: &StoreError) {
    tracing::warn!(error = %err, "item store operation failed; continuing with in-memory state");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_store() -> (ItemStore, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        let store = ItemStore::new(config).expect("store");
        (store, dir)
    }

    #[test]
    fn insert_then_fetch_sees_the_item() {
        let (store, _dir) = temp_store();
        let item = Item::new("Walk the dog", "");
        store.insert(&item);

        let items = store.fetch(SortMethod::Created);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, item.id);
    }

    #[test]
    fn save_flushes_mutations() {
        let (store, _dir) = temp_store();
        let mut item = Item::new("Read", "");
        store.insert(&item);

        item.completed = true;
        item.order_index = Some(0);
        store.save(&[item.clone()]);

        let items = store.fetch(SortMethod::StoredOrder);
        assert!(items[0].completed);
        assert_eq!(items[0].order_index, Some(0));
    }

    #[test]
    fn delete_of_absent_item_is_silent() {
        let (store, _dir) = temp_store();
        store.delete(&Uuid::new_v4());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn failures_degrade_to_empty_results() {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        let store = ItemStore::new(config).expect("store");

        // Removing the backing directory makes every subsequent open fail.
        drop(dir);

        store.insert(&Item::new("Lost", ""));
        assert!(store.fetch(SortMethod::Title).is_empty());
        assert_eq!(store.count(), 0);
    }
}
