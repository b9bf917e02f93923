use anyhow::Result;

use crate::config::AppConfig;
use crate::database::Database;
use crate::model::SortMethod;

pub const SHOW_COMPLETED_KEY: &str = "showCompletedTodos";
pub const SORT_METHOD_KEY: &str = "sortMethod";

const DEFAULT_SHOW_COMPLETED: bool = true;
const DEFAULT_SORT_METHOD: SortMethod = SortMethod::Title;

/// Durable per-user display preferences, backed by the `meta` key-value table.
///
/// Handles are cheap to clone and injected explicitly; there is no process-wide
/// singleton. Values are re-read on demand, and reads fall back to the default
/// when storage fails or holds an unparseable value.
#[derive(Debug, Clone)]
pub struct Preferences {
    config: AppConfig,
}

impl Preferences {
    pub fn new(config: AppConfig) -> Result<Self> {
        Database::initialize(&config)?;
        Ok(Self { config })
    }

    pub fn show_completed(&self) -> bool {
        self.read(SHOW_COMPLETED_KEY)
            .and_then(|raw| raw.parse::<bool>().ok())
            .unwrap_or(DEFAULT_SHOW_COMPLETED)
    }

    pub fn set_show_completed(&self, value: bool) {
        self.write(SHOW_COMPLETED_KEY, if value { "true" } else { "false" });
    }

    pub fn sort_method(&self) -> SortMethod {
        self.read(SORT_METHOD_KEY)
            .and_then(|raw| raw.parse::<SortMethod>().ok())
            .unwrap_or(DEFAULT_SORT_METHOD)
    }

    pub fn set_sort_method(&self, method: SortMethod) {
        self.write(SORT_METHOD_KEY, method.as_str());
    }

    fn read(&self, key: &str) -> Option<String> {
        match Database::initialize(&self.config).and_then(|db| db.get_meta(key)) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "preference read failed; using default");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(err) = Database::initialize(&self.config).and_then(|db| db.set_meta(key, value))
        {
            tracing::warn!(key, error = %err, "preference write failed; value not persisted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_prefs() -> (Preferences, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        let prefs = Preferences::new(config).expect("prefs");
        (prefs, dir)
    }

    #[test]
    fn defaults_apply_before_any_write() {
        let (prefs, _dir) = temp_prefs();
        assert!(prefs.show_completed());
        assert_eq!(prefs.sort_method(), SortMethod::Title);
    }

    #[test]
    fn values_round_trip_through_storage() {
        let (prefs, dir) = temp_prefs();
        prefs.set_show_completed(false);
        prefs.set_sort_method(SortMethod::StoredOrder);

        // A fresh handle over the same data directory sees the stored values.
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).unwrap();
        let reopened = Preferences::new(config).unwrap();
        assert!(!reopened.show_completed());
        assert_eq!(reopened.sort_method(), SortMethod::StoredOrder);
    }

    #[test]
    fn unparseable_stored_value_falls_back_to_default() {
        let (prefs, dir) = temp_prefs();
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).unwrap();
        let db = Database::initialize(&config).unwrap();
        db.set_meta(SORT_METHOD_KEY, "dueDate").unwrap();
        db.set_meta(SHOW_COMPLETED_KEY, "maybe").unwrap();

        assert_eq!(prefs.sort_method(), SortMethod::Title);
        assert!(prefs.show_completed());
    }
}
