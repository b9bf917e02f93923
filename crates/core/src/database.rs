use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::model::{Item, SortMethod};

/// Fallible SQLite layer. Error suppression happens one level up, in
/// [`crate::store::ItemStore`]; everything here reports what actually went wrong.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn initialize(config: &AppConfig) -> Result<Self> {
        let conn = Connection::open(config.db_path()).with_context(|| {
            format!("Failed to open database at {}", config.db_path().display())
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to configure SQLite WAL mode")?;

        let db = Self { conn };
        db.apply_migrations()?;
        Ok(db)
    }

    pub fn insert_item(&self, item: &Item) -> Result<()> {
        self.conn.execute(
            "INSERT INTO items (id, title, notes, created_at, completed, order_index)
             VALUES (:id, :title, :notes, :created_at, :completed, :order_index)",
            named_params![
                ":id": item.id.to_string(),
                ":title": &item.title,
                ":notes": &item.notes,
                ":created_at": item.created_at.to_rfc3339(),
                ":completed": item.completed,
                ":order_index": item.order_index,
            ],
        )?;
        Ok(())
    }

    /// Flush the in-place state of an already-inserted item. Returns `false`
    /// when no row matched, which is a no-op rather than an error.
    pub fn update_item(&self, item: &Item) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE items SET
                title = :title,
                notes = :notes,
                completed = :completed,
                order_index = :order_index
             WHERE id = :id",
            named_params![
                ":title": &item.title,
                ":notes": &item.notes,
                ":completed": item.completed,
                ":order_index": item.order_index,
                ":id": item.id.to_string(),
            ],
        )?;
        Ok(affected > 0)
    }

    /// Remove by identity. Deleting an absent item is a no-op, not an error.
    pub fn delete_item(&self, id: &Uuid) -> Result<bool> {
        let affected = self.conn.execute(
            "DELETE FROM items WHERE id = :id",
            named_params![":id": id.to_string()],
        )?;
        Ok(affected > 0)
    }

    pub fn fetch_item(&self, id: &Uuid) -> Result<Option<Item>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, notes, created_at, completed, order_index
             FROM items WHERE id = ? LIMIT 1",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(map_item(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn fetch_items(&self, sorted_by: SortMethod) -> Result<Vec<Item>> {
        let sql = format!(
            "SELECT id, title, notes, created_at, completed, order_index FROM items{}",
            build_order_clause(sorted_by)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(map_item(row)?);
        }
        Ok(items)
    }

    pub fn count_items(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO meta (key, value) VALUES (:key, :value)
             ON CONFLICT(key) DO UPDATE SET value = :value",
            named_params![":key": key, ":value": value],
        )?;
        Ok(())
    }

    fn apply_migrations(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (key TEXT PRIMARY KEY, value TEXT);
             CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                created_at TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                order_index INTEGER
             );
             CREATE INDEX IF NOT EXISTS idx_items_order ON items(order_index);
            ",
        )?;
        Ok(())
    }
}

fn map_item(row: &Row<'_>) -> Result<Item> {
    let id: String = row.get(0)?;
    Ok(Item {
        id: Uuid::parse_str(&id).with_context(|| format!("Invalid item id '{}'", id))?,
        title: row.get(1)?,
        notes: row.get(2)?,
        created_at: parse_datetime_required(row.get::<_, String>(3)?)?,
        completed: row.get(4)?,
        order_index: row.get(5)?,
    })
}

fn parse_datetime_required(raw: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Failed to parse timestamp '{}': {}", raw, e))
}

// RFC 3339 UTC timestamps compare chronologically as text, so created_at can
// be ordered directly in SQL. Missing order indices sort after assigned ones.
fn build_order_clause(sorted_by: SortMethod) -> &'static str {
    match sorted_by {
        SortMethod::StoredOrder => {
            " ORDER BY order_index IS NULL, order_index ASC, created_at ASC, id ASC"
        }
        SortMethod::Title => " ORDER BY title ASC, id ASC",
        SortMethod::Created => " ORDER BY created_at DESC, id ASC",
        SortMethod::Completion => " ORDER BY completed ASC, created_at ASC, id ASC",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_db() -> (Database, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let config = AppConfig::from_data_dir(dir.path().to_path_buf()).expect("config");
        let db = Database::initialize(&config).expect("init db");
        (db, dir)
    }

    #[test]
    fn insert_and_fetch_round_trip() {
        let (db, _dir) = temp_db();
        let mut item = Item::new("Buy milk", "Two liters");
        item.order_index = Some(0);

        db.insert_item(&item).expect("insert");
        let fetched = db.fetch_item(&item.id).expect("fetch").expect("present");
        assert_eq!(fetched.title, "Buy milk");
        assert_eq!(fetched.notes, "Two liters");
        assert_eq!(fetched.order_index, Some(0));
        assert!(!fetched.completed);
    }

    #[test]
    fn update_flushes_in_place_mutations() {
        let (db, _dir) = temp_db();
        let mut item = Item::new("Draft", "");
        db.insert_item(&item).expect("insert");

        item.title = "Final".into();
        item.completed = true;
        item.order_index = Some(3);
        assert!(db.update_item(&item).expect("update"));

        let fetched = db.fetch_item(&item.id).expect("fetch").expect("present");
        assert_eq!(fetched.title, "Final");
        assert!(fetched.completed);
        assert_eq!(fetched.order_index, Some(3));
    }

    #[test]
    fn update_and_delete_of_absent_item_are_no_ops() {
        let (db, _dir) = temp_db();
        let item = Item::new("Ghost", "");
        assert!(!db.update_item(&item).expect("update absent"));
        assert!(!db.delete_item(&item.id).expect("delete absent"));
    }

    #[test]
    fn fetch_items_orders_by_title() {
        let (db, _dir) = temp_db();
        db.insert_item(&Item::new("beta", "")).unwrap();
        db.insert_item(&Item::new("alpha", "")).unwrap();

        let items = db.fetch_items(SortMethod::Title).expect("fetch");
        let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha", "beta"]);
    }

    #[test]
    fn stored_order_puts_unindexed_items_last() {
        let (db, _dir) = temp_db();
        let unindexed = Item::new("never reindexed", "");
        let mut first = Item::new("first", "");
        first.order_index = Some(0);
        db.insert_item(&unindexed).unwrap();
        db.insert_item(&first).unwrap();

        let items = db.fetch_items(SortMethod::StoredOrder).expect("fetch");
        assert_eq!(items[0].id, first.id);
        assert_eq!(items[1].id, unindexed.id);
    }

    #[test]
    fn meta_round_trips_and_overwrites() {
        let (db, _dir) = temp_db();
        assert_eq!(db.get_meta("sortMethod").unwrap(), None);
        db.set_meta("sortMethod", "title").unwrap();
        db.set_meta("sortMethod", "created").unwrap();
        assert_eq!(db.get_meta("sortMethod").unwrap().as_deref(), Some("created"));
    }

    #[test]
    fn count_tracks_inserts_and_deletes() {
        let (db, _dir) = temp_db();
        let item = Item::new("one", "");
        db.insert_item(&item).unwrap();
        assert_eq!(db.count_items().unwrap(), 1);
        db.delete_item(&item.id).unwrap();
        assert_eq!(db.count_items().unwrap(), 0);
    }
}
