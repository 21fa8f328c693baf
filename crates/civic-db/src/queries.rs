use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

impl Database {
    pub fn get_value(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| query_value(conn, key))
    }

    /// Insert or overwrite. Last write wins.
    pub fn put_value(&self, key: &str, value: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
                (key, value),
            )?;
            Ok(())
        })
    }

    pub fn delete_value(&self, key: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
            Ok(())
        })
    }
}

fn query_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM kv_store WHERE key = ?1")?;

    let value = stmt
        .query_row([key], |row| row.get::<_, String>(0))
        .optional()?;

    Ok(value)
}
