//! JSON key-value store.
//!
//! Every entity kind lives under its own string key as one JSON document. Reads never
//! fail: a missing, empty, unreadable or malformed value yields the caller's fallback.
//! Writes report failure through [`StoreError`] so callers decide whether to surface it.

use rusqlite::{Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

pub trait KvBackend {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
    fn keys(&self) -> anyhow::Result<Vec<String>>;
    fn clear(&self) -> anyhow::Result<()>;
    /// Swaps the whole content for `entries`. Either every entry lands or nothing changes.
    fn replace_all(&self, entries: &[(String, String)]) -> anyhow::Result<()>;
}

/// Workspace-backed store: one row per key in `kv_store`.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KvBackend for SqliteKv {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv_store WHERE key = ?", [key], |r| {
                r.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO kv_store(key, value, updated_at) VALUES(?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = excluded.updated_at",
            (key, value, &updated_at),
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        Ok(())
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;
        let keys = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn clear(&self) -> anyhow::Result<()> {
        self.conn.execute("DELETE FROM kv_store", [])?;
        Ok(())
    }

    fn replace_all(&self, entries: &[(String, String)]) -> anyhow::Result<()> {
        let updated_at = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM kv_store", [])?;
        {
            let mut stmt =
                tx.prepare("INSERT INTO kv_store(key, value, updated_at) VALUES(?, ?, ?)")?;
            for (key, value) in entries {
                stmt.execute((key, value, &updated_at))?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}


#[cfg(test)]
pub use memory::MemoryKv;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to persist {key}: {message}")]
    Backend { key: String, message: String },
    #[error("stored value for {key} is unreadable, refusing to overwrite it: {message}")]
    Corrupt { key: String, message: String },
}

pub struct KvStore {
    backend: Box<dyn KvBackend>,
}

impl KvStore {
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn sqlite(conn: Connection) -> Self {
        Self::new(SqliteKv::new(conn))
    }

    #[cfg(test)]
    pub fn memory() -> Self {
        Self::new(MemoryKv::new())
    }

    pub fn read<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                warn!(key, error = %format!("{e:#}"), "failed to read key, using fallback");
                return fallback;
            }
        };
        if raw.trim().is_empty() {
            return fallback;
        }
        match serde_json::from_str::<T>(&raw) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "stored value is not valid, using fallback");
                fallback
            }
        }
    }

    pub fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read(key, T::default())
    }

    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|source| {
            error!(key, error = %source, "failed to serialize value");
            StoreError::Serialize {
                key: key.to_string(),
                source,
            }
        })?;
        self.write_raw(key, &raw)
    }

    pub fn write_raw(&self, key: &str, raw: &str) -> Result<(), StoreError> {
        self.backend.set(key, raw).map_err(|e| {
            error!(key, error = %format!("{e:#}"), "failed to write key");
            StoreError::Backend {
                key: key.to_string(),
                message: format!("{e:#}"),
            }
        })?;
        debug!(key, bytes = raw.len(), "wrote key");
        Ok(())
    }

    pub fn read_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key).map_err(|e| StoreError::Backend {
            key: key.to_string(),
            message: format!("{e:#}"),
        })
    }

    /// Fails when `key` holds a value that does not decode as `T`. A missing or empty
    /// value passes. Mutations run this before writing so that a collection which only
    /// read as its fallback never replaces the stored records.
    pub fn check_decodes<T: DeserializeOwned>(&self, key: &str) -> Result<(), StoreError> {
        let Some(raw) = self.read_raw(key)? else {
            return Ok(());
        };
        if raw.trim().is_empty() {
            return Ok(());
        }
        serde_json::from_str::<T>(&raw).map(drop).map_err(|e| {
            error!(key, error = %e, "stored value does not decode, write refused");
            StoreError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }
        })
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key).map_err(|e| StoreError::Backend {
            key: key.to_string(),
            message: format!("{e:#}"),
        })
    }

    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys().map_err(|e| StoreError::Backend {
            key: "*".to_string(),
            message: format!("{e:#}"),
        })
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend.clear().map_err(|e| {
            error!(error = %format!("{e:#}"), "failed to clear store");
            StoreError::Backend {
                key: "*".to_string(),
                message: format!("{e:#}"),
            }
        })
    }

    /// Replaces every key with `entries` in one step; on failure the previous content stays.
    pub fn replace_all(&self, entries: &[(String, String)]) -> Result<(), StoreError> {
        self.backend.replace_all(entries).map_err(|e| {
            error!(error = %format!("{e:#}"), "failed to replace store content");
            StoreError::Backend {
                key: "*".to_string(),
                message: format!("{e:#}"),
            }
        })?;
        debug!(entry_count = entries.len(), "replaced store content");
        Ok(())
    }

    /// Raw `(key, json)` pairs in key order.
    pub fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        let mut out = Vec::new();
        for key in self.keys()? {
            if let Some(raw) = self.read_raw(&key)? {
                out.push((key, raw));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn read_missing_key_returns_fallback() {
        let store = KvStore::memory();
        let v: Vec<String> = store.read("nothing", vec!["x".to_string()]);
        assert_eq!(v, vec!["x".to_string()]);
    }

    #[test]
    fn read_corrupt_or_empty_value_returns_fallback() {
        let store = KvStore::memory();
        store.write_raw("broken", "{not json").expect("raw write");
        store.write_raw("empty", "").expect("raw write");
        let a: Vec<i64> = store.read("broken", vec![7]);
        let b: Vec<i64> = store.read("empty", vec![8]);
        assert_eq!(a, vec![7]);
        assert_eq!(b, vec![8]);
    }

    #[test]
    fn read_wrong_shape_returns_fallback() {
        let store = KvStore::memory();
        store.write("list", &json!({ "not": "a list" })).expect("write");
        let v: Vec<i64> = store.read("list", Vec::new());
        assert!(v.is_empty());
    }

    #[test]
    fn check_decodes_flags_values_that_only_read_as_fallback() {
        let store = KvStore::memory();
        store.check_decodes::<Vec<i64>>("absent").expect("missing key passes");
        store.write("list", &vec![1, 2]).expect("write");
        store.check_decodes::<Vec<i64>>("list").expect("valid list passes");
        store.write_raw("list", "[1, \"two\"]").expect("raw write");
        let err = store
            .check_decodes::<Vec<i64>>("list")
            .expect_err("mixed list must be flagged");
        assert!(matches!(err, StoreError::Corrupt { ref key, .. } if key == "list"));
    }

    #[test]
    fn write_then_read_roundtrips() {
        let store = KvStore::memory();
        store
            .write("roles", &vec!["Owner".to_string(), "Teacher".to_string()])
            .expect("write");
        let v: Vec<String> = store.read_or_default("roles");
        assert_eq!(v, vec!["Owner".to_string(), "Teacher".to_string()]);
    }

    #[test]
    fn quota_exceeded_write_fails_and_keeps_previous_value() {
        let store = KvStore::new(MemoryKv::with_quota(32));
        store.write("k", &vec![1, 2, 3]).expect("small write fits");
        let big: Vec<i64> = (0..100).collect();
        let err = store.write("k", &big).expect_err("quota must reject");
        assert!(matches!(err, StoreError::Backend { .. }));
        assert!(err.to_string().contains("quota exceeded"));
        let v: Vec<i64> = store.read_or_default("k");
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[test]
    fn clear_removes_every_key() {
        let store = KvStore::memory();
        store.write("a", &1).expect("write");
        store.write("b", &2).expect("write");
        assert_eq!(store.keys().expect("keys"), vec!["a".to_string(), "b".to_string()]);
        store.clear().expect("clear");
        assert!(store.keys().expect("keys").is_empty());
    }

    #[test]
    fn sqlite_backend_upserts_by_key() {
        let conn = Connection::open_in_memory().expect("open memory db");
        conn.execute(
            "CREATE TABLE kv_store(key TEXT PRIMARY KEY, value TEXT NOT NULL, updated_at TEXT NOT NULL)",
            [],
        )
        .expect("create table");
        let store = KvStore::sqlite(conn);
        store.write("n", &1).expect("write");
        store.write("n", &2).expect("overwrite");
        let n: i64 = store.read("n", 0);
        assert_eq!(n, 2);
        assert_eq!(store.entries().expect("entries"), vec![("n".to_string(), "2".to_string())]);
        store.remove("n").expect("remove");
        let n: i64 = store.read("n", 0);
        assert_eq!(n, 0);
    }
}
