//! ClipNote persistence layer.
//!
//! The persisted store is a flat key-value table of JSON slots plus a
//! change-notification fan-out. All durable state lives here; the
//! coordinator context can be torn down between any two messages without
//! losing anything.

pub mod connection;
pub mod migrations;
pub mod subscription;

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::params;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::errors::StoreError;

pub use connection::Database;
pub use subscription::{ChangeBus, SlotChange, SlotSubscription};

/// The closed set of slots the coordinator persists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// The per-tab draft note, keyed by tab identifier.
    TabNote(String),
    /// The one process-wide authenticated session.
    Session,
    /// The clipper shortcut bindings.
    Shortcuts,
}

impl SlotKey {
    /// The deterministic storage key for this slot.
    pub fn storage_key(&self) -> String {
        match self {
            SlotKey::TabNote(tab_id) => format!("tab_note:{}", tab_id),
            SlotKey::Session => "session".to_string(),
            SlotKey::Shortcuts => "shortcuts".to_string(),
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// The persisted key-value store shared by every context.
///
/// Reads and writes are synchronous SQLite; every write and removal fans a
/// change notification out through the [`ChangeBus`].
#[derive(Clone)]
pub struct SlotStore {
    db: Arc<Database>,
    bus: ChangeBus,
}

impl SlotStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            bus: ChangeBus::new(),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Reads a slot, or `None` when it has never been written or was removed.
    pub fn read<T: DeserializeOwned>(&self, key: &SlotKey) -> Result<Option<T>, StoreError> {
        let conn = self.db.connection();
        let result = conn.query_row(
            "SELECT value FROM slots WHERE key = ?1",
            params![key.storage_key()],
            |row| row.get::<_, String>(0),
        );
        match result {
            Ok(raw) => {
                let value =
                    serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(value))
            }
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Database(e.to_string())),
        }
    }

    /// Replaces a slot wholesale and notifies all subscribers.
    pub fn write<T: Serialize>(&self, key: &SlotKey, value: &T) -> Result<(), StoreError> {
        let json =
            serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let raw = json.to_string();
        {
            let conn = self.db.connection();
            conn.execute(
                "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
                params![key.storage_key(), raw, Self::now()],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?;
        }
        self.bus.publish(SlotChange {
            key: key.storage_key(),
            value: Some(json),
        });
        Ok(())
    }

    /// Deletes a slot. Subscribers are notified only when a row was
    /// actually removed.
    pub fn remove(&self, key: &SlotKey) -> Result<(), StoreError> {
        let removed = {
            let conn = self.db.connection();
            conn.execute(
                "DELETE FROM slots WHERE key = ?1",
                params![key.storage_key()],
            )
            .map_err(|e| StoreError::Database(e.to_string()))?
        };
        if removed > 0 {
            self.bus.publish(SlotChange {
                key: key.storage_key(),
                value: None,
            });
        }
        Ok(())
    }

    /// Subscribes to one slot's changes, typed to that slot's value.
    pub fn subscribe<T: DeserializeOwned>(&self, key: &SlotKey) -> SlotSubscription<T> {
        self.bus.subscribe(key.storage_key())
    }
}
