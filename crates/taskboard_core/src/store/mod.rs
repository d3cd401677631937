//! Scoped key/value persistence with JSON values.
//!
//! # Responsibility
//! - Route reads and writes to the durable or the session backend.
//! - Serialize values to JSON text and back.
//! - Degrade every failure to "absent" or "not persisted".
//!
//! # Invariants
//! - `PersistentStore` never returns an error to callers.
//! - Backends store opaque UTF-8 text; JSON handling lives only here.

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::db::DbError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Selects which backend a key lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Survives restarts.
    Durable,
    /// Cleared when the session ends.
    Session,
}

impl StorageScope {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Session => "session",
        }
    }
}

/// Backend-level storage failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    QuotaExceeded { limit_bytes: usize, required_bytes: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "invalid stored json: {err}"),
            Self::QuotaExceeded {
                limit_bytes,
                required_bytes,
            } => write!(
                f,
                "storage quota exceeded: {required_bytes} bytes required, limit is {limit_bytes}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Raw string key/value backend.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove_item(&mut self, key: &str) -> StoreResult<()>;
}

/// JSON facade over a durable and a session backend.
pub struct PersistentStore {
    durable: Box<dyn StorageBackend>,
    session: Box<dyn StorageBackend>,
}

impl PersistentStore {
    pub fn new(durable: Box<dyn StorageBackend>, session: Box<dyn StorageBackend>) -> Self {
        Self { durable, session }
    }

    /// Both scopes held in memory; nothing survives the process.
    pub fn in_memory() -> Self {
        Self::new(
            Box::new(MemoryStorage::default()),
            Box::new(MemoryStorage::default()),
        )
    }

    /// Reads and decodes `key`.
    ///
    /// Returns `None` when the key is absent, the backend read fails, or the
    /// stored text does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, scope: StorageScope) -> Option<T> {
        let raw = match self.backend(scope).get_item(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(
                    "event=store_get module=store status=error scope={} key={} error_code=read_failed error={}",
                    scope.as_str(),
                    key,
                    err
                );
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(
                    "event=store_get module=store status=error scope={} key={} error_code=decode_failed error={}",
                    scope.as_str(),
                    key,
                    err
                );
                None
            }
        }
    }

    /// Encodes and writes `value` under `key`.
    ///
    /// Returns `false` when encoding fails or the backend rejects the write.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T, scope: StorageScope) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|raw| self.backend_mut(scope).set_item(key, &raw));

        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=store_set module=store status=error scope={} key={} error={}",
                    scope.as_str(),
                    key,
                    err
                );
                false
            }
        }
    }

    /// Deletes `key`; missing keys and backend failures are ignored.
    pub fn remove(&mut self, key: &str, scope: StorageScope) {
        if let Err(err) = self.backend_mut(scope).remove_item(key) {
            warn!(
                "event=store_remove module=store status=error scope={} key={} error={}",
                scope.as_str(),
                key,
                err
            );
        }
    }

    fn backend(&self, scope: StorageScope) -> &dyn StorageBackend {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Session => self.session.as_ref(),
        }
    }

    fn backend_mut(&mut self, scope: StorageScope) -> &mut dyn StorageBackend {
        match scope {
            StorageScope::Durable => self.durable.as_mut(),
            StorageScope::Session => self.session.as_mut(),
        }
    }
}
