//! Record store module
//!
//! The id→value mapping behind every data endpoint. Records live in memory
//! in insertion order; in persistent mode the full mapping is rewritten to a
//! JSON file on every successful insert.

mod error;
mod persist;

pub use error::StoreError;

use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use crate::config::{StoreConfig, StoreMode};
use crate::logger;

/// A single id→value record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: i64,
    pub data: String,
}

/// Fixed starter records for mock mode
const SEED: [(i64, &str); 5] = [
    (1, "Alice"),
    (2, "Bob"),
    (3, "Charlie"),
    (4, "Diana"),
    (5, "Eve"),
];

#[derive(Debug)]
struct StoreInner {
    /// Records in insertion order (loaded records first, ordered by id)
    records: Vec<Record>,
    /// id → position in `records`
    index: HashMap<i64, usize>,
}

impl StoreInner {
    fn from_records(records: Vec<Record>) -> Self {
        let index = records
            .iter()
            .enumerate()
            .map(|(pos, r)| (r.id, pos))
            .collect();
        Self { records, index }
    }
}

/// The shared record store.
///
/// Reads take the read lock and may run concurrently; `insert` holds the
/// write lock across the whole check → append → flush sequence, so two
/// concurrent inserts of the same id cannot both succeed and readers never
/// observe a half-applied insert.
#[derive(Debug)]
pub struct Store {
    inner: RwLock<StoreInner>,
    /// Flush target; `None` in mock mode (inserts stay memory-only)
    persist_path: Option<PathBuf>,
}

impl Store {
    /// Open the store according to configuration.
    ///
    /// Persistent mode loads the JSON file at `store.path` and refuses to
    /// start when it is missing or corrupt. Mock mode ignores the file and
    /// starts from the fixed seed set.
    pub fn open(cfg: &StoreConfig) -> Result<Self, StoreError> {
        match cfg.mode {
            StoreMode::Persistent => {
                let path = PathBuf::from(&cfg.path);
                let records = persist::load_file(&path)?;
                logger::log_store_loaded(&path, records.len());
                Ok(Self {
                    inner: RwLock::new(StoreInner::from_records(records)),
                    persist_path: Some(path),
                })
            }
            StoreMode::Mock => {
                logger::log_store_mock(SEED.len());
                Ok(Self::seeded())
            }
        }
    }

    /// Build an in-memory store from the seed set, with no persistence.
    pub fn seeded() -> Self {
        let records = SEED
            .iter()
            .map(|&(id, data)| Record {
                id,
                data: data.to_string(),
            })
            .collect();
        Self {
            inner: RwLock::new(StoreInner::from_records(records)),
            persist_path: None,
        }
    }

    /// Look up the value for an id. Pure read.
    pub async fn get(&self, id: i64) -> Option<String> {
        let inner = self.inner.read().await;
        inner
            .index
            .get(&id)
            .map(|&pos| inner.records[pos].data.clone())
    }

    /// All records in insertion order.
    pub async fn all(&self) -> Vec<Record> {
        self.inner.read().await.records.clone()
    }

    /// The current id set, for schema discovery.
    pub async fn ids(&self) -> Vec<i64> {
        self.inner
            .read()
            .await
            .records
            .iter()
            .map(|r| r.id)
            .collect()
    }

    /// Add a new record and flush the full mapping to disk.
    ///
    /// Fails with `AlreadyExists` if the id is taken. A failed flush rolls
    /// back the in-memory append and returns `Persistence`; the caller never
    /// sees a success that did not reach disk.
    pub async fn insert(&self, id: i64, data: String) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;

        if inner.index.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }

        let pos = inner.records.len();
        inner.records.push(Record {
            id,
            data: data.clone(),
        });
        inner.index.insert(id, pos);

        if let Some(path) = &self.persist_path {
            if let Err(e) = persist::write_file(path, &inner.records) {
                inner.records.pop();
                inner.index.remove(&id);
                return Err(e);
            }
        }

        Ok(())
    }
}
