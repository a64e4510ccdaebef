//! Shared in-process tables.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use indkob_core::errors::{Error, Result};
use indkob_core::items::Item;

/// Stored form of a grocery entry. Item name/area are joined on read.
#[derive(Debug, Clone)]
pub(crate) struct EntryRow {
    pub id: i64,
    pub item_id: Option<i64>,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub items: BTreeMap<i64, Item>,
    pub entries: BTreeMap<i64, EntryRow>,
    /// Planned dinner per date; days without a dinner are not stored.
    pub meal_plan: BTreeMap<NaiveDate, String>,
    next_item_id: i64,
    next_entry_id: i64,
}

impl Tables {
    pub fn next_item_id(&mut self) -> i64 {
        self.next_item_id += 1;
        self.next_item_id
    }

    pub fn next_entry_id(&mut self) -> i64 {
        self.next_entry_id += 1;
        self.next_entry_id
    }
}

/// Handle to the shared tables. Cheap to clone; all clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| Error::Repository(format!("Storage lock poisoned: {}", e)))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| Error::Repository(format!("Storage lock poisoned: {}", e)))
    }
}
