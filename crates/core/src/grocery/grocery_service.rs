use log::debug;
use std::sync::Arc;

use super::grocery_model::{GroceryEntry, GroceryEntryUpdate, NewGroceryEntry};
use super::grocery_traits::{GroceryEntryRepositoryTrait, GroceryEntryServiceTrait};
use crate::errors::{Error, Result};
use crate::events::GroceryChangeNotifier;

/// Service for the shared grocery list.
///
/// Every successful write calls exactly one notifier method once the
/// repository has committed. A failed write never notifies.
pub struct GroceryEntryService {
    repository: Arc<dyn GroceryEntryRepositoryTrait>,
    notifier: Arc<dyn GroceryChangeNotifier>,
}

impl GroceryEntryService {
    pub fn new(
        repository: Arc<dyn GroceryEntryRepositoryTrait>,
        notifier: Arc<dyn GroceryChangeNotifier>,
    ) -> Self {
        Self {
            repository,
            notifier,
        }
    }
}

#[async_trait::async_trait]
impl GroceryEntryServiceTrait for GroceryEntryService {
    fn get_entries(&self) -> Result<Vec<GroceryEntry>> {
        self.repository.list_entries()
    }

    fn get_entry(&self, entry_id: i64) -> Result<GroceryEntry> {
        self.repository
            .get_entry(entry_id)?
            .ok_or_else(|| Error::not_found(format!("Entry {} not found.", entry_id)))
    }

    async fn create_entry(&self, new_entry: NewGroceryEntry) -> Result<GroceryEntry> {
        let new_entry = new_entry.normalized()?;
        let entry = self.repository.insert_entry(new_entry).await?;
        debug!("Created grocery entry {}", entry.id);
        self.notifier.notify_created(entry.id);
        Ok(entry)
    }

    async fn update_entry(
        &self,
        entry_id: i64,
        update: GroceryEntryUpdate,
    ) -> Result<GroceryEntry> {
        let update = update.normalized()?;
        let entry = self.repository.update_entry(entry_id, update).await?;
        self.notifier.notify_updated(entry.id);
        Ok(entry)
    }

    async fn delete_entry(&self, entry_id: i64) -> Result<()> {
        self.repository.delete_entry(entry_id).await?;
        self.notifier.notify_deleted(entry_id);
        Ok(())
    }

    async fn clear_entries(&self) -> Result<usize> {
        let removed = self.repository.clear_entries().await?;
        debug!("Cleared {} grocery entries", removed);
        self.notifier.notify_cleared();
        Ok(removed)
    }
}
