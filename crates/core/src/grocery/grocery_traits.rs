use crate::errors::Result;
use crate::grocery::grocery_model::{GroceryEntry, GroceryEntryUpdate, NewGroceryEntry};
use async_trait::async_trait;

/// Trait for grocery entry repository operations
#[async_trait]
pub trait GroceryEntryRepositoryTrait: Send + Sync {
    /// Lists entries: open before done, then by item area and item name.
    fn list_entries(&self) -> Result<Vec<GroceryEntry>>;
    fn get_entry(&self, entry_id: i64) -> Result<Option<GroceryEntry>>;
    /// Fails with `NotFound` if the referenced item does not exist.
    async fn insert_entry(&self, new_entry: NewGroceryEntry) -> Result<GroceryEntry>;
    async fn update_entry(&self, entry_id: i64, update: GroceryEntryUpdate)
        -> Result<GroceryEntry>;
    async fn delete_entry(&self, entry_id: i64) -> Result<()>;
    /// Removes every entry, returning how many were removed.
    async fn clear_entries(&self) -> Result<usize>;
}

/// Trait for grocery entry service operations
#[async_trait]
pub trait GroceryEntryServiceTrait: Send + Sync {
    fn get_entries(&self) -> Result<Vec<GroceryEntry>>;
    fn get_entry(&self, entry_id: i64) -> Result<GroceryEntry>;
    async fn create_entry(&self, new_entry: NewGroceryEntry) -> Result<GroceryEntry>;
    async fn update_entry(&self, entry_id: i64, update: GroceryEntryUpdate)
        -> Result<GroceryEntry>;
    async fn delete_entry(&self, entry_id: i64) -> Result<()>;
    async fn clear_entries(&self) -> Result<usize>;
}
