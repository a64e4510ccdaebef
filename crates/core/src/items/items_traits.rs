use crate::errors::Result;
use crate::items::items_model::{Item, NewItem};
use async_trait::async_trait;

/// Trait for item repository operations
#[async_trait]
pub trait ItemRepositoryTrait: Send + Sync {
    /// Lists items ordered by area, then name.
    fn list_items(&self) -> Result<Vec<Item>>;
    fn get_item(&self, item_id: i64) -> Result<Option<Item>>;
    async fn insert_item(&self, new_item: NewItem) -> Result<Item>;
    async fn update_item(&self, item_id: i64, changes: NewItem) -> Result<Item>;
    /// Fails with `ConstraintViolation` while any grocery entry references the item.
    async fn delete_item(&self, item_id: i64) -> Result<()>;
}

/// Trait for item service operations
#[async_trait]
pub trait ItemServiceTrait: Send + Sync {
    fn get_items(&self) -> Result<Vec<Item>>;
    fn get_item(&self, item_id: i64) -> Result<Item>;
    async fn create_item(&self, new_item: NewItem) -> Result<Item>;
    async fn update_item(&self, item_id: i64, changes: NewItem) -> Result<Item>;
    async fn delete_item(&self, item_id: i64) -> Result<()>;
    /// Inserts the default catalogue, skipping names that already exist.
    async fn seed_default_items(&self) -> Result<usize>;
}
