use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;

use super::items_model::{Item, NewItem};
use super::items_seed::default_items;
use super::items_traits::{ItemRepositoryTrait, ItemServiceTrait};
use crate::errors::{Error, Result};

/// Service for managing the item catalogue
pub struct ItemService {
    repository: Arc<dyn ItemRepositoryTrait>,
}

impl ItemService {
    pub fn new(repository: Arc<dyn ItemRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl ItemServiceTrait for ItemService {
    fn get_items(&self) -> Result<Vec<Item>> {
        self.repository.list_items()
    }

    fn get_item(&self, item_id: i64) -> Result<Item> {
        self.repository
            .get_item(item_id)?
            .ok_or_else(|| Error::not_found(format!("Item {} not found.", item_id)))
    }

    async fn create_item(&self, new_item: NewItem) -> Result<Item> {
        let new_item = new_item.normalized()?;
        debug!("Creating item '{}' in area '{}'", new_item.name, new_item.area);
        self.repository.insert_item(new_item).await
    }

    async fn update_item(&self, item_id: i64, changes: NewItem) -> Result<Item> {
        let changes = changes.normalized()?;
        self.repository.update_item(item_id, changes).await
    }

    async fn delete_item(&self, item_id: i64) -> Result<()> {
        self.repository.delete_item(item_id).await
    }

    async fn seed_default_items(&self) -> Result<usize> {
        let mut existing: HashSet<String> = self
            .repository
            .list_items()?
            .into_iter()
            .map(|item| item.name.to_lowercase())
            .collect();

        let mut added = 0;
        for item in default_items() {
            if !existing.insert(item.name.to_lowercase()) {
                continue;
            }
            self.repository.insert_item(item).await?;
            added += 1;
        }

        if added > 0 {
            info!("Seeded {} default item(s)", added);
        }
        Ok(added)
    }
}
