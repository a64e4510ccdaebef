use async_trait::async_trait;
use indkob_core::errors::{Error, Result};
use indkob_core::items::{Item, ItemRepositoryTrait, NewItem};

use crate::db::MemoryDb;

pub struct ItemRepository {
    db: MemoryDb,
}

impl ItemRepository {
    pub fn new(db: MemoryDb) -> Self {
        ItemRepository { db }
    }
}

#[async_trait]
impl ItemRepositoryTrait for ItemRepository {
    fn list_items(&self) -> Result<Vec<Item>> {
        let tables = self.db.read()?;
        let mut items: Vec<Item> = tables.items.values().cloned().collect();
        items.sort_by(|a, b| a.area.cmp(&b.area).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    fn get_item(&self, item_id: i64) -> Result<Option<Item>> {
        Ok(self.db.read()?.items.get(&item_id).cloned())
    }

    async fn insert_item(&self, new_item: NewItem) -> Result<Item> {
        let mut tables = self.db.write()?;
        let item = Item {
            id: tables.next_item_id(),
            name: new_item.name,
            area: new_item.area,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(&self, item_id: i64, changes: NewItem) -> Result<Item> {
        let mut tables = self.db.write()?;
        let item = tables
            .items
            .get_mut(&item_id)
            .ok_or_else(|| Error::not_found(format!("Item {} not found.", item_id)))?;
        item.name = changes.name;
        item.area = changes.area;
        Ok(item.clone())
    }

    async fn delete_item(&self, item_id: i64) -> Result<()> {
        let mut tables = self.db.write()?;
        if !tables.items.contains_key(&item_id) {
            return Err(Error::not_found(format!("Item {} not found.", item_id)));
        }
        if tables
            .entries
            .values()
            .any(|entry| entry.item_id == Some(item_id))
        {
            return Err(Error::constraint(
                "Cannot delete an item that is used in the grocery list.",
            ));
        }
        tables.items.remove(&item_id);
        Ok(())
    }
}
