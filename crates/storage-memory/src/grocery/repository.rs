use async_trait::async_trait;
use chrono::Utc;
use indkob_core::errors::{Error, Result};
use indkob_core::grocery::{
    GroceryEntry, GroceryEntryRepositoryTrait, GroceryEntryUpdate, NewGroceryEntry,
};

use crate::db::{EntryRow, MemoryDb, Tables};

pub struct GroceryEntryRepository {
    db: MemoryDb,
}

impl GroceryEntryRepository {
    pub fn new(db: MemoryDb) -> Self {
        GroceryEntryRepository { db }
    }

    fn to_entry(tables: &Tables, row: &EntryRow) -> GroceryEntry {
        let item = row.item_id.and_then(|id| tables.items.get(&id));
        GroceryEntry {
            id: row.id,
            item_id: row.item_id,
            item_name: item.map(|i| i.name.clone()),
            item_area: item.map(|i| i.area.clone()),
            amount: row.amount.clone(),
            note: row.note.clone(),
            is_done: row.is_done,
            created_at: row.created_at,
        }
    }

    fn ensure_item_exists(tables: &Tables, item_id: Option<i64>) -> Result<()> {
        match item_id {
            Some(id) if !tables.items.contains_key(&id) => {
                Err(Error::not_found("Item not found."))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl GroceryEntryRepositoryTrait for GroceryEntryRepository {
    fn list_entries(&self) -> Result<Vec<GroceryEntry>> {
        let tables = self.db.read()?;
        let mut entries: Vec<GroceryEntry> = tables
            .entries
            .values()
            .map(|row| Self::to_entry(&tables, row))
            .collect();
        entries.sort_by(|a, b| {
            a.is_done
                .cmp(&b.is_done)
                .then_with(|| a.item_area.cmp(&b.item_area))
                .then_with(|| a.item_name.cmp(&b.item_name))
        });
        Ok(entries)
    }

    fn get_entry(&self, entry_id: i64) -> Result<Option<GroceryEntry>> {
        let tables = self.db.read()?;
        Ok(tables
            .entries
            .get(&entry_id)
            .map(|row| Self::to_entry(&tables, row)))
    }

    async fn insert_entry(&self, new_entry: NewGroceryEntry) -> Result<GroceryEntry> {
        let mut tables = self.db.write()?;
        Self::ensure_item_exists(&tables, new_entry.item_id)?;

        let row = EntryRow {
            id: tables.next_entry_id(),
            item_id: new_entry.item_id,
            amount: new_entry.amount,
            note: new_entry.note,
            is_done: false,
            created_at: Utc::now(),
        };
        let entry = Self::to_entry(&tables, &row);
        tables.entries.insert(row.id, row);
        Ok(entry)
    }

    async fn update_entry(
        &self,
        entry_id: i64,
        update: GroceryEntryUpdate,
    ) -> Result<GroceryEntry> {
        let mut tables = self.db.write()?;
        if !tables.entries.contains_key(&entry_id) {
            return Err(Error::not_found(format!("Entry {} not found.", entry_id)));
        }
        Self::ensure_item_exists(&tables, update.item_id)?;

        let row = tables
            .entries
            .get_mut(&entry_id)
            .ok_or_else(|| Error::not_found(format!("Entry {} not found.", entry_id)))?;
        row.item_id = update.item_id;
        row.amount = update.amount;
        row.note = update.note;
        row.is_done = update.is_done;
        let row = row.clone();

        Ok(Self::to_entry(&tables, &row))
    }

    async fn delete_entry(&self, entry_id: i64) -> Result<()> {
        let mut tables = self.db.write()?;
        tables
            .entries
            .remove(&entry_id)
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("Entry {} not found.", entry_id)))
    }

    async fn clear_entries(&self) -> Result<usize> {
        let mut tables = self.db.write()?;
        let removed = tables.entries.len();
        tables.entries.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::ItemRepository;
    use indkob_core::items::{ItemRepositoryTrait, NewItem};

    async fn add_item(items: &ItemRepository, name: &str, area: &str) -> i64 {
        items.insert_item(NewItem::new(name, area)).await.unwrap().id
    }

    #[tokio::test]
    async fn entries_sort_open_first_then_area_and_name() {
        let db = MemoryDb::new();
        let items = ItemRepository::new(db.clone());
        let repo = GroceryEntryRepository::new(db);

        let smoer = add_item(&items, "Smør", "Mejeri").await;
        let agurk = add_item(&items, "Agurk", "Frugt og grønt").await;
        let aeg = add_item(&items, "Æg", "Mejeri").await;

        let done = repo
            .insert_entry(NewGroceryEntry {
                item_id: Some(agurk),
                ..Default::default()
            })
            .await
            .unwrap();
        repo.update_entry(
            done.id,
            GroceryEntryUpdate {
                item_id: Some(agurk),
                is_done: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        for id in [aeg, smoer] {
            repo.insert_entry(NewGroceryEntry {
                item_id: Some(id),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let names: Vec<Option<String>> = repo
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.item_name)
            .collect();
        assert_eq!(
            names,
            vec![
                Some("Smør".to_string()),
                Some("Æg".to_string()),
                Some("Agurk".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn entry_with_unknown_item_is_rejected() {
        let repo = GroceryEntryRepository::new(MemoryDb::new());
        let result = repo
            .insert_entry(NewGroceryEntry {
                item_id: Some(4),
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(repo.list_entries().unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_reports_removed_count() {
        let repo = GroceryEntryRepository::new(MemoryDb::new());
        for text in ["pant", "batterier"] {
            repo.insert_entry(NewGroceryEntry {
                note: Some(text.into()),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        assert_eq!(repo.clear_entries().await.unwrap(), 2);
        assert_eq!(repo.clear_entries().await.unwrap(), 0);
        assert!(matches!(
            repo.delete_entry(1).await,
            Err(Error::NotFound(_))
        ));
    }
}
