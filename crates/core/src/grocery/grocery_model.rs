//! Grocery entry domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{ENTRY_AMOUNT_MAX_LEN, ENTRY_NOTE_MAX_LEN};
use crate::errors::{normalize_optional, Result, ValidationError};

/// A line on the shopping list.
///
/// An entry points at a catalogue item, carries a free-text note, or both.
/// Item name and area are denormalized for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroceryEntry {
    pub id: i64,
    pub item_id: Option<i64>,
    pub item_name: Option<String>,
    pub item_area: Option<String>,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

/// Input model for adding an entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewGroceryEntry {
    pub item_id: Option<i64>,
    pub amount: Option<String>,
    pub note: Option<String>,
}

impl NewGroceryEntry {
    /// Trims text fields and checks that the entry refers to something.
    pub fn normalized(&self) -> Result<NewGroceryEntry> {
        let (item_id, amount, note) =
            normalize_entry_fields(self.item_id, self.amount.clone(), self.note.clone())?;
        Ok(NewGroceryEntry {
            item_id,
            amount,
            note,
        })
    }
}

/// Input model for replacing an entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroceryEntryUpdate {
    pub item_id: Option<i64>,
    pub amount: Option<String>,
    pub note: Option<String>,
    #[serde(default)]
    pub is_done: bool,
}

impl GroceryEntryUpdate {
    pub fn normalized(&self) -> Result<GroceryEntryUpdate> {
        let (item_id, amount, note) =
            normalize_entry_fields(self.item_id, self.amount.clone(), self.note.clone())?;
        Ok(GroceryEntryUpdate {
            item_id,
            amount,
            note,
            is_done: self.is_done,
        })
    }
}

fn normalize_entry_fields(
    item_id: Option<i64>,
    amount: Option<String>,
    note: Option<String>,
) -> Result<(Option<i64>, Option<String>, Option<String>)> {
    if let Some(id) = item_id {
        if id < 1 {
            return Err(ValidationError::InvalidInput(format!("Invalid item id {}", id)).into());
        }
    }
    let amount = normalize_optional(amount, "amount", ENTRY_AMOUNT_MAX_LEN)?;
    let note = normalize_optional(note, "note", ENTRY_NOTE_MAX_LEN)?;
    if item_id.is_none() && note.is_none() {
        return Err(ValidationError::InvalidInput(
            "An entry needs an item or a note.".to_string(),
        )
        .into());
    }
    Ok((item_id, amount, note))
}
