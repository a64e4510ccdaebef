//! Item domain models.

use serde::{Deserialize, Serialize};

use crate::constants::{ITEM_AREA_MAX_LEN, ITEM_NAME_MAX_LEN};
use crate::errors::{normalize_required, Result};

/// A catalogue item, grouped by the shop area it is found in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub area: String,
}

/// Input model for creating or renaming an item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub area: String,
}

impl NewItem {
    pub fn new(name: impl Into<String>, area: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            area: area.into(),
        }
    }

    /// Returns a trimmed copy, rejecting blank or oversized fields.
    pub fn normalized(&self) -> Result<NewItem> {
        Ok(NewItem {
            name: normalize_required(&self.name, "name", ITEM_NAME_MAX_LEN)?,
            area: normalize_required(&self.area, "area", ITEM_AREA_MAX_LEN)?,
        })
    }
}
