//! Grocery change event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name of the push-channel message that carries a serialized [`ChangeEvent`].
pub const GROCERY_CHANGED: &str = "groceryChanged";

/// Kind of change carried by a [`ChangeEvent`].
///
/// `Resync` is never sent by the server. Clients synthesize it to mark their
/// local list as stale, for example right after (re)connecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    Cleared,
    Resync,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Created => "created",
            ChangeKind::Updated => "updated",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Cleared => "cleared",
            ChangeKind::Resync => "resync",
        }
    }
}

fn default_kind() -> ChangeKind {
    ChangeKind::Updated
}

/// Signal that the grocery list changed.
///
/// Transient: exists only on the wire and in subscriber queues. It never
/// carries entry contents, only which entry was touched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    #[serde(rename = "type", default = "default_kind")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub entry_id: Option<i64>,
    #[serde(default = "Utc::now")]
    pub at_utc: DateTime<Utc>,
}

impl ChangeEvent {
    /// Creates an event stamped with the current UTC time.
    pub fn new(kind: ChangeKind, entry_id: Option<i64>) -> Self {
        Self {
            kind,
            entry_id,
            at_utc: Utc::now(),
        }
    }

    pub fn created(entry_id: i64) -> Self {
        Self::new(ChangeKind::Created, Some(entry_id))
    }

    pub fn updated(entry_id: i64) -> Self {
        Self::new(ChangeKind::Updated, Some(entry_id))
    }

    pub fn deleted(entry_id: i64) -> Self {
        Self::new(ChangeKind::Deleted, Some(entry_id))
    }

    pub fn cleared() -> Self {
        Self::new(ChangeKind::Cleared, None)
    }

    pub fn resync() -> Self {
        Self::new(ChangeKind::Resync, None)
    }
}
