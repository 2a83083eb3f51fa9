//! Board models

use std::fmt::{Display, Formatter, Result as FmtResult};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tonda::cart::LineItem;
use uuid::Uuid;

/// Stable identifier of a confirmed order on the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrderUuid(Uuid);

impl OrderUuid {
    /// Generate a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for OrderUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for OrderUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// A confirmed order as the kitchen sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardOrder {
    /// Board record id.
    pub uuid: OrderUuid,
    /// Email the snapshot was stamped with; `"Ospite"` for guests.
    pub user_email: String,
    /// The order snapshot, immutable apart from item statuses.
    pub items: Vec<LineItem>,
    /// Confirmation time.
    pub placed_at: Timestamp,
    /// Bumped on every status edit; stale edits are rejected.
    pub version: u64,
}

/// A confirmed order about to be placed on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBoardOrder {
    /// Board record id, chosen by the confirming session.
    pub uuid: OrderUuid,
    /// Email the snapshot was stamped with.
    pub user_email: String,
    /// The order snapshot.
    pub items: Vec<LineItem>,
    /// Confirmation time.
    pub placed_at: Timestamp,
}
