//! Identity models

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a customer account. Every per-user storage key is
/// namespaced by it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserUuid(Uuid);

impl UserUuid {
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

impl Default for UserUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for UserUuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable account id.
    pub uuid: UserUuid,
    /// First name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Contact email; order snapshots are stamped with it.
    pub email: String,
    /// Delivery address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Whether this identity belongs to the kitchen.
    #[serde(default)]
    pub is_chef: bool,
}

/// Registration payload.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// First name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Contact email, unique across accounts.
    pub email: String,
    /// Plain-text password; only its digest is stored.
    pub password: String,
    /// Delivery address.
    pub address: Option<String>,
}
