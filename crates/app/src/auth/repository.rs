//! Account and session records.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    auth::{errors::AuthError, models::User},
    storage::KeyValueStore,
};

const SESSION_USER_KEY: &str = "session_user";
const SESSION_CHEF_KEY: &str = "session_chef";

/// A registered account as persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AccountRecord {
    pub user: User,
    /// SHA-256 digest of the password, hex-encoded.
    pub password_hash: String,
}

/// Key-value backed accounts repository.
#[derive(Clone)]
pub(crate) struct AccountsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl AccountsRepository {
    #[must_use]
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) async fn find_account(
        &self,
        email: &str,
    ) -> Result<Option<AccountRecord>, AuthError> {
        let Some(raw) = self.store.get(&account_key(email)).await? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub(crate) async fn create_account(&self, record: &AccountRecord) -> Result<(), AuthError> {
        let raw = serde_json::to_string(record)?;

        self.store.set(&account_key(&record.user.email), raw).await?;

        Ok(())
    }

    pub(crate) async fn save_user_session(&self, user: &User) -> Result<(), AuthError> {
        let raw = serde_json::to_string(user)?;

        self.store.set(SESSION_USER_KEY, raw).await?;

        Ok(())
    }

    pub(crate) async fn load_user_session(&self) -> Result<Option<User>, AuthError> {
        self.load_session(SESSION_USER_KEY).await
    }

    pub(crate) async fn clear_user_session(&self) -> Result<(), AuthError> {
        self.store.remove(SESSION_USER_KEY).await?;

        Ok(())
    }

    pub(crate) async fn save_chef_session(&self, chef: &User) -> Result<(), AuthError> {
        let raw = serde_json::to_string(chef)?;

        self.store.set(SESSION_CHEF_KEY, raw).await?;

        Ok(())
    }

    pub(crate) async fn load_chef_session(&self) -> Result<Option<User>, AuthError> {
        self.load_session(SESSION_CHEF_KEY).await
    }

    pub(crate) async fn clear_chef_session(&self) -> Result<(), AuthError> {
        self.store.remove(SESSION_CHEF_KEY).await?;

        Ok(())
    }

    async fn load_session(&self, key: &str) -> Result<Option<User>, AuthError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }
}

fn account_key(email: &str) -> String {
    format!("account_{}", email.trim().to_ascii_lowercase())
}
