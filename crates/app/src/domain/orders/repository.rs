//! Per-user order records.
//!
//! Typed accessors over the key-value adapter. User isolation goes
//! through these key builders and nowhere else.

use std::sync::Arc;

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use serde::{Serialize, de::DeserializeOwned};
use tonda::cart::LineItem;

use crate::{
    auth::models::UserUuid,
    domain::orders::errors::OrdersRepositoryError,
    storage::KeyValueStore,
};

/// Key-value backed repository for the four per-user records.
#[derive(Clone)]
pub(crate) struct OrdersRepository {
    store: Arc<dyn KeyValueStore>,
}

impl OrdersRepository {
    #[must_use]
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) async fn load_cart(
        &self,
        user: UserUuid,
    ) -> Result<Vec<LineItem>, OrdersRepositoryError> {
        self.get_json(&cart_key(user)).await
    }

    pub(crate) async fn save_cart(
        &self,
        user: UserUuid,
        items: &[LineItem],
    ) -> Result<(), OrdersRepositoryError> {
        self.set_json(&cart_key(user), &items).await
    }

    pub(crate) async fn load_history(
        &self,
        user: UserUuid,
    ) -> Result<Vec<Vec<LineItem>>, OrdersRepositoryError> {
        self.get_json(&history_key(user)).await
    }

    pub(crate) async fn save_history(
        &self,
        user: UserUuid,
        history: &[Vec<LineItem>],
    ) -> Result<(), OrdersRepositoryError> {
        self.set_json(&history_key(user), &history).await
    }

    pub(crate) async fn load_redeemed(
        &self,
        user: UserUuid,
    ) -> Result<FxHashSet<String>, OrdersRepositoryError> {
        let ids: Vec<String> = self.get_json(&redeemed_key(user)).await?;

        Ok(ids.into_iter().collect())
    }

    pub(crate) async fn save_redeemed(
        &self,
        user: UserUuid,
        redeemed: &FxHashSet<String>,
    ) -> Result<(), OrdersRepositoryError> {
        let mut ids: Vec<&str> = redeemed.iter().map(String::as_str).collect();
        ids.sort_unstable();

        self.set_json(&redeemed_key(user), &ids).await
    }

    /// The wheel timestamp is stored as a bare epoch-millisecond string,
    /// not JSON.
    pub(crate) async fn load_last_spin(
        &self,
        user: UserUuid,
    ) -> Result<Option<Timestamp>, OrdersRepositoryError> {
        let Some(raw) = self.store.get(&last_spin_key(user)).await? else {
            return Ok(None);
        };

        let millis: i64 = raw
            .trim()
            .parse()
            .map_err(|_error| OrdersRepositoryError::InvalidTimestamp(raw.clone()))?;

        let timestamp = Timestamp::from_millisecond(millis)
            .map_err(|_error| OrdersRepositoryError::InvalidTimestamp(raw))?;

        Ok(Some(timestamp))
    }

    pub(crate) async fn save_last_spin(
        &self,
        user: UserUuid,
        at: Timestamp,
    ) -> Result<(), OrdersRepositoryError> {
        self.store
            .set(&last_spin_key(user), at.as_millisecond().to_string())
            .await?;

        Ok(())
    }

    pub(crate) async fn clear_last_spin(
        &self,
        user: UserUuid,
    ) -> Result<(), OrdersRepositoryError> {
        self.store.remove(&last_spin_key(user)).await?;

        Ok(())
    }

    async fn get_json<T>(&self, key: &str) -> Result<T, OrdersRepositoryError>
    where
        T: DeserializeOwned + Default,
    {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(T::default());
        };

        Ok(serde_json::from_str(&raw)?)
    }

    async fn set_json<T>(&self, key: &str, value: &T) -> Result<(), OrdersRepositoryError>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;

        self.store.set(key, raw).await?;

        Ok(())
    }
}

fn cart_key(user: UserUuid) -> String {
    format!("orders_{user}")
}

fn history_key(user: UserUuid) -> String {
    format!("ordersHistory_{user}")
}

fn redeemed_key(user: UserUuid) -> String {
    format!("redeemedOffers_{user}")
}

fn last_spin_key(user: UserUuid) -> String {
    format!("lastWheelSpin_{user}")
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tonda::cart::{Cart, NewItem};

    use crate::storage::MemoryStore;

    use super::*;

    fn repository() -> (Arc<MemoryStore>, OrdersRepository) {
        let store = Arc::new(MemoryStore::new());

        (store.clone(), OrdersRepository::new(store))
    }

    fn margherita() -> NewItem {
        NewItem {
            id: "1".to_string(),
            name: "Pizza Margherita".to_string(),
            price: 850,
            quantity: 2,
        }
    }

    #[tokio::test]
    async fn cart_round_trips_deep_equal() -> TestResult {
        let (_store, repository) = repository();
        let user = UserUuid::new();

        let mut cart = Cart::new();
        cart.add(margherita());

        repository.save_cart(user, cart.items()).await?;

        let loaded = repository.load_cart(user).await?;

        assert_eq!(loaded, cart.items());

        Ok(())
    }

    #[tokio::test]
    async fn missing_records_load_as_defaults() -> TestResult {
        let (_store, repository) = repository();
        let user = UserUuid::new();

        assert!(repository.load_cart(user).await?.is_empty());
        assert!(repository.load_history(user).await?.is_empty());
        assert!(repository.load_redeemed(user).await?.is_empty());
        assert_eq!(repository.load_last_spin(user).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn records_are_scoped_per_user() -> TestResult {
        let (_store, repository) = repository();
        let user_a = UserUuid::new();
        let user_b = UserUuid::new();

        let mut cart = Cart::new();
        cart.add(margherita());

        repository.save_cart(user_a, cart.items()).await?;

        assert!(repository.load_cart(user_b).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn last_spin_is_stored_as_epoch_millis() -> TestResult {
        let (store, repository) = repository();
        let user = UserUuid::new();
        let at = Timestamp::from_millisecond(1_700_000_000_000)?;

        repository.save_last_spin(user, at).await?;

        let raw = store.get(&format!("lastWheelSpin_{user}")).await?;

        assert_eq!(raw.as_deref(), Some("1700000000000"));
        assert_eq!(repository.load_last_spin(user).await?, Some(at));

        repository.clear_last_spin(user).await?;

        assert_eq!(repository.load_last_spin(user).await?, None);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_last_spin_is_an_error() -> TestResult {
        let (store, repository) = repository();
        let user = UserUuid::new();

        store
            .set(&format!("lastWheelSpin_{user}"), "not-a-number".to_string())
            .await?;

        let result = repository.load_last_spin(user).await;

        assert!(
            matches!(result, Err(OrdersRepositoryError::InvalidTimestamp(_))),
            "expected InvalidTimestamp, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn redeemed_ids_persist_sorted() -> TestResult {
        let (store, repository) = repository();
        let user = UserUuid::new();

        let redeemed: FxHashSet<String> =
            ["offer3", "offer1"].iter().map(ToString::to_string).collect();

        repository.save_redeemed(user, &redeemed).await?;

        let raw = store.get(&format!("redeemedOffers_{user}")).await?;

        assert_eq!(raw.as_deref(), Some(r#"["offer1","offer3"]"#));
        assert_eq!(repository.load_redeemed(user).await?, redeemed);

        Ok(())
    }
}
