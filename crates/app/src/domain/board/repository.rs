//! Board records.

use std::sync::Arc;

use crate::{
    domain::board::{
        errors::BoardServiceError,
        models::{BoardOrder, OrderUuid},
    },
    storage::KeyValueStore,
};

const KEY_PREFIX: &str = "globalOrders_";

/// Key-value backed board repository, one record per order.
#[derive(Clone)]
pub(crate) struct BoardRepository {
    store: Arc<dyn KeyValueStore>,
}

impl BoardRepository {
    #[must_use]
    pub(crate) fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub(crate) async fn get(
        &self,
        order: OrderUuid,
    ) -> Result<Option<BoardOrder>, BoardServiceError> {
        let Some(raw) = self.store.get(&order_key(order)).await? else {
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }

    pub(crate) async fn put(&self, order: &BoardOrder) -> Result<(), BoardServiceError> {
        let raw = serde_json::to_string(order)?;

        self.store.set(&order_key(order.uuid), raw).await?;

        Ok(())
    }

    pub(crate) async fn list(&self) -> Result<Vec<BoardOrder>, BoardServiceError> {
        let keys = self.store.keys(KEY_PREFIX).await?;
        let mut orders = Vec::with_capacity(keys.len());

        for key in keys {
            // A record deleted between the scan and the read is not an error.
            if let Some(raw) = self.store.get(&key).await? {
                orders.push(serde_json::from_str(&raw)?);
            }
        }

        Ok(orders)
    }
}

fn order_key(order: OrderUuid) -> String {
    format!("{KEY_PREFIX}{order}")
}
