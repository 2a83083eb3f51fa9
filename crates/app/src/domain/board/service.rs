//! Board service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tonda::cart::ItemStatus;
use tracing::info;

use crate::{
    domain::board::{
        errors::BoardServiceError,
        models::{BoardOrder, NewBoardOrder, OrderUuid},
        repository::BoardRepository,
    },
    storage::KeyValueStore,
};

/// Key-value backed chef board.
#[derive(Clone)]
pub struct KvBoardService {
    repository: BoardRepository,
}

impl KvBoardService {
    /// Create a board over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            repository: BoardRepository::new(store),
        }
    }
}

#[async_trait]
impl BoardService for KvBoardService {
    async fn place(&self, order: NewBoardOrder) -> Result<BoardOrder, BoardServiceError> {
        let order = BoardOrder {
            uuid: order.uuid,
            user_email: order.user_email,
            items: order.items,
            placed_at: order.placed_at,
            version: 1,
        };

        self.repository.put(&order).await?;

        info!(order = %order.uuid, lines = order.items.len(), "order placed on the board");

        Ok(order)
    }

    async fn list_orders(&self) -> Result<Vec<BoardOrder>, BoardServiceError> {
        let mut orders = self.repository.list().await?;

        orders.sort_by(|a, b| b.placed_at.cmp(&a.placed_at).then(b.uuid.cmp(&a.uuid)));

        Ok(orders)
    }

    async fn update_item_status(
        &self,
        order: OrderUuid,
        item_index: usize,
        status: ItemStatus,
        expected_version: u64,
    ) -> Result<BoardOrder, BoardServiceError> {
        let mut record = self
            .repository
            .get(order)
            .await?
            .ok_or(BoardServiceError::NotFound)?;

        if record.version != expected_version {
            return Err(BoardServiceError::VersionConflict {
                expected: expected_version,
                actual: record.version,
            });
        }

        let item = record
            .items
            .get_mut(item_index)
            .ok_or(BoardServiceError::ItemNotFound)?;

        item.status = status;
        record.version += 1;

        self.repository.put(&record).await?;

        Ok(record)
    }
}

/// Chef-facing operations on the global order log. Not scoped to any user.
#[automock]
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Append a confirmed order snapshot to the board at version 1.
    ///
    /// # Errors
    ///
    /// Returns an error when persistence fails.
    async fn place(&self, order: NewBoardOrder) -> Result<BoardOrder, BoardServiceError>;

    /// Every order on the board, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error when the scan fails or a record is corrupt.
    async fn list_orders(&self) -> Result<Vec<BoardOrder>, BoardServiceError>;

    /// Compare-and-set edit of one item's status. The edit applies only
    /// when `expected_version` matches the record on the board.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`/`ItemNotFound` for unknown targets,
    /// `VersionConflict` for stale edits, or a storage error.
    async fn update_item_status(
        &self,
        order: OrderUuid,
        item_index: usize,
        status: ItemStatus,
        expected_version: u64,
    ) -> Result<BoardOrder, BoardServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;
    use tonda::cart::LineItem;

    use crate::storage::MemoryStore;

    use super::*;

    fn board() -> KvBoardService {
        KvBoardService::new(Arc::new(MemoryStore::new()))
    }

    fn line(id: &str) -> LineItem {
        LineItem {
            id: id.to_string(),
            name: "Pizza Margherita".to_string(),
            price: 850,
            quantity: 1,
            status: ItemStatus::Pending,
            notes: None,
            user_email: Some("a@x.com".to_string()),
        }
    }

    fn snapshot(uuid: OrderUuid, placed_at: Timestamp) -> NewBoardOrder {
        NewBoardOrder {
            uuid,
            user_email: "a@x.com".to_string(),
            items: vec![line("1")],
            placed_at,
        }
    }

    fn at(ms: i64) -> Timestamp {
        Timestamp::from_millisecond(ms).expect("valid test timestamp")
    }

    #[tokio::test]
    async fn placed_orders_start_at_version_one() -> TestResult {
        let board = board();

        let placed = board.place(snapshot(OrderUuid::new(), at(1_000))).await?;

        assert_eq!(placed.version, 1);
        assert_eq!(placed.user_email, "a@x.com");

        Ok(())
    }

    #[tokio::test]
    async fn orders_list_newest_first() -> TestResult {
        let board = board();

        let older = board.place(snapshot(OrderUuid::new(), at(1_000))).await?;
        let newer = board.place(snapshot(OrderUuid::new(), at(2_000))).await?;

        let listed = board.list_orders().await?;

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].uuid, newer.uuid);
        assert_eq!(listed[1].uuid, older.uuid);

        Ok(())
    }

    #[tokio::test]
    async fn status_edit_bumps_the_version() -> TestResult {
        let board = board();
        let placed = board.place(snapshot(OrderUuid::new(), at(1_000))).await?;

        let updated = board
            .update_item_status(placed.uuid, 0, ItemStatus::Completed, 1)
            .await?;

        assert_eq!(updated.version, 2);
        assert_eq!(updated.items[0].status, ItemStatus::Completed);

        Ok(())
    }

    #[tokio::test]
    async fn stale_edit_is_rejected() -> TestResult {
        let board = board();
        let placed = board.place(snapshot(OrderUuid::new(), at(1_000))).await?;

        board
            .update_item_status(placed.uuid, 0, ItemStatus::Completed, 1)
            .await?;

        // A second chef still holding version 1 must not clobber the edit.
        let result = board
            .update_item_status(placed.uuid, 0, ItemStatus::Pending, 1)
            .await;

        assert!(
            matches!(
                result,
                Err(BoardServiceError::VersionConflict {
                    expected: 1,
                    actual: 2
                })
            ),
            "expected VersionConflict, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let board = board();

        let result = board
            .update_item_status(OrderUuid::new(), 0, ItemStatus::Completed, 1)
            .await;

        assert!(
            matches!(result, Err(BoardServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn out_of_range_item_is_not_found() -> TestResult {
        let board = board();
        let placed = board.place(snapshot(OrderUuid::new(), at(1_000))).await?;

        let result = board
            .update_item_status(placed.uuid, 5, ItemStatus::Completed, 1)
            .await;

        assert!(
            matches!(result, Err(BoardServiceError::ItemNotFound)),
            "expected ItemNotFound, got {result:?}"
        );

        Ok(())
    }
}
