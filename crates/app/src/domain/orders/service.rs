//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;
use tracing::warn;

use tonda::{
    cart::{LineItem, NewItem},
    catalog::{Catalog, Customization},
};

use crate::{
    auth::{models::User, service::SessionObserver},
    domain::{
        board::{models::OrderUuid, service::BoardService},
        orders::{repository::OrdersRepository, session::CartSession},
    },
    storage::KeyValueStore,
};

/// Snapshot of the fields the wheel cooldown policy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelState {
    /// Whether an unconfirmed wheel offer sits in the cart.
    pub has_offer_in_cart: bool,
    /// Whether this user ever redeemed an offer.
    pub redeemed_any: bool,
    /// When the last confirmed redemption happened.
    pub last_spin: Option<Timestamp>,
}

/// Owner of the active order session. Starts in guest mode and follows
/// the identity provider's lifecycle events: a login loads the user's
/// persisted state and reopens the wheel, a logout clears back to guest.
pub struct OrdersService {
    session: RwLock<CartSession>,
    catalog: Arc<Catalog>,
    repository: OrdersRepository,
    board: Arc<dyn BoardService>,
}

impl OrdersService {
    /// Create a service over `store`, starting with a guest session.
    #[must_use]
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        catalog: Arc<Catalog>,
        board: Arc<dyn BoardService>,
    ) -> Self {
        let repository = OrdersRepository::new(store);

        Self {
            session: RwLock::new(CartSession::guest(
                catalog.clone(),
                repository.clone(),
                board.clone(),
            )),
            catalog,
            repository,
            board,
        }
    }

    /// Adopt a restored identity without treating it as a fresh login:
    /// the persisted cooldown stays in force.
    pub async fn attach(&self, user: User) {
        *self.session.write().await = self.load_session(user).await;
    }

    /// Merge a plain catalog entry into the cart.
    pub async fn add_to_cart(&self, item: NewItem) {
        self.session.write().await.add_to_cart(item).await;
    }

    /// Append a distinct customized line for `pizza_id`. Unknown pizza
    /// ids are ignored; unknown customization ids are skipped. Returns
    /// the new line id.
    pub async fn add_customized(
        &self,
        pizza_id: &str,
        selection_ids: &[String],
        quantity: u32,
        notes: &str,
        at: Timestamp,
    ) -> Option<String> {
        let Some(pizza) = self.catalog.pizza(pizza_id) else {
            warn!(pizza = pizza_id, "ignoring customization of unknown pizza");
            return None;
        };

        let mut selections: Vec<&Customization> = Vec::with_capacity(selection_ids.len());

        for id in selection_ids {
            match self.catalog.customization(id) {
                Some(customization) => selections.push(customization),
                None => warn!(customization = %id, "skipping unknown customization"),
            }
        }

        let id = self
            .session
            .write()
            .await
            .add_customized(pizza, &selections, quantity, notes, at)
            .await;

        Some(id)
    }

    /// Replace a line's quantity; zero or negative removes it.
    pub async fn update_quantity(&self, id: &str, quantity: i64) {
        self.session.write().await.update_quantity(id, quantity).await;
    }

    /// Drop a line. Idempotent.
    pub async fn remove_from_cart(&self, id: &str) {
        self.session.write().await.remove_from_cart(id).await;
    }

    /// Empty the cart.
    pub async fn clear_cart(&self) {
        self.session.write().await.clear_cart().await;
    }

    /// Confirm the cart as an order; see
    /// [`CartSession::confirm_order`](crate::domain::orders::session::CartSession::confirm_order).
    pub async fn confirm_order(&self, at: Timestamp) -> Option<OrderUuid> {
        self.session.write().await.confirm_order(at).await
    }

    /// Confirm the cart as a guest; board only, no per-user state.
    pub async fn confirm_as_guest(&self, at: Timestamp) -> Option<OrderUuid> {
        self.session.write().await.confirm_as_guest(at).await
    }

    /// Reopen the wheel without touching redemption history.
    pub async fn reset_cooldown(&self) {
        self.session.write().await.reset_cooldown().await;
    }

    /// The identity the active session belongs to, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.user().cloned()
    }

    /// The cart lines, in insertion order.
    pub async fn cart_items(&self) -> Vec<LineItem> {
        self.session.read().await.cart().items().to_vec()
    }

    /// Cart total in minor units.
    pub async fn cart_total_minor(&self) -> u64 {
        self.session.read().await.cart().total_minor()
    }

    /// Confirmed order snapshots, oldest first.
    pub async fn history(&self) -> Vec<Vec<LineItem>> {
        self.session.read().await.history().to_vec()
    }

    /// Offer ids this user has ever redeemed, sorted.
    pub async fn redeemed(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .session
            .read()
            .await
            .redeemed()
            .iter()
            .cloned()
            .collect();

        ids.sort_unstable();

        ids
    }

    /// Whether any cart line carries a wheel-offer id. Recomputed on
    /// every call, never stored.
    pub async fn has_offer_in_cart(&self) -> bool {
        self.session.read().await.has_offer_in_cart()
    }

    /// When the last confirmed redemption happened.
    pub async fn last_spin(&self) -> Option<Timestamp> {
        self.session.read().await.last_spin()
    }

    /// The triple the wheel cooldown policy evaluates.
    pub async fn wheel_state(&self) -> WheelState {
        let session = self.session.read().await;

        WheelState {
            has_offer_in_cart: session.has_offer_in_cart(),
            redeemed_any: !session.redeemed().is_empty(),
            last_spin: session.last_spin(),
        }
    }

    async fn load_session(&self, user: User) -> CartSession {
        CartSession::load(
            user,
            self.catalog.clone(),
            self.repository.clone(),
            self.board.clone(),
        )
        .await
    }

    fn guest_session(&self) -> CartSession {
        CartSession::guest(
            self.catalog.clone(),
            self.repository.clone(),
            self.board.clone(),
        )
    }
}

#[async_trait]
impl SessionObserver for OrdersService {
    async fn on_login(&self, user: &User) {
        let mut session = self.load_session(user.clone()).await;

        // A fresh login or registration reopens the wheel.
        session.reset_cooldown().await;

        *self.session.write().await = session;
    }

    async fn on_logout(&self, _user: &User) {
        let mut guard = self.session.write().await;

        guard.clear().await;
        *guard = self.guest_session();
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::board::service::KvBoardService,
        storage::{MemoryStore, MockKeyValueStore, StorageError},
        test::{at, margherita, sample_user, wheel_offer},
    };

    use super::*;

    fn service_over(store: Arc<MemoryStore>) -> OrdersService {
        let catalog = Arc::new(Catalog::bundled().expect("bundled catalog loads"));
        let board = Arc::new(KvBoardService::new(store.clone()));

        OrdersService::new(store, catalog, board)
    }

    fn service() -> OrdersService {
        service_over(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn adding_twice_merges_into_one_line() {
        let orders = service();

        orders.add_to_cart(margherita()).await;
        orders.add_to_cart(margherita()).await;

        let items = orders.cart_items().await;

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "1");
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn customized_lines_never_merge() {
        let orders = service();

        let first = orders
            .add_customized("1", &["extra_cheese".to_string()], 1, "ben cotta", at(1_000))
            .await;
        let second = orders
            .add_customized("1", &["extra_cheese".to_string()], 1, "ben cotta", at(2_000))
            .await;

        assert!(first.is_some(), "first customized add should succeed");
        assert!(second.is_some(), "second customized add should succeed");
        assert_ne!(first, second);
        assert_eq!(orders.cart_items().await.len(), 2);
    }

    #[tokio::test]
    async fn unknown_pizza_customization_is_ignored() {
        let orders = service();

        let result = orders.add_customized("99", &[], 1, "", at(1_000)).await;

        assert_eq!(result, None);
        assert!(orders.cart_items().await.is_empty());
    }

    #[tokio::test]
    async fn confirm_requires_an_authenticated_user() {
        let orders = service();

        orders.add_to_cart(margherita()).await;

        assert_eq!(orders.confirm_order(at(1_000)).await, None);
        assert_eq!(orders.cart_items().await.len(), 1, "cart must survive the no-op");
    }

    #[tokio::test]
    async fn confirm_with_empty_cart_is_a_noop() {
        let orders = service();

        orders.on_login(&sample_user()).await;

        assert_eq!(orders.confirm_order(at(1_000)).await, None);
        assert!(orders.history().await.is_empty());
    }

    #[tokio::test]
    async fn confirm_snapshots_stamp_and_clear() {
        let orders = service();
        let user = sample_user();

        orders.on_login(&user).await;
        orders.add_to_cart(margherita()).await;

        let confirmed = orders.confirm_order(at(1_000)).await;

        assert!(confirmed.is_some(), "confirmation should produce an order id");
        assert!(orders.cart_items().await.is_empty());

        let history = orders.history().await;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0][0].user_email.as_deref(), Some(user.email.as_str()));

        // A plain pizza is not a redemption.
        assert!(orders.redeemed().await.is_empty());
        assert_eq!(orders.last_spin().await, None);
    }

    #[tokio::test]
    async fn confirming_an_offer_redeems_it_and_starts_the_cooldown() {
        let orders = service();

        orders.on_login(&sample_user()).await;
        orders.add_to_cart(wheel_offer("offer3")).await;

        assert!(orders.has_offer_in_cart().await);

        orders.confirm_order(at(5_000)).await;

        assert_eq!(orders.redeemed().await, vec!["offer3".to_string()]);
        assert_eq!(orders.last_spin().await, Some(at(5_000)));
        assert!(!orders.has_offer_in_cart().await);
    }

    #[tokio::test]
    async fn redemption_history_is_append_only() {
        let orders = service();

        orders.on_login(&sample_user()).await;

        orders.add_to_cart(wheel_offer("offer3")).await;
        orders.confirm_order(at(1_000)).await;

        orders.add_to_cart(wheel_offer("offer5")).await;
        orders.confirm_order(at(2_000)).await;

        // Re-redeeming an already-redeemed id is a set-level no-op.
        orders.add_to_cart(wheel_offer("offer3")).await;
        orders.confirm_order(at(3_000)).await;

        assert_eq!(
            orders.redeemed().await,
            vec!["offer3".to_string(), "offer5".to_string()]
        );
    }

    #[tokio::test]
    async fn guest_confirmation_touches_the_board_only() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let orders = service_over(store.clone());

        orders.add_to_cart(wheel_offer("offer1")).await;

        let confirmed = orders.confirm_as_guest(at(1_000)).await;

        assert!(confirmed.is_some(), "guest confirmation should produce an order id");
        assert!(orders.cart_items().await.is_empty());
        assert!(orders.redeemed().await.is_empty());
        assert_eq!(orders.last_spin().await, None);
        assert!(orders.history().await.is_empty());

        // The board gained one record and no per-user record exists.
        assert_eq!(store.keys("globalOrders_").await?.len(), 1);
        assert!(store.keys("orders_").await?.is_empty());
        assert!(store.keys("ordersHistory_").await?.is_empty());
        assert!(store.keys("redeemedOffers_").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn login_reloads_persisted_state_and_reopens_the_wheel() {
        let store = Arc::new(MemoryStore::new());
        let user = sample_user();

        let first = service_over(store.clone());

        first.on_login(&user).await;
        first.add_to_cart(wheel_offer("offer3")).await;
        first.confirm_order(at(1_000)).await;
        first.add_to_cart(margherita()).await;

        // A fresh login elsewhere sees the cart and the redemption, but
        // the cooldown is reset by the login event.
        let second = service_over(store);

        second.on_login(&user).await;

        assert_eq!(second.cart_items().await.len(), 1);
        assert_eq!(second.redeemed().await, vec!["offer3".to_string()]);
        assert_eq!(second.last_spin().await, None);
    }

    #[tokio::test]
    async fn attach_preserves_the_persisted_cooldown() {
        let store = Arc::new(MemoryStore::new());
        let user = sample_user();

        let first = service_over(store.clone());

        first.on_login(&user).await;
        first.add_to_cart(wheel_offer("offer3")).await;
        first.confirm_order(at(1_000)).await;

        // A session restore is not a login: the clock keeps running.
        let second = service_over(store);

        second.attach(user).await;

        assert_eq!(second.last_spin().await, Some(at(1_000)));
    }

    #[tokio::test]
    async fn reset_cooldown_keeps_the_redemption_history() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let orders = service_over(store.clone());

        orders.on_login(&sample_user()).await;
        orders.add_to_cart(wheel_offer("offer3")).await;
        orders.confirm_order(at(1_000)).await;

        assert_eq!(orders.last_spin().await, Some(at(1_000)));

        orders.reset_cooldown().await;

        assert_eq!(orders.last_spin().await, None);
        assert_eq!(orders.redeemed().await, vec!["offer3".to_string()]);
        assert!(
            store.keys("lastWheelSpin_").await?.is_empty(),
            "the persisted timestamp must be cleared too"
        );

        Ok(())
    }

    #[tokio::test]
    async fn logout_clears_memory_but_keeps_records() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        let user = sample_user();
        let orders = service_over(store.clone());

        orders.on_login(&user).await;
        orders.add_to_cart(margherita()).await;
        orders.on_logout(&user).await;

        assert!(orders.cart_items().await.is_empty());
        assert_eq!(orders.current_user().await, None);

        // The cart record survives for the next login; the wheel
        // timestamp does not.
        assert_eq!(store.keys("orders_").await?.len(), 1);
        assert!(store.keys("lastWheelSpin_").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn failed_writes_leave_memory_authoritative() {
        let mut mock = MockKeyValueStore::new();

        mock.expect_get().returning(|_| Ok(None));
        mock.expect_remove().returning(|_| Ok(()));
        mock.expect_keys().returning(|_| Ok(Vec::new()));
        mock.expect_set()
            .returning(|_, _| Err(StorageError::Io(std::io::Error::other("disk full"))));

        let store: Arc<MockKeyValueStore> = Arc::new(mock);
        let catalog = Arc::new(Catalog::bundled().expect("bundled catalog loads"));
        let board = Arc::new(KvBoardService::new(store.clone()));
        let orders = OrdersService::new(store, catalog, board);

        orders.on_login(&sample_user()).await;
        orders.add_to_cart(margherita()).await;

        // The write failed, but the in-memory cart still advanced.
        assert_eq!(orders.cart_items().await.len(), 1);
    }
}
