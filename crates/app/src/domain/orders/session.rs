//! Order session state machine
//!
//! Owns the cart, the private order history, the set of ever-redeemed
//! offer ids and the last wheel-spin timestamp for one identity. Memory
//! is authoritative: every mutation persists best-effort afterwards, and
//! a failed write is logged and swallowed, never rolled back.

use std::sync::Arc;

use jiff::Timestamp;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use tracing::{error, info, warn};

use tonda::{
    cart::{Cart, LineItem, NewItem},
    catalog::{Catalog, Customization, Pizza},
};

use crate::{
    auth::models::User,
    domain::{
        board::{
            models::{NewBoardOrder, OrderUuid},
            service::BoardService,
        },
        orders::repository::OrdersRepository,
    },
};

/// Sentinel email stamped on guest confirmations.
pub const GUEST_EMAIL: &str = "Ospite";

/// The order/cart state for one identity. Guests get an unpersisted,
/// in-memory-only session.
pub struct CartSession {
    user: Option<User>,
    cart: Cart,
    history: Vec<Vec<LineItem>>,
    redeemed: FxHashSet<String>,
    last_spin: Option<Timestamp>,
    catalog: Arc<Catalog>,
    repository: OrdersRepository,
    board: Arc<dyn BoardService>,
}

impl CartSession {
    /// An empty, unauthenticated session. Nothing it does is persisted
    /// per-user; confirmations go to the board only.
    pub(crate) fn guest(
        catalog: Arc<Catalog>,
        repository: OrdersRepository,
        board: Arc<dyn BoardService>,
    ) -> Self {
        Self {
            user: None,
            cart: Cart::new(),
            history: Vec::new(),
            redeemed: FxHashSet::default(),
            last_spin: None,
            catalog,
            repository,
            board,
        }
    }

    /// Load the persisted session of `user`. The four records are read
    /// concurrently and applied together; a failed read logs and falls
    /// back to the empty default. The persisted wheel timestamp is kept
    /// as stored.
    pub(crate) async fn load(
        user: User,
        catalog: Arc<Catalog>,
        repository: OrdersRepository,
        board: Arc<dyn BoardService>,
    ) -> Self {
        let (cart, history, redeemed, last_spin) = tokio::join!(
            repository.load_cart(user.uuid),
            repository.load_history(user.uuid),
            repository.load_redeemed(user.uuid),
            repository.load_last_spin(user.uuid),
        );

        let cart = cart.unwrap_or_else(|err| {
            warn!(user = %user.uuid, error = %err, "failed to load cart, starting empty");
            Vec::new()
        });

        let history = history.unwrap_or_else(|err| {
            warn!(user = %user.uuid, error = %err, "failed to load order history, starting empty");
            Vec::new()
        });

        let redeemed = redeemed.unwrap_or_else(|err| {
            warn!(user = %user.uuid, error = %err, "failed to load redeemed offers, starting empty");
            FxHashSet::default()
        });

        let last_spin = last_spin.unwrap_or_else(|err| {
            warn!(user = %user.uuid, error = %err, "failed to load wheel timestamp, starting clear");
            None
        });

        Self {
            user: Some(user),
            cart: Cart::from_items(cart),
            history,
            redeemed,
            last_spin,
            catalog,
            repository,
            board,
        }
    }

    /// The identity this session belongs to, if authenticated.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// The in-progress cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Confirmed order snapshots, oldest first.
    pub fn history(&self) -> &[Vec<LineItem>] {
        &self.history
    }

    /// Offer ids this user has ever redeemed.
    pub fn redeemed(&self) -> &FxHashSet<String> {
        &self.redeemed
    }

    /// When the last confirmed redemption happened.
    pub fn last_spin(&self) -> Option<Timestamp> {
        self.last_spin
    }

    /// Whether any cart line carries a wheel-offer id.
    pub fn has_offer_in_cart(&self) -> bool {
        self.cart.has_offer(&self.catalog)
    }

    /// Merge a plain entry into the cart.
    pub async fn add_to_cart(&mut self, item: NewItem) {
        self.cart.add(item);
        self.persist_cart().await;
    }

    /// Append a distinct customized line. Returns the synthesized line id.
    pub async fn add_customized(
        &mut self,
        pizza: &Pizza,
        selections: &[&Customization],
        quantity: u32,
        notes: &str,
        at: Timestamp,
    ) -> String {
        let id = self.cart.add_customized(pizza, selections, quantity, notes, at);

        self.persist_cart().await;

        id
    }

    /// Replace a line's quantity; zero or negative removes it.
    pub async fn update_quantity(&mut self, id: &str, quantity: i64) {
        self.cart.update_quantity(id, quantity);
        self.persist_cart().await;
    }

    /// Drop a line. Idempotent.
    pub async fn remove_from_cart(&mut self, id: &str) {
        self.cart.remove(id);
        self.persist_cart().await;
    }

    /// Empty the cart.
    pub async fn clear_cart(&mut self) {
        self.cart.clear();
        self.persist_cart().await;
    }

    /// Confirm the cart as an order. A silent no-op (`None`) on an empty
    /// cart or a guest session. Offer lines mark their ids redeemed and
    /// move the wheel clock to `at`; the stamped snapshot goes to the
    /// private history and the chef board; the cart empties.
    pub async fn confirm_order(&mut self, at: Timestamp) -> Option<OrderUuid> {
        let user = self.user.clone()?;

        if self.cart.is_empty() {
            return None;
        }

        let offer_ids: SmallVec<[String; 2]> = self
            .cart
            .items()
            .iter()
            .filter(|item| self.catalog.is_offer(&item.id))
            .map(|item| item.id.clone())
            .collect();

        if !offer_ids.is_empty() {
            self.redeemed.extend(offer_ids.iter().cloned());
            self.last_spin = Some(at);
            self.persist_redeemed().await;
            self.persist_last_spin(at).await;
        }

        let snapshot = self.cart.snapshot(&user.email);

        self.history.push(snapshot.clone());
        self.persist_history().await;

        let order = OrderUuid::new();

        self.place_on_board(order, snapshot, user.email.clone(), at).await;

        self.cart.clear();
        self.persist_cart().await;

        info!(user = %user.uuid, %order, redeemed = offer_ids.len(), "order confirmed");

        Some(order)
    }

    /// Confirm the cart without an authenticated user. The snapshot is
    /// stamped `"Ospite"` and goes to the board only; redemption history
    /// and the wheel clock are never touched.
    pub async fn confirm_as_guest(&mut self, at: Timestamp) -> Option<OrderUuid> {
        if self.cart.is_empty() {
            return None;
        }

        let snapshot = self.cart.snapshot(GUEST_EMAIL);
        let order = OrderUuid::new();

        self.place_on_board(order, snapshot, GUEST_EMAIL.to_string(), at).await;

        self.cart.clear();
        self.persist_cart().await;

        info!(%order, "guest order confirmed");

        Some(order)
    }

    /// Reopen the wheel: drop the spin timestamp from memory and storage.
    /// Redemption history stays.
    pub async fn reset_cooldown(&mut self) {
        self.last_spin = None;

        if let Some(user) = &self.user
            && let Err(err) = self.repository.clear_last_spin(user.uuid).await
        {
            error!(user = %user.uuid, error = %err, "failed to clear wheel timestamp");
        }
    }

    /// Logout path: empty all four fields in memory and clear the
    /// persisted wheel timestamp. The other records stay for the next
    /// login.
    pub async fn clear(&mut self) {
        self.cart.clear();
        self.history.clear();
        self.redeemed.clear();
        self.reset_cooldown().await;
    }

    async fn place_on_board(
        &self,
        order: OrderUuid,
        items: Vec<LineItem>,
        user_email: String,
        placed_at: Timestamp,
    ) {
        let result = self
            .board
            .place(NewBoardOrder {
                uuid: order,
                user_email,
                items,
                placed_at,
            })
            .await;

        if let Err(err) = result {
            error!(%order, error = %err, "failed to place order on the chef board");
        }
    }

    async fn persist_cart(&self) {
        let Some(user) = &self.user else {
            return;
        };

        if let Err(err) = self.repository.save_cart(user.uuid, self.cart.items()).await {
            error!(user = %user.uuid, error = %err, "failed to persist cart");
        }
    }

    async fn persist_history(&self) {
        let Some(user) = &self.user else {
            return;
        };

        if let Err(err) = self.repository.save_history(user.uuid, &self.history).await {
            error!(user = %user.uuid, error = %err, "failed to persist order history");
        }
    }

    async fn persist_redeemed(&self) {
        let Some(user) = &self.user else {
            return;
        };

        if let Err(err) = self.repository.save_redeemed(user.uuid, &self.redeemed).await {
            error!(user = %user.uuid, error = %err, "failed to persist redeemed offers");
        }
    }

    async fn persist_last_spin(&self, at: Timestamp) {
        let Some(user) = &self.user else {
            return;
        };

        if let Err(err) = self.repository.save_last_spin(user.uuid, at).await {
            error!(user = %user.uuid, error = %err, "failed to persist wheel timestamp");
        }
    }
}
