//! App Context

use std::sync::Arc;

use thiserror::Error;

use tonda::catalog::{Catalog, CatalogError};

use crate::{
    auth::{AuthService, errors::AuthError},
    domain::{
        board::service::{BoardService, KvBoardService},
        orders::service::OrdersService,
        wheel::service::WheelService,
    },
    storage::KeyValueStore,
};

/// Errors wiring the application together.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The bundled catalog failed to load.
    #[error("failed to load the bundled catalog")]
    Catalog(#[source] CatalogError),

    /// The persisted sessions failed to restore.
    #[error("failed to restore persisted sessions")]
    Restore(#[source] AuthError),
}

/// Wired application services over one key-value store.
#[derive(Clone)]
pub struct AppContext {
    /// The static menu/offer/customization catalog.
    pub catalog: Arc<Catalog>,
    /// Identity provider and session lifecycle publisher.
    pub auth: Arc<AuthService>,
    /// The order/cart state machine.
    pub orders: Arc<OrdersService>,
    /// The chef order board.
    pub board: Arc<dyn BoardService>,
    /// The fortune wheel.
    pub wheel: Arc<WheelService>,
}

impl AppContext {
    /// Build the context over `store`: load the catalog, wire the
    /// services, subscribe the order state machine to session events and
    /// restore any persisted sessions.
    ///
    /// # Errors
    ///
    /// Returns an error when the bundled catalog fails to parse or the
    /// persisted sessions cannot be restored.
    pub async fn with_store(store: Arc<dyn KeyValueStore>) -> Result<Self, AppInitError> {
        let catalog = Arc::new(Catalog::bundled().map_err(AppInitError::Catalog)?);
        let board: Arc<dyn BoardService> = Arc::new(KvBoardService::new(store.clone()));
        let orders = Arc::new(OrdersService::new(
            store.clone(),
            catalog.clone(),
            board.clone(),
        ));
        let auth = Arc::new(AuthService::new(store));

        auth.subscribe(orders.clone());
        auth.restore().await.map_err(AppInitError::Restore)?;

        // A restored session is not a fresh login: adopt the identity
        // with the persisted cooldown left in force.
        if let Some(user) = auth.current_user() {
            orders.attach(user).await;
        }

        Ok(Self {
            wheel: Arc::new(WheelService::new(catalog.clone())),
            catalog,
            auth,
            orders,
            board,
        })
    }
}
