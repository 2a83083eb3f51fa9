//! Auth service.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{
    auth::{
        errors::AuthError,
        models::{NewAccount, User, UserUuid},
        repository::{AccountRecord, AccountsRepository},
    },
    storage::KeyValueStore,
};

/// Fixed credentials of the single chef identity. The whole provider is a
/// stand-in for a real backend.
const CHEF_EMAIL: &str = "chef@gmail.com";
const CHEF_PASSWORD: &str = "chef";

/// Session lifecycle subscriber. Replaces ad hoc mutable callback slots
/// with an explicit publisher: observers are notified after a customer
/// logs in (or registers) and after they log out.
#[async_trait]
pub trait SessionObserver: Send + Sync {
    /// A customer session just started.
    async fn on_login(&self, user: &User);

    /// The customer session just ended.
    async fn on_logout(&self, user: &User);
}

/// Mock identity provider over the key-value adapter.
pub struct AuthService {
    repository: AccountsRepository,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
    user: RwLock<Option<User>>,
    chef: RwLock<Option<User>>,
}

impl AuthService {
    /// Create a provider over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            repository: AccountsRepository::new(store),
            observers: RwLock::new(Vec::new()),
            user: RwLock::new(None),
            chef: RwLock::new(None),
        }
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        write_lock(&self.observers).push(observer);
    }

    /// Reload the persisted customer and chef sessions. Restoring is not a
    /// fresh login, so no lifecycle event fires.
    ///
    /// # Errors
    ///
    /// Returns an error when a session record cannot be read or decoded.
    pub async fn restore(&self) -> Result<(), AuthError> {
        let user = self.repository.load_user_session().await?;
        let chef = self.repository.load_chef_session().await?;

        *write_lock(&self.user) = user;
        *write_lock(&self.chef) = chef;

        Ok(())
    }

    /// Register a new customer account and start their session.
    ///
    /// # Errors
    ///
    /// Returns an error when a required field is empty, the email is
    /// taken, or persistence fails.
    pub async fn register(&self, account: NewAccount) -> Result<User, AuthError> {
        let name = account.name.trim();
        let surname = account.surname.trim();
        let email = account.email.trim();

        if name.is_empty() || surname.is_empty() || email.is_empty() || account.password.is_empty()
        {
            return Err(AuthError::MissingRequiredData);
        }

        if self.repository.find_account(email).await?.is_some() {
            return Err(AuthError::AlreadyExists);
        }

        let user = User {
            uuid: UserUuid::new(),
            name: name.to_string(),
            surname: surname.to_string(),
            email: email.to_string(),
            address: account
                .address
                .as_deref()
                .map(str::trim)
                .filter(|address| !address.is_empty())
                .map(ToString::to_string),
            is_chef: false,
        };

        self.repository
            .create_account(&AccountRecord {
                user: user.clone(),
                password_hash: hash_password(&account.password),
            })
            .await?;

        self.repository.save_user_session(&user).await?;
        *write_lock(&self.user) = Some(user.clone());

        info!(user = %user.uuid, "registered new account");
        self.notify_login(&user).await;

        Ok(user)
    }

    /// Authenticate a customer and start their session.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown emails, wrong passwords, or
    /// persistence failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = email.trim();

        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let account = self
            .repository
            .find_account(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if account.password_hash != hash_password(password) {
            return Err(AuthError::InvalidCredentials);
        }

        let user = account.user;

        self.repository.save_user_session(&user).await?;
        *write_lock(&self.user) = Some(user.clone());

        info!(user = %user.uuid, "customer logged in");
        self.notify_login(&user).await;

        Ok(user)
    }

    /// End the customer session. A no-op when nobody is logged in.
    ///
    /// # Errors
    ///
    /// Returns an error when clearing the persisted session fails.
    pub async fn logout(&self) -> Result<(), AuthError> {
        let Some(user) = write_lock(&self.user).take() else {
            return Ok(());
        };

        self.repository.clear_user_session().await?;

        info!(user = %user.uuid, "customer logged out");
        self.notify_logout(&user).await;

        Ok(())
    }

    /// Authenticate the chef identity. Independent of the customer
    /// session and emits no customer lifecycle events.
    ///
    /// # Errors
    ///
    /// Returns an error for wrong credentials or persistence failures.
    pub async fn chef_login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim() != CHEF_EMAIL || password != CHEF_PASSWORD {
            return Err(AuthError::InvalidCredentials);
        }

        let chef = User {
            uuid: UserUuid::new(),
            name: "Chef".to_string(),
            surname: "Master".to_string(),
            email: CHEF_EMAIL.to_string(),
            address: None,
            is_chef: true,
        };

        self.repository.save_chef_session(&chef).await?;
        *write_lock(&self.chef) = Some(chef.clone());

        info!("chef logged in");

        Ok(chef)
    }

    /// End the chef session. A no-op when no chef is logged in.
    ///
    /// # Errors
    ///
    /// Returns an error when clearing the persisted session fails.
    pub async fn chef_logout(&self) -> Result<(), AuthError> {
        if write_lock(&self.chef).take().is_none() {
            return Ok(());
        }

        self.repository.clear_chef_session().await?;

        info!("chef logged out");

        Ok(())
    }

    /// The active customer, if any.
    pub fn current_user(&self) -> Option<User> {
        read_lock(&self.user).clone()
    }

    /// The active chef, if any.
    pub fn current_chef(&self) -> Option<User> {
        read_lock(&self.chef).clone()
    }

    /// Whether a customer session is active.
    pub fn is_authenticated(&self) -> bool {
        read_lock(&self.user).is_some()
    }

    /// Whether a chef session is active.
    pub fn is_chef_authenticated(&self) -> bool {
        read_lock(&self.chef).is_some()
    }

    async fn notify_login(&self, user: &User) {
        for observer in self.observer_snapshot() {
            observer.on_login(user).await;
        }
    }

    async fn notify_logout(&self, user: &User) {
        for observer in self.observer_snapshot() {
            observer.on_logout(user).await;
        }
    }

    fn observer_snapshot(&self) -> Vec<Arc<dyn SessionObserver>> {
        read_lock(&self.observers).clone()
    }
}

fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
