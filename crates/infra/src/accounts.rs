//! In-memory user store.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::debug;

use storefront_accounts::{RegisterUser, User, UserId, UserStore, normalize_email};
use storefront_core::{DomainError, DomainResult};

/// In-memory [`UserStore`] for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    inner: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::invariant("user store lock poisoned")
}

impl UserStore for InMemoryUserStore {
    fn register(&self, cmd: RegisterUser) -> DomainResult<User> {
        let user = User::register(cmd, Utc::now())?;
        let mut users = self.inner.write().map_err(|_| poisoned())?;
        let key = user.email_key();
        if users.values().any(|u| u.email_key() == key) {
            return Err(DomainError::uniqueness("user.email", user.email));
        }
        debug!(user_id = %user.id, "user registered");
        users.insert(user.id, user.clone());
        Ok(user)
    }

    fn get(&self, id: UserId) -> DomainResult<User> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        users
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("user {id}")))
    }

    fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let key = normalize_email(email)?.to_lowercase();
        let users = self.inner.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.email_key() == key).cloned())
    }

    fn list(&self) -> DomainResult<Vec<User>> {
        let users = self.inner.read().map_err(|_| poisoned())?;
        let mut out: Vec<_> = users.values().cloned().collect();
        out.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(out)
    }

    fn deactivate(&self, id: UserId) -> DomainResult<User> {
        let mut users = self.inner.write().map_err(|_| poisoned())?;
        let user = users
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found(format!("user {id}")))?;
        user.deactivate();
        Ok(user.clone())
    }
}
