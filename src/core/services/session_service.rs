//! Locally cached session data
//!
//! The signed-in user is cached in the local store after a successful
//! lookup. Reading it back requires the caller to already hold an access
//! token; without one the cache is treated as empty.

use crate::api::models::User;
use crate::error::ServiceError;
use crate::storage::local_store::LocalStore;

pub const CURRENT_USER_KEY: &str = "current_user";

pub struct SessionService {
    store: LocalStore,
}

impl SessionService {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub async fn remember_user(&self, user: &User) {
        self.store.set(CURRENT_USER_KEY, user).await;
    }

    pub async fn cached_user(&self, access_token: Option<&str>) -> Option<User> {
        match access_token {
            Some(token) if !token.is_empty() => self.store.get(CURRENT_USER_KEY).await,
            _ => {
                log::debug!("No access token held, ignoring cached user");
                None
            }
        }
    }

    pub async fn require_cached_user(&self, access_token: Option<&str>) -> Result<User, ServiceError> {
        if access_token.is_none_or(str::is_empty) {
            return Err(ServiceError::Session {
                message: "an access token is required to read the cached user".to_string(),
            });
        }

        self.cached_user(access_token)
            .await
            .ok_or_else(|| ServiceError::Session {
                message: "no cached user, run `rollcall user me` first".to_string(),
            })
    }
}
