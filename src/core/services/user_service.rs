use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::User;
use crate::error::ApiError;
use std::sync::Arc;

/// User lookups
pub struct UserService {
    client: Arc<ApiClient>,
}

impl UserService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// The user the access token belongs to
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.client
            .call(Operation::CurrentUser, &[])
            .await
            .inspect_err(|e| log::error!("Error fetching current user: {}", e))
    }

    pub async fn get_user(&self, id: u64) -> Result<User, ApiError> {
        let id = id.to_string();
        self.client
            .call(Operation::UserById, &[("id", id.as_str())])
            .await
            .inspect_err(|e| log::error!("Error fetching user {}: {}", id, e))
    }
}
