use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::Branch;
use crate::error::ApiError;
use std::sync::Arc;

pub struct BranchService {
    client: Arc<ApiClient>,
}

impl BranchService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_branches(&self) -> Result<Vec<Branch>, ApiError> {
        self.client
            .call(Operation::ListBranches, &[])
            .await
            .inspect_err(|e| log::error!("Error fetching branches: {}", e))
    }

    pub async fn get_branch(&self, id: u64) -> Result<Branch, ApiError> {
        let id = id.to_string();
        self.client
            .call(Operation::BranchById, &[("id", id.as_str())])
            .await
            .inspect_err(|e| log::error!("Error fetching branch {}: {}", id, e))
    }
}
