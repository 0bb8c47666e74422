use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::Feature;
use crate::error::ApiError;
use std::sync::Arc;

/// Feature flags exposed by the backend
pub struct FeatureService {
    client: Arc<ApiClient>,
}

impl FeatureService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_features(&self) -> Result<Vec<Feature>, ApiError> {
        self.client
            .call(Operation::ListFeatures, &[])
            .await
            .inspect_err(|e| log::error!("Error fetching features: {}", e))
    }

    pub async fn is_enabled(&self, key: &str) -> Result<bool, ApiError> {
        let features = self.list_features().await?;
        Ok(features.iter().any(|f| f.key == key && f.enabled))
    }
}
