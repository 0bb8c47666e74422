use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::{Score, ScoreQuery};
use crate::error::ApiError;
use std::sync::Arc;

pub struct ScoreService {
    client: Arc<ApiClient>,
}

impl ScoreService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_scores(&self, query: &ScoreQuery) -> Result<Vec<Score>, ApiError> {
        self.client
            .call_with(Operation::ListScores, &[], Some(query))
            .await
            .inspect_err(|e| log::error!("Error fetching scores: {}", e))
    }
}
