use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::{ClassSession, ClassSessionQuery};
use crate::error::ApiError;
use std::sync::Arc;

/// Class session schedule queries
pub struct ClassSessionService {
    client: Arc<ApiClient>,
}

impl ClassSessionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Sessions of one account in a given year and quarter.
    ///
    /// The query is forwarded as-is; the backend rejects out-of-range values.
    pub async fn list_class_sessions(
        &self,
        query: &ClassSessionQuery,
    ) -> Result<Vec<ClassSession>, ApiError> {
        self.client
            .call_with(Operation::ListClassSessions, &[], Some(query))
            .await
            .inspect_err(|e| log::error!("Error fetching class sessions: {}", e))
    }

    pub async fn get_class_session(&self, id: u64) -> Result<ClassSession, ApiError> {
        let id = id.to_string();
        self.client
            .call(Operation::ClassSessionById, &[("id", id.as_str())])
            .await
            .inspect_err(|e| log::error!("Error fetching class session {}: {}", id, e))
    }
}
