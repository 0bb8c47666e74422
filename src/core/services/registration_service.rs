use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::{NewRegistration, Registration};
use crate::error::ApiError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountQuery {
    id_account: u64,
}

pub struct RegistrationService {
    client: Arc<ApiClient>,
}

impl RegistrationService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_registrations(&self, account_id: u64) -> Result<Vec<Registration>, ApiError> {
        let query = AccountQuery {
            id_account: account_id,
        };
        self.client
            .call_with(Operation::ListRegistrations, &[], Some(&query))
            .await
            .inspect_err(|e| log::error!("Error fetching registrations: {}", e))
    }

    /// Register a student for a class session. Not idempotent.
    pub async fn create_registration(
        &self,
        registration: &NewRegistration,
    ) -> Result<Registration, ApiError> {
        self.client
            .call_with(Operation::CreateRegistration, &[], Some(registration))
            .await
            .inspect_err(|e| log::error!("Error creating registration: {}", e))
    }
}
