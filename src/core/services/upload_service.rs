use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::{SignedUpload, SignedUploadRequest};
use crate::error::ApiError;
use std::sync::Arc;

pub struct UploadService {
    client: Arc<ApiClient>,
}

impl UploadService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Ask the backend for a pre-signed upload URL.
    ///
    /// Every call reserves a new remote object; retrying after an ambiguous
    /// failure can leave duplicates behind.
    pub async fn create_signed_url(
        &self,
        request: &SignedUploadRequest,
    ) -> Result<SignedUpload, ApiError> {
        self.client
            .call_with(Operation::CreateSignedUploadUrl, &[], Some(request))
            .await
            .inspect_err(|e| log::error!("Error creating signed upload url: {}", e))
    }
}
