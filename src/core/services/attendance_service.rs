use crate::api::client::ApiClient;
use crate::api::endpoints::Operation;
use crate::api::models::{Attendance, AttendanceRecord};
use crate::error::ApiError;
use std::sync::Arc;

pub struct AttendanceService {
    client: Arc<ApiClient>,
}

impl AttendanceService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub async fn list_attendance(&self, class_session_id: u64) -> Result<Vec<Attendance>, ApiError> {
        let id = class_session_id.to_string();
        self.client
            .call(Operation::ListAttendance, &[("id", id.as_str())])
            .await
            .inspect_err(|e| log::error!("Error fetching attendance for session {}: {}", id, e))
    }

    /// Record a check-in. Not idempotent: repeating the call may create a
    /// second attendance entry on the backend.
    pub async fn record_attendance(&self, record: &AttendanceRecord) -> Result<Attendance, ApiError> {
        self.client
            .call_with(Operation::RecordAttendance, &[], Some(record))
            .await
            .inspect_err(|e| log::error!("Error recording attendance: {}", e))
    }
}
