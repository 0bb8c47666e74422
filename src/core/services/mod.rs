//! Resource services
//!
//! One service per backend domain. Each method issues exactly one request
//! through the shared [`ApiClient`](crate::api::client::ApiClient), logs a
//! diagnostic on failure and hands the original [`ApiError`](crate::error::ApiError)
//! back unchanged. Normalization is left to the caller.

pub mod attendance_service;
pub mod branch_service;
pub mod class_session_service;
pub mod config_service;
pub mod feature_service;
pub mod registration_service;
pub mod score_service;
pub mod session_service;
pub mod upload_service;
pub mod user_service;

pub use attendance_service::AttendanceService;
pub use branch_service::BranchService;
pub use class_session_service::ClassSessionService;
pub use config_service::ConfigService;
pub use feature_service::FeatureService;
pub use registration_service::RegistrationService;
pub use score_service::ScoreService;
pub use session_service::SessionService;
pub use upload_service::UploadService;
pub use user_service::UserService;
