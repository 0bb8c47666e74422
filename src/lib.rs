//! # rollcall
//!
//! Typed data-access layer for the attendance and training management backend,
//! plus a durable local key-value store for session data.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rollcall::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> rollcall::Result<()> {
//!     let client = Arc::new(
//!         ApiClient::new("https://api.example.test".to_string())?
//!             .with_access_token("token".to_string()),
//!     );
//!
//!     match BranchService::new(client).list_branches().await {
//!         Ok(branches) => println!("{} branches", branches.len()),
//!         Err(e) => eprintln!("{}", NormalizedError::from(&e)),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │           CLI Layer                 │  Composition root, command handlers
//! ├─────────────────────────────────────┤
//! │          Core Layer                 │  Resource services, error normalization
//! ├─────────────────────────────────────┤
//! │           API Layer                 │  Transport client, endpoints, envelopes
//! ├─────────────────────────────────────┤
//! │        Storage Layer                │  Configuration, local key-value store
//! └─────────────────────────────────────┘
//! ```

pub use error::AppError;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::{ApiError, AppError};

    pub use crate::api::client::ApiClient;
    pub use crate::api::endpoints::{EnvelopeDepth, Operation};
    pub use crate::api::models::*;

    pub use crate::core::normalized_error::{NormalizedError, normalize};
    pub use crate::core::services::{
        AttendanceService, BranchService, ClassSessionService, FeatureService,
        RegistrationService, ScoreService, SessionService, UploadService, UserService,
    };

    pub use crate::storage::backend::{FileBackend, KeyValueBackend, MemoryBackend};
    pub use crate::storage::config::Config;
    pub use crate::storage::local_store::LocalStore;
}

/// Main architecture layers (dependency flow: CLI → Core → API → Storage)
pub mod cli; // Command-line interface
pub mod core; // Resource services and error normalization
pub mod storage; // Configuration and local key-value store

/// Support modules (used across layers)
pub mod api; // Backend transport client
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
