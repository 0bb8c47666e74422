//! Storage layer for rollcall
//!
//! Handles configuration management and the durable local key-value store.

use crate::error::StorageError;

pub mod backend;
pub mod config;
pub mod credentials;
pub mod local_store;

type Result<T> = std::result::Result<T, StorageError>;
