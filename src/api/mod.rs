//! API layer - backend HTTP client, endpoint registry and wire models

pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod models;
