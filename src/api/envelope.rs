//! Response envelopes
//!
//! The backend wraps every successful payload as `{ "data": ..., "message": ... }`,
//! some routes twice. [`unwrap_envelope`] peels the declared number of layers and
//! decodes the payload, rejecting bodies that do not have the expected shape.

use crate::api::endpoints::EnvelopeDepth;
use crate::error::ApiError;
use crate::map_json_error;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope<Value> {
    /// Validate that a decoded body is an object carrying a `data` field
    pub fn from_value(value: Value, endpoint: &str) -> Result<Self, ApiError> {
        if !value.is_object() {
            return Err(ApiError::Decode {
                endpoint: endpoint.to_string(),
                message: "response body is not a JSON object".to_string(),
            });
        }

        serde_json::from_value(value).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            message: format!("response body is not an envelope: {}", e),
        })
    }
}

/// Peel `depth` envelope layers off `envelope` and decode the payload as `T`.
pub fn unwrap_envelope<T>(
    envelope: Envelope<Value>,
    depth: EnvelopeDepth,
    endpoint: &str,
) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let mut payload = envelope.data;

    for _ in 1..depth.levels() {
        payload = Envelope::from_value(payload, endpoint)
            .map_err(|_| ApiError::Decode {
                endpoint: endpoint.to_string(),
                message: "expected a nested `data` envelope".to_string(),
            })?
            .data;
    }

    map_json_error!(serde_json::from_value(payload), endpoint)
}
