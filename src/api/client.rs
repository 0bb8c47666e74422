use crate::api::endpoints::Operation;
use crate::api::envelope::{Envelope, unwrap_envelope};
use crate::error::ApiError;
use crate::map_json_error;
use crate::utils::error_helpers::convert_request_error;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("rollcall/", env!("CARGO_PKG_VERSION"));

/// Transport client shared by every resource service.
///
/// Configuration is fixed at construction; share it behind an `Arc`. Calls are
/// never retried here, see [`crate::utils::retry`] for opt-in resilience.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    pub base_url: String,
    pub access_token: Option<String>,
    timeout_secs: u64,
}

impl ApiClient {
    // Create client with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(base_url: String, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init", timeout_secs))?;

        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: None,
            timeout_secs,
        })
    }

    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(token);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        request
    }

    pub async fn get<Q>(&self, path: &str, query: Option<&Q>) -> Result<Envelope<Value>, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        let mut request = self.build_request(Method::GET, path);
        if let Some(query) = query {
            request = request.query(query);
        }
        self.send(request, path).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<Envelope<Value>, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(Method::POST, path).json(body);
        self.send(request, path).await
    }

    /// Issue the request registered for `operation` and unwrap its payload.
    pub async fn call<T>(&self, operation: Operation, path_params: &[(&str, &str)]) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        self.call_with(operation, path_params, None::<&()>).await
    }

    /// Like [`ApiClient::call`], attaching `payload` as the query string for
    /// GET routes and as the JSON body for POST routes.
    pub async fn call_with<T, P>(
        &self,
        operation: Operation,
        path_params: &[(&str, &str)],
        payload: Option<&P>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        P: Serialize + ?Sized,
    {
        let descriptor = operation.descriptor();
        let path = descriptor.render(path_params);

        log::debug!("[{}] {} {} ({})", descriptor.domain, descriptor.method, path, operation);

        let envelope = if descriptor.method == Method::GET {
            self.get(&path, payload).await?
        } else {
            match payload {
                Some(body) => self.post(&path, body).await?,
                None => self.post(&path, &Value::Null).await?,
            }
        };

        unwrap_envelope(envelope, descriptor.depth, &path)
    }

    async fn send(&self, request: RequestBuilder, endpoint: &str) -> Result<Envelope<Value>, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| convert_request_error(e, endpoint, self.timeout_secs))?;

        Self::handle_response(response, endpoint, self.timeout_secs).await
    }

    pub async fn handle_response(
        response: Response,
        endpoint: &str,
        timeout_secs: u64,
    ) -> Result<Envelope<Value>, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| convert_request_error(e, endpoint, timeout_secs))?;

        if status.is_success() {
            let value: Value = map_json_error!(serde_json::from_str(&text), endpoint)?;
            return Envelope::from_value(value, endpoint);
        }

        let body: Option<Value> = serde_json::from_str(&text).ok();
        let message = error_message(status, body.as_ref(), &text);

        log::debug!("{} responded {}: {}", endpoint, status.as_u16(), message);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                server_message: message,
                body,
            }),
            _ => Err(ApiError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message,
                body,
            }),
        }
    }
}

// Prefer the backend's `message`, then the raw text, then the status reason
fn error_message(status: StatusCode, body: Option<&Value>, text: &str) -> String {
    body.and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}
