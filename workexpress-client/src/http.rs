//! HTTP client for the WorkExpress backend
//!
//! Every request is authenticated: the bearer token comes from the injected
//! [`AuthContext`] and a missing token fails before anything hits the
//! network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::auth::AuthContext;
use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    fn auth(&self) -> &AuthContext;
}

/// Network HTTP client backed by reqwest
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    auth: AuthContext,
}

impl NetworkHttpClient {
    pub fn new(config: &ClientConfig, auth: AuthContext) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("base_url is required".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Build from configuration, taking the token from `config.token`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let auth = config
            .token
            .as_deref()
            .map(AuthContext::new)
            .unwrap_or_default();
        Self::new(config, auth)
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let bearer = self.auth.bearer()?;
        let response = req
            .header(reqwest::header::AUTHORIZATION, bearer)
            .send()
            .await?;
        handle_response(response).await
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        tracing::debug!(path, "GET");
        self.send(self.client.get(self.url(path))).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "POST");
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        tracing::debug!(path, "PUT");
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    fn auth(&self) -> &AuthContext {
        &self.auth
    }
}

async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(status_error(status, &text));
    }

    // Empty 2xx bodies decode as JSON null
    let body = if text.trim().is_empty() { "null" } else { text.as_str() };
    serde_json::from_str(body).map_err(Into::into)
}

/// Map a non-2xx response to a client error
pub(crate) fn status_error(status: StatusCode, body: &str) -> ClientError {
    let message = server_message(body).unwrap_or_else(|| body.trim().to_string());
    match status {
        StatusCode::UNAUTHORIZED => ClientError::NotAuthenticated,
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ClientError::Validation(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull `message` (string or list of strings) or `error` out of an error body
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let field = value.get("message").or_else(|| value.get("error"))?;
    match field {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(|v| v.as_str()).collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}
