//! MUX REST API Client
//!
//! Generic request wrapper around `reqwest`. Every call passes through
//! [`ApiClient::authorize`], which attaches the session token as the
//! `Authorization` header unless the path is a credential exchange.
//! Failures are logged once here and handed back to the caller unchanged.

use super::request::{ApiRequest, ResponseBody, ResponseType};
use super::ClientError;
use crate::session::{is_credential_path, Session};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:8080")
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
    /// Size of the body chunks streamed during uploads
    pub upload_chunk_size: usize,
    /// Timeout in seconds for a whole upload, replacing `request_timeout_secs`
    pub upload_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 30,
            upload_chunk_size: 64 * 1024,
            upload_timeout_secs: 300,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Authenticated client for the MUX backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: ClientConfig,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a client bound to `session`
    pub fn new(config: ClientConfig, session: Arc<Session>) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            session,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session whose token is attached to requests
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Absolute URL for an API path
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Attach the session token unless `path` exchanges credentials
    pub(crate) fn authorize(&self, builder: RequestBuilder, path: &str) -> RequestBuilder {
        if is_credential_path(path) {
            return builder;
        }
        match self.session.token() {
            Some(token) => builder.header(AUTHORIZATION, token),
            None => builder,
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Send a request and read the body according to its response type
    pub async fn request(&self, request: ApiRequest) -> Result<ResponseBody, ClientError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let method = request.method.clone();
        let path = request.path.clone();

        tracing::debug!(request_id = %request_id, method = %method, path = %path, "Sending request");

        match self.dispatch(request).await {
            Ok(body) => Ok(body),
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    "Request failed"
                );
                Err(e)
            }
        }
    }

    async fn dispatch(&self, request: ApiRequest) -> Result<ResponseBody, ClientError> {
        let mut builder = self
            .client
            .request(request.method, self.url(&request.path));
        builder = self.authorize(builder, &request.path);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(ResponseBody::from_bytes(bytes.to_vec(), request.response_type))
    }

    async fn request_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ClientError> {
        let value = self.request(request).await?.into_json();
        serde_json::from_value(value).map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn with_body<B: Serialize + ?Sized>(
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiRequest, ClientError> {
        ApiRequest::new(method, path).json(body)
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        self.request_json(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        self.request_json(Self::with_body(Method::POST, path, body)?)
            .await
    }

    pub async fn put<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        self.request_json(Self::with_body(Method::PUT, path, body)?)
            .await
    }

    pub async fn patch<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ClientError> {
        self.request_json(Self::with_body(Method::PATCH, path, body)?)
            .await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ClientError> {
        self.request_json(ApiRequest::delete(path)).await
    }

    /// GET a binary body, used for file downloads
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let body = self
            .request(ApiRequest::get(path).response_type(ResponseType::Bytes))
            .await?;
        Ok(body.into_bytes())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish()
    }
}
