//! HTTP client for the dashboard API
//!
//! Thin wrapper over reqwest that knows the server base URL, default headers
//! and timeout, and turns request descriptors into calls.

use anyhow::{Context, Result};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Method, Url,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::debug;

use crate::api::ApiEnvelope;
use crate::config::AppConfig;

/// HTTP client errors
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Connection refused to {0}")]
    ConnectionRefused(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// HTTP client bound to one dashboard server
#[derive(Clone)]
pub struct HttpClient {
    inner: Client,
    server: Option<String>,
    headers: HeaderMap,
    timeout_secs: u64,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        Self::build(timeout_secs, false)
    }

    /// Client for the configured server, carrying its default headers
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.headers.iter().try_fold(
            Self::build(config.timeout_secs, config.accept_invalid_certs)?
                .base_url(&config.server),
            |client, (name, value)| client.default_header(name, value),
        )
    }

    fn build(timeout_secs: u64, accept_invalid_certs: bool) -> Result<Self> {
        let inner = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            inner,
            server: None,
            headers: HeaderMap::new(),
            timeout_secs,
        })
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.server = Some(url.into());
        self
    }

    /// Header sent with every request, e.g. the session cookie
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();
        let header = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("Invalid header name: {name}"))?;
        let value = HeaderValue::from_str(value.as_ref())
            .with_context(|| format!("Invalid value for header {name}"))?;
        self.headers.insert(header, value);
        Ok(self)
    }

    /// Absolute URLs pass through; anything else is joined to the server
    fn build_url(&self, path: &str) -> String {
        match &self.server {
            Some(_) if path.starts_with("http://") || path.starts_with("https://") => {
                path.to_string()
            }
            Some(server) => format!("{}{}", server.trim_end_matches('/'), path),
            None => path.to_string(),
        }
    }

    fn classify(&self, err: reqwest::Error, url: &str) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(self.timeout_secs)
        } else if err.is_connect() {
            HttpError::ConnectionRefused(url.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(url.to_string())
        } else {
            HttpError::RequestFailed(err.to_string())
        }
    }

    /// Perform `request`. Any status code is a successful send.
    pub async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = self.build_url(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = self
            .inner
            .request(request.method, &url)
            .headers(self.headers.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let started = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|err| self.classify(err, &url))?;
        HttpResponse::read(response, started).await
    }
}

/// Request descriptor produced by the resource API
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Path relative to the server base URL
    pub path: String,
    /// Query pairs, in emission order
    pub query: Vec<(String, String)>,
    pub headers: HashMap<String, String>,
    /// JSON body text
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Serialize `body` as the JSON payload
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_string(body).context("Failed to serialize request body")?);
        Ok(self)
    }

    /// Look up a query value by name
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Path plus form-encoded query string, as it goes on the wire
    pub fn path_and_query(&self) -> String {
        let query = Url::parse_with_params("http://localhost/", &self.query)
            .ok()
            .and_then(|url| url.query().map(str::to_string))
            .filter(|query| !query.is_empty());
        match query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }
}

/// HTTP response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub duration_ms: u64,
}

impl HttpResponse {
    async fn read(response: reqwest::Response, started: Instant) -> Result<Self> {
        let status_code = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;
        let duration_ms = started.elapsed().as_millis() as u64;

        debug!("{status_code} after {duration_ms}ms");
        Ok(Self {
            status_code,
            headers,
            body,
            duration_ms,
        })
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    /// Decode the raw body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).context("Failed to decode response body")
    }

    /// Unwrap the `{data, success}` envelope of a successful response
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        let envelope: ApiEnvelope<T> = self.error_for_status()?.json()?;
        Ok(envelope.data)
    }

    /// Turn a non-2xx response into [`HttpError::Status`]
    pub fn error_for_status(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        Err(HttpError::Status {
            status: self.status_code,
            body: self.body,
        }
        .into())
    }
}
