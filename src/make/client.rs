//! HTTP client for the Make REST API.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use tracing::debug;

use super::{MakeApi, UpstreamError, UpstreamRequest};

/// HTTP client bound to one Make zone and one API token.
pub struct MakeClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl MakeClient {
    /// Create a client for a Make zone such as `eu1.make.com`.
    pub fn for_zone(zone: &str, api_key: String) -> Result<Self, UpstreamError> {
        Self::new(format!("https://{}/api/v2", zone), api_key)
    }

    /// Create a client against an explicit base URL.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. "https://eu1.make.com/api/v2"
    /// * `api_key` - Make API token, sent as `Authorization: Token <key>`
    pub fn new(base_url: String, api_key: String) -> Result<Self, UpstreamError> {
        // No explicit timeout: requests rely on the transport defaults.
        let client = reqwest::Client::builder().build()?;

        // Ensure base_url doesn't have trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Get the API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MakeApi for MakeClient {
    async fn call(&self, request: UpstreamRequest) -> Result<Value, UpstreamError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!("Make API >>> {} {}", request.method, request.path);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(AUTHORIZATION, format!("Token {}", self.api_key))
            .header(CONTENT_TYPE, "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!("Make API <<< {} {} {}", status.as_u16(), request.method, request.path);

        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }
}
