//! Make REST API access.
//!
//! Tools never talk HTTP directly: they describe the call as an
//! [`UpstreamRequest`] and hand it to a [`MakeApi`] implementation.

mod client;
mod error;

pub use client::MakeClient;
pub use error::UpstreamError;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// A single call against the Make API, relative to the zone base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl UpstreamRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// First value of a query parameter, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Executes calls against the Make API.
#[async_trait]
pub trait MakeApi: Send + Sync {
    /// Perform exactly one upstream request and return the decoded JSON body.
    async fn call(&self, request: UpstreamRequest) -> Result<Value, UpstreamError>;
}
