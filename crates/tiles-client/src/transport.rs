//! JSON transport used to fetch tile set and tile matrix set documents.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use tiles_common::{TilesError, TilesResult};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;

/// Anything that can fetch a JSON document by URL.
///
/// Failures are returned as [`TilesError::Transport`],
/// [`TilesError::HttpStatus`] or [`TilesError::InvalidDocument`] and are
/// passed through the resolver untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_json(&self, url: &Url) -> TilesResult<Value>;
}

/// Transport backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> TilesResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| TilesError::ClientSetup(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self), fields(url = %url))]
    async fn fetch_json(&self, url: &Url) -> TilesResult<Value> {
        let response = self
            .client
            .get(url.clone())
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| TilesError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TilesError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TilesError::transport(url.as_str(), e))?;
        debug!(bytes = body.len(), "Fetched JSON document");

        Ok(serde_json::from_slice(&body)?)
    }
}

/// In-memory transport serving pre-registered documents.
///
/// Unknown URLs answer with HTTP 404. Every request is recorded so callers
/// can check which documents were fetched.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    documents: HashMap<String, Value>,
    requests: Mutex<Vec<String>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under `url`.
    pub fn with_document(mut self, url: &str, document: Value) -> Self {
        self.insert(url, document);
        self
    }

    pub fn insert(&mut self, url: &str, document: Value) {
        let key = Url::parse(url)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| url.to_string());
        self.documents.insert(key, document);
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        match self.requests.lock() {
            Ok(requests) => requests.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch_json(&self, url: &Url) -> TilesResult<Value> {
        match self.requests.lock() {
            Ok(mut requests) => requests.push(url.to_string()),
            Err(poisoned) => poisoned.into_inner().push(url.to_string()),
        }

        self.documents
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| TilesError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_transport_serves_documents() {
        let transport =
            MemoryTransport::new().with_document("https://example.org/tiles", json!({"dataType": "map"}));

        let url = Url::parse("https://example.org/tiles").unwrap();
        let doc = tokio_test::block_on(transport.fetch_json(&url)).unwrap();
        assert_eq!(doc["dataType"], "map");
        assert_eq!(transport.requests(), vec!["https://example.org/tiles".to_string()]);
    }

    #[test]
    fn test_memory_transport_missing_is_404() {
        let transport = MemoryTransport::new();
        let url = Url::parse("https://example.org/missing").unwrap();
        let err = tokio_test::block_on(transport.fetch_json(&url)).unwrap_err();
        assert!(matches!(err, TilesError::HttpStatus { status: 404, .. }));
    }

    #[test]
    fn test_http_transport_builds() {
        assert!(HttpTransport::new(&ClientConfig::default()).is_ok());
    }
}
