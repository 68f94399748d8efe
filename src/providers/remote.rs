use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::core::PillRecord;
use crate::providers::PillProvider;
use crate::error::{Result, PillEngineError};

const PROVIDER_NAME: &str = "remote";

/// Live pill source speaking JSON over HTTP.
///
/// `GET {base_url}/imprints?imprint=<imprint>&limit=<n>` must answer with
/// either a bare array of pill records or `{"results": [...]}`.
pub struct RemotePillProvider {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteBody {
    Bare(Vec<PillRecord>),
    Wrapped { results: Vec<PillRecord> },
}

impl RemotePillProvider {
    /// Create new remote provider
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn provider_error(message: String) -> PillEngineError {
        PillEngineError::Provider {
            provider: PROVIDER_NAME.to_string(),
            message,
        }
    }

    /// Search endpoint for an imprint
    fn search_url(&self, imprint: &str, limit: usize) -> String {
        format!(
            "{}/imprints?imprint={}&limit={}",
            self.base_url,
            urlencoding::encode(imprint.trim()),
            limit
        )
    }

    /// Decode a response body, dropping records without a usable imprint
    fn parse_body(body: &str, limit: usize) -> Result<Vec<PillRecord>> {
        let records = match serde_json::from_str::<RemoteBody>(body)
            .map_err(|e| Self::provider_error(format!("Invalid JSON: {}", e)))?
        {
            RemoteBody::Bare(records) => records,
            RemoteBody::Wrapped { results } => results,
        };

        Ok(records
            .into_iter()
            .filter(|pill| !pill.normalized_imprint().is_empty())
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl PillProvider for RemotePillProvider {
    async fn search(&self, imprint: &str, limit: usize) -> Result<Vec<PillRecord>> {
        let url = self.search_url(imprint, limit);

        let response = self.client
            .get(&url)
            .send()
            .await
            .map_err(|e| Self::provider_error(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::provider_error(format!("HTTP {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::provider_error(format!("Reading body failed: {}", e)))?;

        Self::parse_body(&body, limit)
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn is_available(&self) -> bool {
        self.search("L484", 1).await.is_ok()
    }
}
