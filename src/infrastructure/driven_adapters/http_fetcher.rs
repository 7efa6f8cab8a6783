//! HTTP Dataset Fetcher
//!
//! Downloads remote datasets with reqwest, enforcing a timeout and a byte cap.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};

use crate::domain::gateways::DatasetFetcher;
use crate::domain::models::dataset::FetchedDataset;
use crate::shared::errors::FetchError;

/// Fetches datasets over http(s)
pub struct HttpDatasetFetcher {
    client: Client,
    max_bytes: usize,
}

impl HttpDatasetFetcher {
    /// Create a fetcher with a request timeout and a maximum body size
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Request` when the HTTP client cannot be built.
    pub fn new(timeout: Duration, max_bytes: usize) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client, max_bytes })
    }

    fn parse_url(url: &str) -> Result<Url, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(FetchError::InvalidUrl(format!("unsupported scheme '{other}'"))),
        }
    }
}

#[async_trait]
impl DatasetFetcher for HttpDatasetFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDataset, FetchError> {
        let url = Self::parse_url(url)?;
        tracing::debug!(url = %url, "Fetching remote dataset");

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Remote dataset request rejected");
            return Err(FetchError::Status(status.as_u16()));
        }
        if response
            .content_length()
            .is_some_and(|len| usize::try_from(len).map_or(true, |len| len > self.max_bytes))
        {
            return Err(FetchError::TooLarge(self.max_bytes));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Request(e.to_string()))? {
            if body.len() + chunk.len() > self.max_bytes {
                return Err(FetchError::TooLarge(self.max_bytes));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(bytes = body.len(), "Remote dataset fetched");
        Ok(FetchedDataset { content_type, body })
    }
}
