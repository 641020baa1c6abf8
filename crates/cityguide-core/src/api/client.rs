//! API client for fetching the city document.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::models::Document;

use super::ApiError;

/// Location of the published city document.
pub const REMOTE_JSON_URL: &str =
    "https://raw.githubusercontent.com/vaclavpi/mista-cz/refs/heads/main/data.json";

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    url: String,
}

impl ApiClient {
    /// Create a client for the given document URL.
    ///
    /// Without a timeout the transport's own defaults apply.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// GET the remote document and parse it.
    ///
    /// A single attempt; no retries.
    pub async fn fetch_document(&self) -> Result<Document, ApiError> {
        debug!(url = %self.url, "Fetching city document");

        let response = self.client.get(&self.url).send().await?;
        let response = Self::check_response(response).await?;

        let text = response.text().await?;
        let document = Document::from_json(&text)?;

        debug!(cities = document.len(), "City document fetched");
        Ok(document)
    }
}
