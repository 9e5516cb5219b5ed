use crate::error::FetchError;
use serde_json::Value;
use shared::DawumConfig;
use shared::error::InitializationError;
use std::time::Duration;
use tracing::debug;

pub trait SurveySource {
    /// Fetches the raw polling document. One attempt, no retries.
    async fn fetch(&self) -> Result<Value, FetchError>;
}

pub struct DawumClient {
    client: reqwest::Client,
    url: String,
}

impl DawumClient {
    pub fn new(config: &DawumConfig) -> Result<Self, InitializationError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }
}

impl SurveySource for DawumClient {
    async fn fetch(&self) -> Result<Value, FetchError> {
        debug!(url = %self.url, "fetching polling data from dawum API");
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let value: Value = serde_json::from_str(&resp)?;
        debug!(bytes = resp.len(), "fetched polling data");
        Ok(value)
    }
}
