use crate::config::Config;
use crate::errors::StoreError;
use crate::models::{BinDocument, BinWrite, Collection, Record};
use tracing::{debug, error, info, warn};

const MASTER_KEY_HEADER: &str = "X-Master-Key";

/// Reads and overwrites the whole collection held in one JSONBin document.
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    url: String,
    master_key: String,
}

impl StoreClient {
    pub fn new(url: impl Into<String>, master_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            master_key: master_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store_url.clone(), config.master_key.clone())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn load_all(&self) -> Result<Collection, StoreError> {
        let response = self
            .http
            .get(&self.url)
            .header(MASTER_KEY_HEADER, &self.master_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let document: BinDocument = serde_json::from_str(&body)?;
        Ok(document.record.leetcode)
    }

    /// Overwrites the stored collection with `updated` and returns the
    /// collection the store confirmed.
    pub async fn replace_all(&self, updated: &[Record]) -> Result<Collection, StoreError> {
        let response = self
            .http
            .put(&self.url)
            .header(MASTER_KEY_HEADER, &self.master_key)
            .json(&BinWrite { leetcode: updated })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), %body, "store write response");
        if !status.is_success() {
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<BinDocument>(&body) {
            Ok(document) => Ok(document.record.leetcode),
            Err(err) => {
                warn!("store write acknowledged without a readable echo: {err}");
                Ok(updated.to_vec())
            }
        }
    }
}

/// Startup load: a failed read leaves the dashboard empty instead of
/// refusing to serve.
pub async fn load_or_empty(store: &StoreClient) -> Collection {
    match store.load_all().await {
        Ok(records) => {
            info!(records = records.len(), "loaded collection from {}", store.url());
            records
        }
        Err(err) => {
            error!("failed to load collection: {err}");
            Collection::new()
        }
    }
}
