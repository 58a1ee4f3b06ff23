//! Where raw records come from

use crate::error::{CorpusError, CorpusResult};
use crate::raw::RawCall;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// A named dataset that can be pulled in full.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable name used in logs and errors.
    fn describe(&self) -> String;

    /// Fetch every record.
    async fn fetch(&self) -> CorpusResult<Vec<RawCall>>;
}

/// Records stored in a local JSON file.
///
/// Accepted layouts: a JSON array of records, a `{"calls": [...]}` envelope,
/// or one record per line.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CallsDocument {
    List(Vec<RawCall>),
    Envelope { calls: Vec<RawCall> },
}

/// Parse any of the layouts accepted by [`JsonFileSource`].
pub(crate) fn parse_calls(source_name: &str, text: &str) -> CorpusResult<Vec<RawCall>> {
    if let Ok(document) = serde_json::from_str::<CallsDocument>(text) {
        return Ok(match document {
            CallsDocument::List(calls) => calls,
            CallsDocument::Envelope { calls } => calls,
        });
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str::<RawCall>(line).map_err(|e| CorpusError::Parse {
                source_name: source_name.to_string(),
                reason: format!("line {}: {e}", index + 1),
            })
        })
        .collect()
}

#[async_trait]
impl DatasetSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }

    async fn fetch(&self) -> CorpusResult<Vec<RawCall>> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CorpusError::Fetch {
                source_name: self.describe(),
                reason: e.to_string(),
            })?;
        parse_calls(&self.describe(), &text)
    }
}

/// Default rows endpoint of the Hugging Face datasets server.
pub const DEFAULT_HUB_ENDPOINT: &str = "https://datasets-server.huggingface.co";

/// Maximum page size accepted by the rows endpoint.
const HUB_PAGE_SIZE: usize = 100;
const HUB_TIMEOUT_SECS: u64 = 30;

/// A dataset pulled by name from a Hugging Face style rows API.
#[derive(Debug, Clone)]
pub struct HubDatasetSource {
    client: reqwest::Client,
    endpoint: String,
    dataset: String,
    config: String,
    split: String,
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    rows: Vec<RowEntry>,
    num_rows_total: usize,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: RawCall,
}

impl HubDatasetSource {
    pub fn new(dataset: impl Into<String>, split: impl Into<String>) -> Self {
        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(HUB_TIMEOUT_SECS))
            .build()
        {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to build HTTP client; falling back to one without a timeout"
                );
                reqwest::Client::new()
            }
        };
        Self {
            client,
            endpoint: DEFAULT_HUB_ENDPOINT.to_string(),
            dataset: dataset.into(),
            config: "default".to_string(),
            split: split.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_config(mut self, config: impl Into<String>) -> Self {
        self.config = config.into();
        self
    }

    async fn fetch_page(&self, offset: usize) -> CorpusResult<RowsPage> {
        let url = format!("{}/rows", self.endpoint);
        let offset = offset.to_string();
        let length = HUB_PAGE_SIZE.to_string();
        let fetch_err = |e: reqwest::Error| CorpusError::Fetch {
            source_name: self.describe(),
            reason: e.to_string(),
        };

        self.client
            .get(&url)
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", self.config.as_str()),
                ("split", self.split.as_str()),
                ("offset", offset.as_str()),
                ("length", length.as_str()),
            ])
            .send()
            .await
            .map_err(fetch_err)?
            .error_for_status()
            .map_err(fetch_err)?
            .json::<RowsPage>()
            .await
            .map_err(|e| CorpusError::Parse {
                source_name: self.describe(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl DatasetSource for HubDatasetSource {
    fn describe(&self) -> String {
        format!("hub:{}/{}", self.dataset, self.split)
    }

    async fn fetch(&self) -> CorpusResult<Vec<RawCall>> {
        let mut calls = Vec::new();
        loop {
            let page = self.fetch_page(calls.len()).await?;
            let received = page.rows.len();
            calls.extend(page.rows.into_iter().map(|entry| entry.row));
            tracing::debug!(
                source = %self.describe(),
                fetched = calls.len(),
                total = page.num_rows_total,
                "Fetched dataset page"
            );
            if received == 0 || calls.len() >= page.num_rows_total {
                break;
            }
        }
        Ok(calls)
    }
}
