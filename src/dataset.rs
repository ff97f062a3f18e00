//! Dataset Source
//!
//! Supplies the raw point-of-interest listing. The HTTP source keeps a
//! verbatim copy of the last successful response on disk and reuses it on
//! later runs while caching is enabled.

use reqwest::blocking::Client;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::DatasetConfig;
use crate::error::KravinkaError;
use crate::Result;

/// Anything that can hand out the current snapshot of raw dataset records
pub trait DatasetSource {
    /// Load every record of the listing into memory
    fn fetch(&self) -> Result<Vec<Value>>;
}

/// Decode a listing body into its raw record values
pub fn parse_listing(bytes: &[u8]) -> Result<Vec<Value>> {
    match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(records) => Ok(records),
        other => Err(KravinkaError::parse(format!(
            "expected a JSON array of records, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// HTTP GET of the listing with an on-disk cache file
pub struct HttpDataset {
    client: Client,
    url: String,
    cache_enabled: bool,
    cache_path: PathBuf,
}

impl HttpDataset {
    /// Create a new source from the dataset settings
    pub fn new(config: &DatasetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("kravinka/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KravinkaError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            cache_enabled: config.cache_enabled,
            cache_path: config.cache_path.clone(),
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw listing bytes, from the cache file when allowed, otherwise from the network
    pub fn load_bytes(&self) -> Result<Vec<u8>> {
        if self.cache_enabled && self.cache_path.is_file() {
            debug!("Reading dataset from cache file {:?}", self.cache_path);
            return Ok(fs::read(&self.cache_path)?);
        }

        let bytes = self.download()?;

        if self.cache_enabled {
            fs::write(&self.cache_path, &bytes)?;
            debug!(
                "Stored {} bytes of dataset in {:?}",
                bytes.len(),
                self.cache_path
            );
        }

        Ok(bytes)
    }

    #[instrument(name = "download_dataset", level = "debug", skip(self), fields(url = %self.url))]
    fn download(&self) -> Result<Vec<u8>> {
        info!("Downloading dataset from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| KravinkaError::network(format!("Request to {} failed: {e}", self.url)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KravinkaError::fetch(&self.url, status.as_u16()));
        }

        let bytes = response
            .bytes()
            .map_err(|e| KravinkaError::network(format!("Failed to read body from {}: {e}", self.url)))?;

        Ok(bytes.to_vec())
    }
}

impl DatasetSource for HttpDataset {
    fn fetch(&self) -> Result<Vec<Value>> {
        let bytes = self.load_bytes()?;
        let records = parse_listing(&bytes)?;
        info!("Dataset contains {} records", records.len());
        Ok(records)
    }
}

/// In-memory listing, for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticDataset {
    records: Vec<Value>,
}

impl StaticDataset {
    #[must_use]
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }

    /// Build from a JSON listing body
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(parse_listing(bytes)?))
    }
}

impl DatasetSource for StaticDataset {
    fn fetch(&self) -> Result<Vec<Value>> {
        Ok(self.records.clone())
    }
}
