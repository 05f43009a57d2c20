// Cache store for reading and writing cached HTTP responses.
// Handles JSON serialization and atomic filesystem writes.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Response headers worth keeping alongside a cached body.
pub const STORED_HEADERS: &[&str] = &[
    "content-type",
    "etag",
    "last-modified",
    "x-pypi-last-serial",
];

/// A stored HTTP response keyed by its request URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    /// Request URL the response belongs to.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Lowercased header names mapped to their values.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Raw response body.
    pub body: String,
    /// When the response was last fetched or revalidated.
    pub cached_at: DateTime<Utc>,
    /// Whether this instance was served from disk rather than the network.
    #[serde(skip)]
    pub from_cache: bool,
}

impl CachedResponse {
    /// Create a freshly fetched response.
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            headers: BTreeMap::new(),
            body: body.into(),
            cached_at: Utc::now(),
            from_cache: false,
        }
    }

    /// Attach a header, normalizing its name.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Read a cached response from a file.
pub fn read_cached(path: &Path) -> Result<Option<CachedResponse>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let mut cached: CachedResponse = serde_json::from_str(&contents)?;
    cached.from_cache = true;
    Ok(Some(cached))
}

/// Write a response to cache as JSON.
pub fn write_cached(path: &Path, response: &CachedResponse) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(response)?;

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Delete a cached file.
pub fn delete(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Delete the whole cache directory and all contents.
pub fn clear(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    Ok(())
}
