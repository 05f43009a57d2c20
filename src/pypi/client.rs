// Package index HTTP client.
// Handles cached GET requests, conditional revalidation and status checking.

use std::time::Duration;

use chrono::Utc;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, HeaderMap, HeaderValue, IF_MODIFIED_SINCE, IF_NONE_MATCH, USER_AGENT},
};
use tracing::{debug, warn};

use crate::cache::{self, CachedResponse, STORED_HEADERS};
use crate::config::Config;
use crate::error::{PluginListError, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Index API client backed by the on-disk response cache.
pub struct IndexClient {
    client: Client,
    config: Config,
}

impl IndexClient {
    /// Create a new client for the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("pytest-plugin-list/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(PluginListError::Http)?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// GET a URL through the response cache.
    ///
    /// Without `refresh` a cached entry is returned as-is. With `refresh` the
    /// server is asked again, conditionally when the entry carries validators,
    /// and a `304 Not Modified` keeps the cached body.
    pub async fn get(&self, url: &str, accept: Option<&str>, refresh: bool) -> Result<CachedResponse> {
        let path = cache::response_path(&self.config.cache_dir, url);
        let cached = if self.config.use_cache {
            match cache::read_cached(&path) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(url, error = %e, "ignoring unreadable cache entry");
                    None
                }
            }
        } else {
            None
        };

        if !refresh {
            if let Some(entry) = cached {
                debug!(url, "cache hit");
                return Ok(entry);
            }
        }

        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        if let Some(entry) = &cached {
            if let Some(etag) = entry.header("etag") {
                request = request.header(IF_NONE_MATCH, etag);
            }
            if let Some(modified) = entry.header("last-modified") {
                request = request.header(IF_MODIFIED_SINCE, modified);
            }
        }

        let response = request.send().await.map_err(PluginListError::Http)?;

        if response.status() == StatusCode::NOT_MODIFIED {
            if let Some(mut entry) = cached {
                debug!(url, "not modified");
                entry.cached_at = Utc::now();
                cache::write_cached(&path, &entry)?;
                return Ok(entry);
            }
        }

        let fresh = into_cached(url, response).await?;
        debug!(url, status = fresh.status, "fetched");

        if self.config.use_cache {
            if fresh.status == StatusCode::OK.as_u16() {
                cache::write_cached(&path, &fresh)?;
            } else if cached.is_some() {
                cache::delete(&path)?;
            }
        }

        Ok(fresh)
    }
}

/// Convert a network response into the cacheable form.
async fn into_cached(url: &str, response: Response) -> Result<CachedResponse> {
    let mut entry = CachedResponse::new(url, response.status().as_u16(), String::new());
    for name in STORED_HEADERS {
        if let Some(value) = response.headers().get(*name).and_then(|v| v.to_str().ok()) {
            entry = entry.with_header(name, value);
        }
    }
    entry.body = response.text().await?;
    Ok(entry)
}

/// Check response status and convert errors.
pub fn check_response(response: &CachedResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        404 => Err(PluginListError::NotFound(response.url.clone())),
        status => Err(PluginListError::Status {
            url: response.url.clone(),
            status,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tempfile::TempDir;

    use super::*;
    use crate::pypi::mock::{reply, serve};

    fn client_for(base: &str, cache_dir: &Path, use_cache: bool) -> IndexClient {
        let config = Config::new(
            base,
            cache_dir.join("out.rst"),
            Some(cache_dir.join("http")),
            use_cache,
            Vec::new(),
        )
        .unwrap();
        IndexClient::new(config).unwrap()
    }

    #[test]
    fn test_check_response() {
        assert!(check_response(&CachedResponse::new("u", 200, "")).is_ok());
        assert!(matches!(
            check_response(&CachedResponse::new("u", 404, "")),
            Err(PluginListError::NotFound(_))
        ));
        assert!(matches!(
            check_response(&CachedResponse::new("u", 503, "")),
            Err(PluginListError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_cached_response_is_reused() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve(|_| reply("200 OK", &[("ETag", "\"v1\"")], "{\"n\": 1}")).await;
        let client = client_for(&server.base, temp_dir.path(), true);
        let url = format!("{}/pypi/pytest-a/json", server.base);

        let first = client.get(&url, None, false).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.header("etag"), Some("\"v1\""));

        let second = client.get(&url, None, false).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.body, first.body);
        assert_eq!(server.request_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_revalidates_with_etag() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve(|request| {
            if request.contains("if-none-match: \"v1\"") {
                reply("304 Not Modified", &[], "")
            } else {
                reply("200 OK", &[("ETag", "\"v1\"")], "original")
            }
        })
        .await;
        let client = client_for(&server.base, temp_dir.path(), true);
        let url = format!("{}/simple", server.base);

        client.get(&url, None, false).await.unwrap();
        let refreshed = client.get(&url, None, true).await.unwrap();

        assert_eq!(refreshed.status, 200);
        assert_eq!(refreshed.body, "original");
        assert_eq!(server.request_count(), 2);
    }

    #[tokio::test]
    async fn test_error_responses_are_not_cached() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve(|_| reply("404 Not Found", &[], "missing")).await;
        let client = client_for(&server.base, temp_dir.path(), true);
        let url = format!("{}/pypi/pytest-gone/json", server.base);

        let response = client.get(&url, None, false).await.unwrap();
        assert_eq!(response.status, 404);
        client.get(&url, None, false).await.unwrap();

        assert_eq!(server.request_count(), 2);
        let path = cache::response_path(&temp_dir.path().join("http"), &url);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_failed_refresh_drops_cached_entry() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let server = serve(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                reply("200 OK", &[], "{}")
            } else {
                reply("500 Internal Server Error", &[], "")
            }
        })
        .await;
        let client = client_for(&server.base, temp_dir.path(), true);
        let url = format!("{}/pypi/pytest-flaky/json", server.base);
        let path = cache::response_path(&temp_dir.path().join("http"), &url);

        client.get(&url, None, false).await.unwrap();
        assert!(path.exists());

        let refreshed = client.get(&url, None, true).await.unwrap();
        assert_eq!(refreshed.status, 500);
        assert!(!path.exists());
        assert!(matches!(
            check_response(&refreshed),
            Err(PluginListError::Status { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn test_not_modified_without_cache_entry_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve(|_| reply("304 Not Modified", &[], "")).await;
        let client = client_for(&server.base, temp_dir.path(), true);
        let url = format!("{}/simple", server.base);

        let response = client.get(&url, None, true).await.unwrap();
        assert_eq!(response.status, 304);
        assert!(matches!(
            check_response(&response),
            Err(PluginListError::Status { status: 304, .. })
        ));
        assert!(!cache::response_path(&temp_dir.path().join("http"), &url).exists());
    }

    #[tokio::test]
    async fn test_cache_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve(|_| reply("200 OK", &[], "{}")).await;
        let client = client_for(&server.base, temp_dir.path(), false);
        let url = format!("{}/simple", server.base);

        client.get(&url, None, false).await.unwrap();
        client.get(&url, None, false).await.unwrap();

        assert_eq!(server.request_count(), 2);
        assert!(!temp_dir.path().join("http").exists());
    }

    #[tokio::test]
    async fn test_accept_header_is_sent() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve(|_| reply("200 OK", &[], "{}")).await;
        let client = client_for(&server.base, temp_dir.path(), true);
        let url = format!("{}/simple", server.base);

        client
            .get(&url, Some("application/vnd.pypi.simple.v1+json"), true)
            .await
            .unwrap();

        let requests = server.requests();
        assert!(requests[0].contains("accept: application/vnd.pypi.simple.v1+json"));
    }
}
