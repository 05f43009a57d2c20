// Generation run.
// Drives one fetch, filter, render and write pass over the package index.

use std::path::PathBuf;
use std::time::Instant;

use tracing::info;

use crate::cache;
use crate::config::Config;
use crate::error::Result;
use crate::plugin::collect_plugins;
use crate::pypi::IndexClient;
use crate::render::{render_document, write_document};

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of plugins written to the page.
    pub plugins: usize,
    /// Where the page was written.
    pub output: PathBuf,
}

/// One plugin list generation.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Remove every cached response.
    pub fn clear_cache(&self) -> Result<()> {
        info!(dir = %self.config.cache_dir.display(), "clearing response cache");
        cache::clear(&self.config.cache_dir)
    }

    /// Fetch all plugins and write the page.
    pub async fn run(self) -> Result<RunSummary> {
        let started = Instant::now();
        let output = self.config.output.clone();
        info!(
            index = %self.config.index_url,
            cache = %self.config.cache_dir.display(),
            use_cache = self.config.use_cache,
            "starting plugin list generation"
        );

        let client = IndexClient::new(self.config)?;
        let plugins = collect_plugins(&client).await?;

        let page = render_document(&plugins);
        write_document(&output, &page)?;

        info!(
            plugins = plugins.len(),
            output = %output.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "wrote plugin list"
        );

        Ok(RunSummary {
            plugins: plugins.len(),
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::pypi::mock::{reply, request_path, serve};

    #[tokio::test]
    async fn test_run_writes_page() {
        let temp_dir = TempDir::new().unwrap();
        let server = serve(|request| {
            if request_path(request) == "/simple" {
                reply(
                    "200 OK",
                    &[],
                    r#"{"projects": [{"name": "nuts", "_last-serial": 5}]}"#,
                )
            } else {
                reply(
                    "200 OK",
                    &[("X-PyPI-Last-Serial", "5")],
                    r#"{"info": {"name": "nuts", "summary": "Network tests",
                        "classifiers": [], "requires_dist": ["pytest (>=7)"]},
                       "releases": {"3.0": [{"upload_time_iso_8601": "2024-02-29T09:00:00Z"}]}}"#,
                )
            }
        })
        .await;

        let output = temp_dir.path().join("doc").join("plugin_list.rst");
        let config = Config::new(
            &server.base,
            output.clone(),
            Some(temp_dir.path().join("http")),
            true,
            Vec::new(),
        )
        .unwrap();

        let summary = App::new(config).run().await.unwrap();
        assert_eq!(summary.plugins, 1);
        assert_eq!(summary.output, output);

        let page = fs::read_to_string(&output).unwrap();
        assert!(page.contains("This list contains 1 plugins."));
        assert!(page.contains(":pypi:`nuts`"));
        assert!(page.contains("Feb 29, 2024"));
        assert!(page.contains("pytest (>=7)"));
    }

    #[test]
    fn test_clear_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache_dir = temp_dir.path().join("http");
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(cache_dir.join("entry.json"), "{}").unwrap();

        let config = Config::new(
            "https://pypi.org",
            temp_dir.path().join("out.rst"),
            Some(cache_dir.clone()),
            true,
            Vec::new(),
        )
        .unwrap();

        App::new(config).clear_cache().unwrap();
        assert!(!cache_dir.exists());
    }
}
