// Runtime configuration.
// Collects index location, output path and cache settings for a run.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::cache;
use crate::error::{PluginListError, Result};

pub const DEFAULT_INDEX_URL: &str = "https://pypi.org";
pub const DEFAULT_OUTPUT: &str = "doc/en/reference/plugin_list.rst";

/// Projects listed as plugins even though their names lack the `pytest` prefix.
pub const ADDITIONAL_PROJECTS: &[&str] = &[
    "logassert",
    "logot",
    "nuts",
    "flask_fixture",
    "databricks-labs-pytester",
];

/// Settings for one generation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the package index, without trailing slash.
    pub index_url: String,
    /// Where the rendered page is written.
    pub output: PathBuf,
    /// Directory holding cached responses.
    pub cache_dir: PathBuf,
    /// Whether cached responses may be reused and new ones stored.
    pub use_cache: bool,
    /// Extra project names treated as plugins.
    pub additional_projects: BTreeSet<String>,
}

impl Config {
    /// Build a config, falling back to the platform cache dir when none is given.
    pub fn new(
        index_url: &str,
        output: PathBuf,
        cache_dir: Option<PathBuf>,
        use_cache: bool,
        extra_projects: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => cache::http_cache_dir().ok_or(PluginListError::NoCacheDir)?,
        };

        let mut additional_projects: BTreeSet<String> =
            ADDITIONAL_PROJECTS.iter().map(|s| s.to_string()).collect();
        additional_projects.extend(extra_projects);

        Ok(Self {
            index_url: index_url.trim_end_matches('/').to_string(),
            output,
            cache_dir,
            use_cache,
            additional_projects,
        })
    }

    /// URL of the simple project listing.
    pub fn simple_url(&self) -> String {
        format!("{}/simple", self.index_url)
    }

    /// URL of a project's JSON metadata.
    pub fn project_url(&self, name: &str) -> String {
        format!("{}/pypi/{}/json", self.index_url, name)
    }

    /// Whether a project name qualifies as a plugin.
    pub fn is_plugin_name(&self, name: &str) -> bool {
        name.starts_with("pytest-")
            || name.starts_with("pytest_")
            || self.additional_projects.contains(name)
    }
}
