// Package index endpoint functions.
// Typed access to the simple listing and per-project JSON metadata.

use tracing::debug;

use crate::error::{PluginListError, Result};

use super::client::{IndexClient, check_response};
use super::types::{ProjectResponse, SimpleIndex, SimpleProject};

/// Content type of the JSON form of the simple index.
pub const SIMPLE_JSON: &str = "application/vnd.pypi.simple.v1+json";

/// Header carrying the project's last change serial.
pub const LAST_SERIAL_HEADER: &str = "x-pypi-last-serial";

impl IndexClient {
    /// List plugin projects with their last serials, in index order.
    ///
    /// The listing itself is always revalidated so new projects show up.
    pub async fn plugin_projects(&self) -> Result<Vec<SimpleProject>> {
        let url = self.config().simple_url();
        let response = self.get(&url, Some(SIMPLE_JSON), true).await?;
        check_response(&response)?;

        let index: SimpleIndex = response.json()?;
        let total = index.projects.len();
        let plugins: Vec<SimpleProject> = index
            .projects
            .into_iter()
            .filter(|p| self.config().is_plugin_name(&p.name))
            .collect();

        debug!(total, plugins = plugins.len(), "filtered simple index");
        Ok(plugins)
    }

    /// Fetch a project's metadata, refreshing the cached copy when the
    /// index reports a newer serial.
    ///
    /// Returns `None` when the JSON API has no page for the project.
    pub async fn project(&self, name: &str, last_serial: i64) -> Result<Option<ProjectResponse>> {
        let url = self.config().project_url(name);
        let mut response = self.get(&url, None, false).await?;

        if response_serial(response.header(LAST_SERIAL_HEADER)) != last_serial {
            debug!(name, last_serial, "serial mismatch, refreshing");
            response = self.get(&url, None, true).await?;
        }

        match check_response(&response) {
            Ok(()) => Ok(Some(response.json()?)),
            Err(PluginListError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Parse a serial header value; missing or malformed values become -1.
fn response_serial(value: Option<&str>) -> i64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(-1)
}
