// Plugin extraction and filtering.
// Turns per-project index metadata into the rows shown on the plugin list page.

use std::cmp::Reverse;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info};

use crate::error::{PluginListError, Result};
use crate::pypi::{IndexClient, ProjectResponse, ReleaseFile};
use crate::version::version_sort_key;

/// Development status classifiers, in the order they are checked.
pub const DEVELOPMENT_STATUS_CLASSIFIERS: &[&str] = &[
    "Development Status :: 1 - Planning",
    "Development Status :: 2 - Pre-Alpha",
    "Development Status :: 3 - Alpha",
    "Development Status :: 4 - Beta",
    "Development Status :: 5 - Production/Stable",
    "Development Status :: 6 - Mature",
    "Development Status :: 7 - Inactive",
];

pub const INACTIVE_CLASSIFIER: &str = "Development Status :: 7 - Inactive";

const STATUS_PREFIX: &str = "Development Status :: ";
const NOT_AVAILABLE: &str = "N/A";
const PROGRESS_EVERY: usize = 250;

static TRAILING_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\b").expect("underscore pattern is valid"));

/// One row of the plugin list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginInfo {
    pub name: String,
    pub summary: String,
    pub last_release: String,
    pub status: String,
    pub requires: String,
}

impl PluginInfo {
    /// Column headers, in table order.
    pub const HEADERS: [&'static str; 5] = ["name", "summary", "last_release", "status", "requires"];

    /// Cell values, in table order.
    pub fn cells(&self) -> [&str; 5] {
        [
            self.name.as_str(),
            self.summary.as_str(),
            self.last_release.as_str(),
            self.status.as_str(),
            self.requires.as_str(),
        ]
    }

    /// Build a row from project metadata; inactive projects yield `None`.
    pub fn from_project(project: &ProjectResponse) -> Result<Option<Self>> {
        let info = &project.info;
        if info.classifiers.iter().any(|c| c == INACTIVE_CLASSIFIER) {
            return Ok(None);
        }

        let summary = info
            .summary
            .as_deref()
            .map(|s| escape_rst(&s.replace('\n', "")))
            .unwrap_or_default();

        Ok(Some(PluginInfo {
            name: format!(":pypi:`{}`", info.name),
            summary: summary.trim().to_string(),
            last_release: last_release(project)?.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            status: development_status(&info.classifiers),
            requires: pytest_requirement(info.requires_dist.as_deref().unwrap_or_default()),
        }))
    }
}

/// Rudimentary escaping so text renders literally in reStructuredText.
pub fn escape_rst(text: &str) -> String {
    let escaped = text
        .replace('*', "\\*")
        .replace('<', "\\<")
        .replace('>', "\\>")
        .replace('`', "\\`");
    TRAILING_UNDERSCORE.replace_all(&escaped, "").into_owned()
}

/// The first development status classifier present, without its prefix.
pub fn development_status(classifiers: &[String]) -> String {
    DEVELOPMENT_STATUS_CLASSIFIERS
        .iter()
        .find(|status| classifiers.iter().any(|c| c == *status))
        .map(|status| status[STATUS_PREFIX.len()..].to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// The first requirement on pytest itself (not on `pytest-foo` or `pytest.bar`).
pub fn pytest_requirement(requires_dist: &[String]) -> String {
    requires_dist
        .iter()
        .find(|req| is_pytest_requirement(req))
        .cloned()
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn is_pytest_requirement(requirement: &str) -> bool {
    match requirement.strip_prefix("pytest") {
        Some(rest) => !rest
            .chars()
            .next()
            .is_some_and(|c| c == '-' || c == '.' || c == '_' || c.is_alphanumeric()),
        None => false,
    }
}

/// Upload date of the newest release that has files, formatted `Mon DD, YYYY`.
///
/// Releases with equal versions keep the order the index listed them in.
pub fn last_release(project: &ProjectResponse) -> Result<Option<String>> {
    let mut releases: Vec<&(String, Vec<ReleaseFile>)> = project.releases.iter().collect();
    releases.sort_by_cached_key(|(version, _)| Reverse(version_sort_key(version)));

    let newest = releases.into_iter().find_map(|(_, files)| files.last());
    match newest {
        Some(file) => format_upload_date(&file.upload_time_iso_8601).map(Some),
        None => Ok(None),
    }
}

fn format_upload_date(upload_time: &str) -> Result<String> {
    let day = upload_time.split('T').next().unwrap_or_default();
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|_| PluginListError::InvalidDate(upload_time.to_string()))?;
    Ok(date.format("%b %d, %Y").to_string())
}

/// Fetch every plugin project and collect the active ones, in index order.
pub async fn collect_plugins(client: &IndexClient) -> Result<Vec<PluginInfo>> {
    let projects = client.plugin_projects().await?;
    let total = projects.len();
    info!(total, "found plugin projects");

    let mut plugins = Vec::with_capacity(total);
    for (index, project) in projects.iter().enumerate() {
        if index > 0 && index % PROGRESS_EVERY == 0 {
            info!(done = index, total, "fetching project metadata");
        }

        let Some(response) = client.project(&project.name, project.last_serial).await? else {
            debug!(name = %project.name, "not available on the JSON API, skipping");
            continue;
        };

        match PluginInfo::from_project(&response)? {
            Some(plugin) => plugins.push(plugin),
            None => debug!(name = %project.name, "inactive, skipping"),
        }
    }

    info!(plugins = plugins.len(), "collected plugins");
    Ok(plugins)
}
