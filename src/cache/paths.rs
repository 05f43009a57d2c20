// Cache path utilities.
// Maps request URLs onto files inside the response cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Get the base cache directory (~/.cache/pytest-plugin-list on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pytest-plugin-list").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding cached HTTP responses.
pub fn http_cache_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("http"))
}

/// Path to the cached response for a URL inside `dir`.
pub fn response_path(dir: &Path, url: &str) -> PathBuf {
    dir.join(format!("{}.json", sanitize_name(strip_scheme(url))))
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '&' | '=' => '_',
            _ => c,
        })
        .collect()
}
