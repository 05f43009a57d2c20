// Package index API response types.
// Defines structs for deserializing the simple index and per-project JSON.

use std::fmt;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;

/// Simple index listing (PEP 691 JSON form).
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleIndex {
    pub projects: Vec<SimpleProject>,
}

/// One project in the simple index.
#[derive(Debug, Clone, Deserialize)]
pub struct SimpleProject {
    pub name: String,
    #[serde(rename = "_last-serial")]
    pub last_serial: i64,
}

/// Per-project JSON metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectResponse {
    pub info: ProjectInfo,
    /// Version strings with the files uploaded for them, in response order.
    #[serde(default, deserialize_with = "ordered_releases")]
    pub releases: Vec<(String, Vec<ReleaseFile>)>,
}

/// Core metadata of the latest release.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub summary: Option<String>,
    #[serde(default)]
    pub classifiers: Vec<String>,
    pub requires_dist: Option<Vec<String>>,
}

/// A distribution file belonging to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseFile {
    pub upload_time_iso_8601: String,
}

/// Read the `releases` object as a list, keeping the order the index sent.
fn ordered_releases<'de, D>(deserializer: D) -> Result<Vec<(String, Vec<ReleaseFile>)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ReleasesVisitor;

    impl<'de> Visitor<'de> for ReleasesVisitor {
        type Value = Vec<(String, Vec<ReleaseFile>)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of version to release files")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut releases = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Vec<ReleaseFile>>()? {
                releases.push(entry);
            }
            Ok(releases)
        }
    }

    deserializer.deserialize_map(ReleasesVisitor)
}
