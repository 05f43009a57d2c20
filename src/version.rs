// Release version parsing and ordering.
// Implements PEP 440 version syntax so release lists sort the way the index does.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?xi)
        ^\s*
        v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?P<pre>
            [-_.]?
            (?P<pre_l>alpha|a|beta|b|preview|pre|c|rc)
            [-_.]?
            (?P<pre_n>[0-9]+)?
        )?
        (?P<post>
            (?:-(?P<post_n1>[0-9]+))
            |
            (?:
                [-_.]?
                (?P<post_l>post|rev|r)
                [-_.]?
                (?P<post_n2>[0-9]+)?
            )
        )?
        (?P<dev>
            [-_.]?
            dev
            [-_.]?
            (?P<dev_n>[0-9]+)?
        )?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        \s*$",
    )
    .expect("version pattern is valid")
});

/// Pre-release phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreRelease {
    Alpha,
    Beta,
    Rc,
}

impl PreRelease {
    fn from_label(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreRelease::Alpha,
            "b" | "beta" => PreRelease::Beta,
            _ => PreRelease::Rc,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            PreRelease::Alpha => "a",
            PreRelease::Beta => "b",
            PreRelease::Rc => "rc",
        }
    }
}

/// One dot-separated part of a local version label.
///
/// Alphanumeric parts sort before numeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LocalPart {
    Text(String),
    Number(u64),
}

/// A parsed release version.
///
/// Equality follows ordering, so `1.0` and `1.0.0` compare equal.
#[derive(Debug, Clone)]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreRelease, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<Vec<LocalPart>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidVersion(pub String);

impl fmt::Display for InvalidVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid version: {:?}", self.0)
    }
}

impl std::error::Error for InvalidVersion {}

fn number(text: Option<regex::Match<'_>>) -> Result<Option<u64>, ()> {
    text.map(|m| m.as_str().parse::<u64>().map_err(|_| ()))
        .transpose()
}

impl FromStr for Version {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidVersion(s.to_string());
        let caps = VERSION_RE.captures(s).ok_or_else(invalid)?;

        let epoch = number(caps.name("epoch")).map_err(|_| invalid())?.unwrap_or(0);

        let release = caps["release"]
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        let pre = match caps.name("pre_l") {
            Some(label) => {
                let n = number(caps.name("pre_n")).map_err(|_| invalid())?.unwrap_or(0);
                Some((PreRelease::from_label(label.as_str()), n))
            }
            None => None,
        };

        let post = if caps.name("post").is_some() {
            let n = number(caps.name("post_n1").or_else(|| caps.name("post_n2")))
                .map_err(|_| invalid())?;
            Some(n.unwrap_or(0))
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            Some(number(caps.name("dev_n")).map_err(|_| invalid())?.unwrap_or(0))
        } else {
            None
        };

        let local = caps.name("local").map(|m| {
            m.as_str()
                .split(['-', '_', '.'])
                .map(|part| match part.parse::<u64>() {
                    Ok(n) if part.bytes().all(|b| b.is_ascii_digit()) => LocalPart::Number(n),
                    _ => LocalPart::Text(part.to_ascii_lowercase()),
                })
                .collect()
        });

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

impl Version {
    /// Parse a version string.
    pub fn parse(s: &str) -> Result<Self, InvalidVersion> {
        s.parse()
    }

    /// The key used for releases whose version string does not parse.
    pub fn fallback() -> Self {
        Version {
            epoch: 0,
            release: vec![0, 0, 0],
            pre: Some((PreRelease::Alpha, 0)),
            post: None,
            dev: None,
            local: None,
        }
    }

    fn sort_key(&self) -> SortKey<'_> {
        let mut release: &[u64] = &self.release;
        while let [rest @ .., 0] = release {
            release = rest;
        }

        let pre = match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => Bound::Min,
            (None, _, _) => Bound::Max,
            (Some(pre), _, _) => Bound::Value(pre),
        };
        let post = self.post.map_or(Bound::Min, Bound::Value);
        let dev = self.dev.map_or(Bound::Max, Bound::Value);
        let local = self.local.as_deref().map_or(Bound::Min, Bound::Value);

        SortKey {
            epoch: self.epoch,
            release,
            pre,
            post,
            dev,
            local,
        }
    }
}

/// Sort key for a version string as returned by the index API.
pub fn version_sort_key(version: &str) -> Version {
    Version::parse(version).unwrap_or_else(|_| Version::fallback())
}

/// A component that may be absent and then sorts before or after every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Bound<T> {
    Min,
    Value(T),
    Max,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey<'a> {
    epoch: u64,
    release: &'a [u64],
    pre: Bound<(PreRelease, u64)>,
    post: Bound<u64>,
    dev: Bound<u64>,
    local: Bound<&'a [LocalPart]>,
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((phase, n)) = self.pre {
            write!(f, "{}{}", phase.as_str(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if let Some(local) = &self.local {
            let parts: Vec<String> = local
                .iter()
                .map(|part| match part {
                    LocalPart::Text(s) => s.clone(),
                    LocalPart::Number(n) => n.to_string(),
                })
                .collect();
            write!(f, "+{}", parts.join("."))?;
        }
        Ok(())
    }
}
