// ABOUTME: Server version information from /_api/version.
// ABOUTME: Versions compare component-wise numerically, falling back to text.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A server version string such as `3.4.2` or `3.5.0-rc.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare two versions. Dot-separated numeric components compare as
    /// numbers; a pre-release suffix (`-...`) sorts before the release.
    pub fn compare(&self, other: &Version) -> Ordering {
        let (a_core, a_pre) = split_pre(&self.0);
        let (b_core, b_pre) = split_pre(&other.0);

        let mut a_parts = a_core.split('.');
        let mut b_parts = b_core.split('.');
        loop {
            match (a_parts.next(), b_parts.next()) {
                (None, None) => break,
                (a, b) => {
                    let a = a.unwrap_or("0");
                    let b = b.unwrap_or("0");
                    let ord = match (a.parse::<u64>(), b.parse::<u64>()) {
                        (Ok(x), Ok(y)) => x.cmp(&y),
                        _ => a.cmp(b),
                    };
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
            }
        }

        match (a_pre, b_pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

fn split_pre(v: &str) -> (&str, Option<&str>) {
    match v.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (v, None),
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VersionInfo {
    #[serde(default)]
    pub server: String,
    pub version: Version,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
}

impl VersionInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            server: "arango".to_string(),
            version: Version::new(version),
            license: None,
        }
    }
}
