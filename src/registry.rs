//! Loading of the package-registry snapshot.
//!
//! The on-disk shape depends on the active [`MatchPolicy`]: a flat list of
//! package objects for the exact policy, or a mapping from source link to
//! published package names for the membership policy. A snapshot that is
//! missing, unparseable, or the wrong shape is a recoverable condition: the
//! pipeline logs it and runs with matching disabled.

use crate::model::MatchPolicy;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// In-memory view of the registry snapshot.
#[derive(Debug, Clone)]
pub enum Registry {
    /// Flat list of package entries. Entries stay opaque; anything without
    /// string `name`/`author` fields simply never matches.
    Packages(Vec<Value>),
    /// Package names keyed by the source link they were published under.
    /// BTreeMap keeps match iteration order deterministic.
    NamesBySource(BTreeMap<String, Vec<String>>),
}

impl Registry {
    /// Loads the snapshot from `path` in the shape `policy` expects.
    pub fn load(path: &Path, policy: MatchPolicy) -> Result<Self, RegistryError> {
        let content = fs::read_to_string(path).map_err(|source| RegistryError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let value: Value =
            serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        Self::from_value(value, policy).ok_or_else(|| RegistryError::Shape {
            path: path.display().to_string(),
            policy,
        })
    }

    fn from_value(value: Value, policy: MatchPolicy) -> Option<Self> {
        match policy {
            MatchPolicy::Exact => match value {
                Value::Array(entries) => Some(Registry::Packages(entries)),
                _ => None,
            },
            MatchPolicy::Membership => serde_json::from_value(value)
                .ok()
                .map(Registry::NamesBySource),
        }
    }

    /// Number of top-level entries in the snapshot.
    pub fn len(&self) -> usize {
        match self {
            Registry::Packages(entries) => entries.len(),
            Registry::NamesBySource(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry snapshot {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("registry snapshot {path} is not valid JSON: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("registry snapshot {path} does not have the shape expected by the {policy} policy")]
    Shape { path: String, policy: MatchPolicy },
}
