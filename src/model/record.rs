use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// One affected product/vendor pair from a vulnerability record.
///
/// Matches start out empty and are attached in place by the matcher. Under
/// the exact policy a match is the full registry entry object; under the
/// membership policy it is the product name string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product: String,
    pub vendor: String,
    #[serde(default)]
    pub matches: Vec<Value>,
}

impl ProductEntry {
    pub fn new(product: impl Into<String>, vendor: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            vendor: vendor.into(),
            matches: Vec::new(),
        }
    }

    pub fn with_matches(mut self, matches: Vec<Value>) -> Self {
        self.matches = matches;
        self
    }
}

/// A vulnerability record reduced to the fields the pipeline correlates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VulnRecord {
    pub id: String,
    pub products: Vec<ProductEntry>,
    /// File this record was parsed from. Used when copying kept records into
    /// the output tree; not part of the serialized summary.
    #[serde(skip)]
    pub source_path: PathBuf,
}

impl VulnRecord {
    pub fn new(id: impl Into<String>, products: Vec<ProductEntry>) -> Self {
        Self {
            id: id.into(),
            products,
            source_path: PathBuf::new(),
        }
    }

    pub fn with_source_path(mut self, path: PathBuf) -> Self {
        self.source_path = path;
        self
    }

    /// True if any product entry carries at least one registry match.
    pub fn has_matches(&self) -> bool {
        self.products.iter().any(|p| !p.matches.is_empty())
    }
}
