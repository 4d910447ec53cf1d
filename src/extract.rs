//! Extraction of matchable fields from parsed vulnerability documents.
//!
//! The identifier and affected-product list live at fixed nested paths in
//! the CVE v5 record layout. Lookups never fail: a missing or oddly shaped
//! level degrades to the `"N/A"` sentinel (or an empty product list) instead
//! of rejecting the document.

use crate::model::{ProductEntry, VulnRecord};
use serde_json::Value;
use std::path::Path;

/// Sentinel recorded for fields absent from the source document.
pub const UNKNOWN: &str = "N/A";

const ID_PATH: &str = "/cveMetadata/cveId";
const AFFECTED_PATH: &str = "/containers/cna/affected";

/// Reduces a parsed vulnerability document to the fields used for matching.
pub fn extract_record(doc: &Value, source_path: &Path) -> VulnRecord {
    let id = doc
        .pointer(ID_PATH)
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN);

    let products = doc
        .pointer(AFFECTED_PATH)
        .and_then(Value::as_array)
        .map(|entries| entries.iter().map(product_entry).collect())
        .unwrap_or_default();

    VulnRecord::new(id, products).with_source_path(source_path.to_path_buf())
}

fn product_entry(entry: &Value) -> ProductEntry {
    let product = entry
        .get("product")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN);
    let vendor = entry
        .get("vendor")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN);
    ProductEntry::new(product, vendor)
}
