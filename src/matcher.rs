//! Correlation of product entries against the registry snapshot.

use crate::model::{ProductEntry, VulnRecord};
use crate::registry::Registry;
use serde_json::Value;

/// Attaches registry matches to every product entry, in place.
///
/// Records are left untouched apart from their match lists; callers that
/// could not load a registry simply skip this step and every list stays
/// empty.
pub fn attach_matches(records: &mut [VulnRecord], registry: &Registry) {
    for record in records.iter_mut() {
        for entry in record.products.iter_mut() {
            entry.matches = find_matches(entry, registry);
        }
    }
}

/// Registry entries matching a single product entry.
///
/// Exact policy: an entry matches when its `name` equals the product and its
/// `author` equals the vendor, both case-sensitively. Entries that are not
/// objects, or whose fields are absent or non-string, never match. The full
/// entry object is recorded.
///
/// Membership policy: the product matches once per name list containing it
/// as an exact element, vendor ignored. The product name itself is recorded
/// per containing list.
pub fn find_matches(entry: &ProductEntry, registry: &Registry) -> Vec<Value> {
    match registry {
        Registry::Packages(packages) => packages
            .iter()
            .filter(|pkg| {
                pkg.get("name").and_then(Value::as_str) == Some(entry.product.as_str())
                    && pkg.get("author").and_then(Value::as_str) == Some(entry.vendor.as_str())
            })
            .cloned()
            .collect(),
        Registry::NamesBySource(map) => map
            .values()
            .filter(|names| names.iter().any(|name| *name == entry.product))
            .map(|_| Value::String(entry.product.clone()))
            .collect(),
    }
}
