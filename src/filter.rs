//! Keep rules deciding which records survive into the output tree.

use crate::config::IgnoreConfig;
use crate::model::{MatchPolicy, VulnRecord};
use tracing::debug;

/// Applies the active policy's keep rule, then the ignore list.
///
/// Input order is preserved; the writer sorts later. Exact policy keeps
/// records with at least one non-empty match list; membership policy keeps
/// records naming `keyword` as product or vendor, compared
/// case-insensitively.
pub fn keep_records(
    records: Vec<VulnRecord>,
    policy: MatchPolicy,
    keyword: &str,
    ignore: &IgnoreConfig,
) -> Vec<VulnRecord> {
    let keyword = keyword.to_lowercase();

    records
        .into_iter()
        .filter(|record| match policy {
            MatchPolicy::Exact => record.has_matches(),
            MatchPolicy::Membership => record.products.iter().any(|p| {
                p.product.to_lowercase() == keyword || p.vendor.to_lowercase() == keyword
            }),
        })
        .filter(|record| {
            if ignore.should_ignore_record(&record.id) {
                debug!(id = %record.id, "record suppressed by ignore list");
                false
            } else {
                true
            }
        })
        .collect()
}
