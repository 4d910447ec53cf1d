//! Serialization of kept records and copying of their source files.

use crate::model::VulnRecord;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Summary file written into every output subfolder.
pub const SUMMARY_FILE: &str = "report.json";

/// Sorts records ascending by identifier.
///
/// Plain lexicographic comparison on the id string; the sort is stable, so
/// records sharing an identifier keep their input order.
pub fn sort_records(records: &mut [VulnRecord]) {
    records.sort_by(|a, b| a.id.cmp(&b.id));
}

/// Writes the summary JSON for one output subfolder.
///
/// The file is written even when `records` is empty, and the directory is
/// created on demand.
pub fn write_summary(records: &[VulnRecord], out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    let path = out_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(records)?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write summary: {}", path.display()))?;

    Ok(path)
}

/// Copies every kept record's originating source file into `out_dir`.
///
/// Each record carries its own source path, so the copied set always equals
/// the serialized set.
pub fn copy_sources(records: &[VulnRecord], out_dir: &Path) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

    for record in records {
        let Some(file_name) = record.source_path.file_name() else {
            continue;
        };
        fs::copy(&record.source_path, out_dir.join(file_name)).with_context(|| {
            format!(
                "Failed to copy source file: {}",
                record.source_path.display()
            )
        })?;
    }

    Ok(())
}
