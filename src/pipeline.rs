//! Orchestration of a whole correlation run.
//!
//! The input root is expected to hold one subfolder per record group (the
//! CVE list lays records out as `cves/<year>/<id-range>/CVE-*.json`; cvesift
//! processes one year at a time, so the root's immediate subfolders are the
//! id-range groups). Each subfolder is processed fully before the next, and
//! a failure confined to one file or to the registry never aborts the run.

use crate::config::Config;
use crate::extract::extract_record;
use crate::filter::keep_records;
use crate::matcher::attach_matches;
use crate::model::{FolderOutcome, ScanReport, VulnRecord};
use crate::registry::Registry;
use crate::writer;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Runs the full pipeline over every input subfolder.
pub fn run(config: &Config) -> Result<ScanReport> {
    let registry = load_registry(config);

    let mut report = ScanReport::default();
    for folder in input_folders(&config.cve_dir)? {
        let outcome = process_folder(&folder, registry.as_ref(), config)?;
        report.folders.push(outcome);
    }

    Ok(report)
}

/// Loads the registry snapshot, or returns `None` with a diagnostic when it
/// is missing, unparseable, or the wrong shape. Matching is disabled for the
/// whole run in that case; every record reports zero matches.
pub fn load_registry(config: &Config) -> Option<Registry> {
    match Registry::load(&config.registry_path, config.policy) {
        Ok(registry) => {
            info!(
                entries = registry.len(),
                path = %config.registry_path.display(),
                "loaded registry snapshot"
            );
            Some(registry)
        }
        Err(e) => {
            warn!("running without registry matches: {}", e);
            None
        }
    }
}

/// Immediate subfolders of the input root, ascending by name.
pub fn input_folders(base: &Path) -> Result<Vec<PathBuf>> {
    let mut folders = Vec::new();
    for entry in WalkDir::new(base)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("Failed to read input root: {}", base.display()))?;
        if entry.file_type().is_dir() {
            folders.push(entry.into_path());
        }
    }
    Ok(folders)
}

/// Processes one input subfolder: parse, extract, match, filter, write.
pub fn process_folder(
    folder: &Path,
    registry: Option<&Registry>,
    config: &Config,
) -> Result<FolderOutcome> {
    let folder_name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let out_dir = config.output_dir.join(&folder_name);

    let (mut records, skipped) = parse_folder(folder)?;
    let scanned = records.len();

    if let Some(registry) = registry {
        attach_matches(&mut records, registry);
    }

    let mut kept = keep_records(records, config.policy, &config.vendor_keyword, &config.ignore);
    writer::sort_records(&mut kept);
    writer::write_summary(&kept, &out_dir)?;
    writer::copy_sources(&kept, &out_dir)?;

    info!(
        folder = %folder_name,
        scanned,
        skipped,
        kept = kept.len(),
        "processed folder"
    );

    Ok(FolderOutcome {
        folder: folder_name,
        scanned,
        skipped,
        kept: kept.len(),
    })
}

/// Parses every `.json` file in the folder, ascending by name. Files that
/// are not valid JSON are counted and skipped; they never abort the folder.
fn parse_folder(folder: &Path) -> Result<(Vec<VulnRecord>, usize)> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry =
            entry.with_context(|| format!("Failed to read folder: {}", folder.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map(|e| e != "json").unwrap_or(true) {
            continue;
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        match serde_json::from_str(&content) {
            Ok(doc) => records.push(extract_record(&doc, path)),
            Err(e) => {
                warn!(file = %path.display(), "skipping file with invalid JSON: {}", e);
                skipped += 1;
            }
        }
    }

    Ok((records, skipped))
}
