use serde::Serialize;

/// Outcome of processing one input subfolder.
#[derive(Debug, Clone, Serialize)]
pub struct FolderOutcome {
    /// Subfolder name, mirrored under the output root.
    pub folder: String,
    /// Vulnerability files parsed successfully.
    pub scanned: usize,
    /// Files skipped because they were not valid JSON.
    pub skipped: usize,
    /// Records that survived filtering and were written out.
    pub kept: usize,
}

/// Aggregated outcomes for a whole run, one entry per input subfolder.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub folders: Vec<FolderOutcome>,
}

impl ScanReport {
    pub fn total_scanned(&self) -> usize {
        self.folders.iter().map(|f| f.scanned).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.folders.iter().map(|f| f.skipped).sum()
    }

    pub fn total_kept(&self) -> usize {
        self.folders.iter().map(|f| f.kept).sum()
    }
}
