use crate::model::ScanReport;
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct FolderRow {
    #[tabled(rename = "Folder")]
    folder: String,
    #[tabled(rename = "Scanned")]
    scanned: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
    #[tabled(rename = "Kept")]
    kept: usize,
}

pub fn print_cli_table(report: &ScanReport) -> Result<()> {
    println!();

    if report.folders.is_empty() {
        println!("No input folders found.");
        return Ok(());
    }

    let rows: Vec<FolderRow> = report
        .folders
        .iter()
        .map(|f| FolderRow {
            folder: f.folder.clone(),
            scanned: f.scanned,
            skipped: f.skipped,
            kept: f.kept,
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);

    println!();
    print_summary(report);

    Ok(())
}

fn print_summary(report: &ScanReport) {
    println!("Summary:");
    println!("  Folders processed: {}", report.folders.len());

    let skipped = report.total_skipped();
    if skipped > 0 {
        println!(
            "  Records scanned: {} ({} files skipped)",
            report.total_scanned(),
            skipped
        );
    } else {
        println!("  Records scanned: {}", report.total_scanned());
    }

    println!("  Records kept: {}", report.total_kept());
}
