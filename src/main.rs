use anyhow::Result;
use clap::{Parser, Subcommand};
use cvesift::{
    config::Config,
    model::ScanReport,
    output::{print_report, OutputFormat},
    pipeline,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit codes for CI integration
mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "cvesift")]
#[command(
    author,
    version,
    about = "Match CVE records against a package registry snapshot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate vulnerability records and write matched results
    Scan {
        /// Directory whose subfolders contain CVE JSON files
        #[arg(long)]
        cves: Option<PathBuf>,

        /// Registry snapshot JSON file
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Output root directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Match policy (exact, membership)
        #[arg(long)]
        policy: Option<String>,

        /// Vendor keyword for the membership policy's keep rule
        #[arg(long)]
        keyword: Option<String>,

        /// Output format for the run report (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cvesift=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            cves,
            registry,
            output,
            policy,
            keyword,
            format,
        } => {
            let mut config = Config::load().unwrap_or_default();

            if let Some(dir) = cves {
                config.cve_dir = dir;
            }
            if let Some(path) = registry {
                config.registry_path = path;
            }
            if let Some(dir) = output {
                config.output_dir = dir;
            }
            if let Some(policy) = policy {
                config.policy = policy.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            }
            if let Some(keyword) = keyword {
                config.vendor_keyword = keyword;
            }

            let format_str = format.unwrap_or_else(|| config.default_format.clone());
            run_scan(config, format_str)
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
            Ok(exit_codes::SUCCESS)
        }
    }
}

fn run_scan(config: Config, format: String) -> Result<u8> {
    let format = OutputFormat::from_str(&format).map_err(|e| anyhow::anyhow!(e))?;
    let is_interactive = format == OutputFormat::Table;

    let registry = pipeline::load_registry(&config);
    let folders = pipeline::input_folders(&config.cve_dir)?;

    let progress = if is_interactive {
        let pb = ProgressBar::new(folders.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let mut report = ScanReport::default();
    for folder in &folders {
        if let Some(ref pb) = progress {
            pb.set_message(format!(
                "Processing {}...",
                folder.file_name().unwrap_or_default().to_string_lossy()
            ));
        }

        let outcome = pipeline::process_folder(folder, registry.as_ref(), &config)?;
        report.folders.push(outcome);

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_with_message(format!("Kept {} records", report.total_kept()));
    }

    print_report(&report, format)?;

    Ok(exit_codes::SUCCESS)
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    // Show current config
    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'cvesift config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}
