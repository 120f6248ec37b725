use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use wardrive_rs::api::{
    AggregateCount, Diagnostic, FieldSelector, ScanEngine, ScanEngineConfig,
    routes_to_json_contract_v1_pretty,
};
use wardrive_rs::telemetry;

// Diagnostics are already echoed to stderr; library warnings would repeat them.
const DEFAULT_LOG_FILTER: &str = "error";

#[derive(Parser)]
#[command(name = "wardrive")]
#[command(about = "Normalize, summarize and map wireless scan capture exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write `<stem>-cleaned.json` copies of every capture file
    Clean {
        input_dir: PathBuf,
        output_dir: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Category counts and map center for a capture directory
    Summary {
        dir: PathBuf,
        /// Print the full report as a versioned JSON document
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        overrides: Overrides,
    },

    /// Jump-filtered route per capture file, as JSON
    Routes {
        dir: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
    },
}

#[derive(Args)]
struct Overrides {
    /// Load a scan config JSON; the positional directory still wins
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only collect files whose name starts with this prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Capture file extension, without the dot
    #[arg(long)]
    extension: Option<String>,

    /// Largest accepted step between consecutive route points
    #[arg(long)]
    jump_threshold_km: Option<f64>,
}

impl Overrides {
    fn engine(&self, dir: &Path) -> Result<ScanEngine, String> {
        let mut config = match &self.config {
            Some(path) => {
                let mut loaded = ScanEngineConfig::load(path).map_err(|err| err.to_string())?;
                loaded.input_dir = dir.to_path_buf();
                loaded
            }
            None => ScanEngineConfig::new(dir),
        };
        if let Some(prefix) = &self.prefix {
            config = config.with_file_prefix(prefix.clone());
        }
        if let Some(extension) = &self.extension {
            config = config.with_extension(extension.clone());
        }
        if let Some(threshold_km) = self.jump_threshold_km {
            config = config.with_jump_threshold_km(threshold_km);
        }
        ScanEngine::new(config).map_err(|err| err.to_string())
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = telemetry::init_default_tracing(DEFAULT_LOG_FILTER);
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean {
            input_dir,
            output_dir,
            overrides,
        } => {
            let engine = overrides.engine(&input_dir)?;
            let written = engine
                .write_cleaned(&output_dir)
                .map_err(|err| err.to_string())?;
            for file in &written {
                println!(
                    "{} -> {} ({} records)",
                    file.source.display(),
                    file.output.display(),
                    file.records
                );
            }
            println!("cleaned {} file(s)", written.len());
        }
        Commands::Summary {
            dir,
            json,
            overrides,
        } => {
            let engine = overrides.engine(&dir)?;
            let report = engine.run().map_err(|err| err.to_string())?;
            if json {
                let payload = report
                    .to_json_contract_v1_pretty()
                    .map_err(|err| err.to_string())?;
                println!("{payload}");
                return Ok(());
            }
            report.require_records().map_err(|err| err.to_string())?;
            println!(
                "{} file(s), {} entries, {} records",
                report.files_scanned,
                report.entries_seen,
                report.records.len()
            );
            for selector in FieldSelector::ALL {
                print_counts(selector, report.aggregates.get(selector));
            }
            match report.require_spatial() {
                Ok(spatial) => println!(
                    "map center: {:.6}, {:.6} ({} markers)",
                    spatial.map_center.latitude,
                    spatial.map_center.longitude,
                    spatial.markers.len()
                ),
                Err(err) => println!("map center: {err}"),
            }
            print_diagnostics(&report.diagnostics);
        }
        Commands::Routes { dir, overrides } => {
            let engine = overrides.engine(&dir)?;
            let (routes, diagnostics) = engine.routes().map_err(|err| err.to_string())?;
            let payload =
                routes_to_json_contract_v1_pretty(&routes).map_err(|err| err.to_string())?;
            println!("{payload}");
            print_diagnostics(&diagnostics);
        }
    }
    Ok(())
}

fn print_counts(selector: FieldSelector, counts: &AggregateCount) {
    println!("{selector:?}:");
    for (label, count) in counts {
        println!("  {label:<24} {count}");
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("warning: {diagnostic}");
    }
}
