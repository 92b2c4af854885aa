// RLM Log Reader - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Headless analysis of one log, or a batch of logs
// 4. eframe GUI launch when no input is given

mod gui;

// Re-export modules from the library crate so that `gui.rs` can use
// `crate::app::...`, `crate::ui::...` etc.
pub use rlm_log_reader::app;
pub use rlm_log_reader::core;
pub use rlm_log_reader::platform;
pub use rlm_log_reader::ui;
pub use rlm_log_reader::util;

use app::analysis::{validate_output_dir, AnalysisOptions, LogAnalysis, Publication};
use app::batch::{BatchOptions, BatchOutcome};
use clap::Parser;
use platform::config::AppConfig;
use std::path::{Path, PathBuf};

/// RLM Log Reader - license usage reports from RLM logs.
///
/// Reads an RLM report log or an ISV server log and writes a summary,
/// usage over time, and (for report logs) checkout durations. With no
/// input the window opens instead.
#[derive(Parser, Debug)]
#[command(name = "rlm-log-reader", version, about)]
struct Cli {
    /// Log file to analyse without opening the window.
    input: Option<PathBuf>,

    /// Directory the result files are written to.
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Also write <name>_AllEventData.txt.
    #[arg(short = 'e', long = "events")]
    events: bool,

    /// Overwrite existing result files.
    #[arg(short = 'f', long = "force")]
    force: bool,

    /// Analyse every matching log in DIR.
    #[arg(short = 'b', long = "batch", value_name = "DIR")]
    batch: Option<PathBuf>,

    /// Directory holding config.toml (defaults to the platform config directory).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Analyse one log and publish its results. Existing outputs are only
/// replaced with `--force`.
fn run_single(cli: &Cli, input: &Path, options: &AnalysisOptions) {
    let output_text = cli
        .output_dir
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let output_dir = validate_output_dir(&output_text).unwrap_or_else(|e| fail(e));

    let analysis = LogAnalysis::load(&input.to_string_lossy(), &output_dir, options)
        .unwrap_or_else(|e| fail(e));

    let publication = analysis
        .publish_unless_conflicting(cli.force)
        .unwrap_or_else(|e| fail(e));
    match &publication {
        Publication::Written(written) => {
            println!("{} ({})", input.display(), analysis.format());
            for path in written {
                println!("  {}", path.display());
            }
        }
        Publication::Refused(conflicts) => {
            eprintln!("The following files already exist (use --force to overwrite):");
            for path in conflicts {
                eprintln!("  {}", path.display());
            }
        }
    }

    let code = publication.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
}

/// Analyse every log in `dir`. Exits non-zero when any file failed.
fn run_batch(cli: &Cli, dir: &Path, config: &AppConfig, options: AnalysisOptions) {
    let output_dir = app::batch::resolve_output_dir(dir, cli.output_dir.as_deref());
    let batch_options = BatchOptions {
        analysis: options,
        ..BatchOptions::from(config)
    };

    let entries = app::batch::run_batch(dir, output_dir, &batch_options, cli.force)
        .unwrap_or_else(|e| fail(e));

    for entry in &entries {
        match &entry.outcome {
            BatchOutcome::Published(files) => {
                println!("published {} ({} files)", entry.input.display(), files.len());
            }
            BatchOutcome::Skipped(conflicts) => {
                println!(
                    "skipped   {} ({} existing files; use --force to overwrite)",
                    entry.input.display(),
                    conflicts.len()
                );
            }
            BatchOutcome::Failed(message) => {
                println!("failed    {}: {message}", entry.input.display());
            }
        }
    }
    let failures = entries
        .iter()
        .filter(|e| matches!(e.outcome, BatchOutcome::Failed(_)))
        .count();
    println!("{} file(s), {failures} failed", entries.len());

    let code = app::batch::exit_code(&entries);
    if code != 0 {
        std::process::exit(code);
    }
}

fn run_gui(config: &AppConfig, data_dir: &Path, warnings: Vec<String>) {
    let settings_path = app::settings::settings_path(data_dir);
    let state = app::state::AppState::new(config, Some(settings_path), warnings);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size(ui::theme::WINDOW_SIZE)
            .with_min_inner_size(ui::theme::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::RlmLogReaderApp::new(state)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        fail(format!("Failed to launch {} GUI: {e}", util::constants::APP_NAME));
    }
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .clone()
        .unwrap_or_else(|| platform_paths.config_dir.clone());
    let (config, warnings) = platform::config::load_config(&config_dir);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_dir.display(),
        "RLM Log Reader starting"
    );
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    let mut options = AnalysisOptions::from(&config);
    if cli.events {
        options.write_event_data = true;
    }

    if let Some(dir) = cli.batch.as_deref() {
        run_batch(&cli, dir, &config, options);
    } else if let Some(input) = cli.input.as_deref() {
        run_single(&cli, input, &options);
    } else {
        run_gui(&config, &platform_paths.data_dir, warnings);
    }
}
