use crate::cli::args::{Cli, Commands};
use crate::config::{ConfigOverrides, PipelineConfig};
use crate::processors::{Pipeline, PipelineOutput};
use crate::utils::constants::TIME_FORMAT_COMPLETE;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ExportSettings, Exporter, SummaryWriter};
use anyhow::{Context, Result};
use chrono::Local;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli);
    info!(
        "Program execution started at {}",
        Local::now().format(TIME_FORMAT_COMPLETE)
    );

    let config_file = cli.config.as_deref();
    let silent = cli.quiet;

    match cli.command {
        Commands::Prepare {
            pipeline,
            output_dir,
            log_details,
            report,
        } => {
            let overrides = ConfigOverrides {
                output_dir,
                log_details: log_details.then_some(true),
                ..pipeline.overrides()
            };
            let config = load_config(config_file, &overrides)?;
            prepare(config, report.as_deref(), silent)?;
        }

        Commands::Inspect { pipeline } => {
            let config = load_config(config_file, &pipeline.overrides())?;
            let mut output = run_pipeline(config)?;
            output.report.files_exported = output.file_count();
            println!("\n{}", output.report.summary());
        }

        Commands::Summarize { output_dir } => {
            let output_dir = match output_dir {
                Some(dir) => dir,
                None => summary_root(config_file)?,
            };
            summarize(&output_dir, silent)?;
        }
    }

    info!(
        "Program execution ended at {}",
        Local::now().format(TIME_FORMAT_COMPLETE)
    );
    Ok(())
}

fn prepare(config: PipelineConfig, report_path: Option<&Path>, silent: bool) -> Result<()> {
    let exporter = Exporter::new(ExportSettings::from(&config));
    let mut output = run_pipeline(config)?;

    let progress = ProgressReporter::new(
        output.tables.len() as u64,
        "Exporting prepared data...",
        silent,
    );
    let exported = exporter
        .export_all(&output, &progress)
        .with_context(|| format!("Failed to export to {}", exporter.output_dir().display()))?;
    output.report.files_exported = exported.files;

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&output.report)?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Exclusion report written to {}", path.display());
    }

    println!("\n{}", output.report.summary());
    Ok(())
}

fn summarize(output_dir: &Path, silent: bool) -> Result<()> {
    let progress = ProgressReporter::new_spinner("Summarizing prepared data...", silent);
    let cities = SummaryWriter::new(output_dir)
        .write_all(&progress)
        .with_context(|| format!("Failed to summarize {}", output_dir.display()))?;
    info!("Monthly summaries written for {} cities", cities);
    Ok(())
}

fn load_config(config_file: Option<&Path>, overrides: &ConfigOverrides) -> Result<PipelineConfig> {
    let config = PipelineConfig::load(config_file, overrides).context("Invalid configuration")?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

fn run_pipeline(config: PipelineConfig) -> Result<PipelineOutput> {
    let input_dir = config.input_dir.clone();
    Pipeline::new(config)
        .prepare()
        .with_context(|| format!("Failed to prepare {}", input_dir.display()))
}

/// Output folder from the configuration layers. Summaries need no target
/// height, so the run parameters are not validated.
fn summary_root(config_file: Option<&Path>) -> Result<PathBuf> {
    let config = PipelineConfig::layered(config_file, &ConfigOverrides::default())
        .context("Invalid configuration")?;
    Ok(config.output_dir)
}

/// Diagnostic lines share standard output with the report.
fn diagnostics_writer() -> fn() -> io::Stdout {
    io::stdout
}

/// Set up structured logging based on CLI arguments
fn setup_logging(cli: &Cli) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("windprep={}", log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(diagnostics_writer());

    let result = if cli.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.compact())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(layer.with_timer(fmt::time::uptime()))
            .try_init()
    };

    if result.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}
