use crate::config::ConfigOverrides;
use crate::models::ExclusionScope;
use crate::processors::PressureUnit;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "windprep")]
#[command(about = "Prepare hourly weather files for wind resource assessment")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors, hide progress"
    )]
    pub quiet: bool,

    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

/// Options shared by the commands that run the pipeline.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    #[arg(short, long, help = "Root folder with one subfolder per city")]
    pub input_dir: Option<PathBuf>,

    #[arg(short = 'z', long, help = "Target hub height in metres")]
    pub target_height: Option<f64>,

    #[arg(long, value_enum, help = "Native unit of the raw pressure column")]
    pub pressure_unit: Option<PressureUnit>,

    #[arg(long, value_enum, help = "Whether an exclusion reaches same-named files in other cities")]
    pub exclusion_scope: Option<ExclusionScope>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate, convert and extrapolate every city, then export CSV, SRW and logs
    Prepare {
        #[command(flatten)]
        pipeline: PipelineArgs,

        #[arg(short, long, help = "Root folder for prepared artifacts")]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Append alpha and coordinates to each log block")]
        log_details: bool,

        #[arg(long, help = "Write the exclusion report as JSON")]
        report: Option<PathBuf>,
    },

    /// Load and validate the input without writing anything
    Inspect {
        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Write monthly temperature and wind speed tables from prepared data
    Summarize {
        #[arg(short, long, help = "Root folder of prepared artifacts")]
        output_dir: Option<PathBuf>,
    },
}

impl PipelineArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            input_dir: self.input_dir.clone(),
            target_height: self.target_height,
            pressure_unit: self.pressure_unit,
            exclusion_scope: self.exclusion_scope,
            ..Default::default()
        }
    }
}
