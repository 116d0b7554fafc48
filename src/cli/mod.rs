use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use ssss_pdsp::table::TableFormat;

mod depo_summary;
mod frame_summary;
mod log_summary;
mod plots;

mod config;

/// ssss-pdsp - simulated signal vs. sim+sigproc signal diagnostics
#[derive(Parser)]
#[command(name = "ssss-pdsp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format of the summary tables.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum FormatArg {
    /// Org-mode table, ready to paste into a report
    #[default]
    Org,
    /// Comma separated values
    Csv,
    /// JSON document
    Json,
}

impl From<FormatArg> for TableFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Org => TableFormat::Org,
            FormatArg::Csv => TableFormat::Csv,
            FormatArg::Json => TableFormat::Json,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the sensitive volume diagonal found in a job log
    LogSummary {
        /// Job log file
        #[arg(value_name = "LOG")]
        log: PathBuf,

        /// Table format
        #[arg(short, long, default_value = "org", value_enum)]
        format: FormatArg,
    },

    /// Print time and drift coordinate ranges of two depo files
    DepoSummary {
        /// Depos before drifting
        #[arg(value_name = "DEPOS")]
        depos: PathBuf,

        /// Depos after drifting
        #[arg(value_name = "DRIFT")]
        drift: PathBuf,

        /// Table format
        #[arg(short, long, default_value = "org", value_enum)]
        format: FormatArg,
    },

    /// Print start, duration and value range of frame files
    FrameSummary {
        /// Frame files; rows are keyed and sorted by file stem
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,

        /// Table format
        #[arg(short, long, default_value = "org", value_enum)]
        format: FormatArg,
    },

    /// Draw the splat vs. signal comparison pages
    Plots {
        /// Comma-separated channel idents bounding the U, V and W planes
        #[arg(long, value_name = "IDENTS", value_delimiter = ',')]
        channel_ranges: Option<Vec<i64>>,

        /// Gaussian smear of the splat frame in ticks (0 disables)
        #[arg(long, default_value_t = 0.0)]
        smear: f64,

        /// Scale factor applied to the splat frame (0 disables)
        #[arg(long, default_value_t = 0.0)]
        scale: f64,

        /// Output document (.pdf, or .png for one file per page)
        #[arg(short, long, default_value = "plots.pdf")]
        output: PathBuf,

        /// Load plot settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Depos before drifting
        #[arg(value_name = "DEPOS")]
        depos: PathBuf,

        /// Depos after drifting
        #[arg(value_name = "DRIFT")]
        drift: PathBuf,

        /// Simulated truth frame
        #[arg(value_name = "SPLAT")]
        splat: PathBuf,

        /// Reconstructed signal frame
        #[arg(value_name = "SIGNAL")]
        signal: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::LogSummary { log, format } => log_summary::run(log, format.into()),
        Commands::DepoSummary {
            depos,
            drift,
            format,
        } => depo_summary::run(depos, drift, format.into()),
        Commands::FrameSummary { files, format } => frame_summary::run(files, format.into()),
        Commands::Plots {
            channel_ranges,
            smear,
            scale,
            output,
            config,
            depos,
            drift,
            splat,
            signal,
        } => plots::run(
            plots::PlotsArgs {
                channel_ranges,
                smear,
                scale,
                output,
                config,
            },
            ssss_pdsp::plot::PlotInputs {
                depos,
                drift,
                splat,
                signal,
            },
        ),
    }
}
