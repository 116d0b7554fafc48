use anyhow::{Context, Result};
use log::info;
use ssss_pdsp::plot::{make_plots, PlotConfig, PlotInputs, PlotOptions};
use std::path::PathBuf;

use super::config::Config;

/// Options of the plots subcommand that are not input files
pub struct PlotsArgs {
    pub channel_ranges: Option<Vec<i64>>,
    pub smear: f64,
    pub scale: f64,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
}

/// Draw the comparison pages
pub fn run(args: PlotsArgs, inputs: PlotInputs) -> Result<()> {
    let plot_config = match &args.config {
        Some(path) => Config::from_file(path)?.plots,
        None => PlotConfig::default(),
    };

    for input in [&inputs.depos, &inputs.drift, &inputs.splat, &inputs.signal] {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    info!("Output: {}", args.output.display());
    info!("Smear: {}, scale: {}", args.smear, args.scale);

    let options = PlotOptions {
        channel_ranges: args.channel_ranges,
        smear: args.smear,
        scale: args.scale,
    };
    let pages = make_plots(&inputs, &options, &plot_config, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    info!("Plots complete: {} pages", pages);
    Ok(())
}
