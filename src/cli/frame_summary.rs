use anyhow::{Context, Result};
use log::info;
use ssss_pdsp::frame::summarize_files;
use ssss_pdsp::summary::frame_table;
use ssss_pdsp::table::TableFormat;
use ssss_pdsp::units;
use std::path::PathBuf;

/// Print one row per frame file, sorted by file stem
pub fn run(files: Vec<PathBuf>, format: TableFormat) -> Result<()> {
    if files.is_empty() {
        anyhow::bail!("No frame files given");
    }

    let summaries = summarize_files(&files, units::US).context("Failed to summarise frames")?;
    for summary in &summaries {
        info!("{}", summary);
    }

    let table = frame_table(&summaries)?;
    println!("{}", table.render(format)?);

    Ok(())
}
