use anyhow::{Context, Result};
use ssss_pdsp::logscan::scan_log_file;
use ssss_pdsp::summary::sensvol_table;
use ssss_pdsp::table::TableFormat;
use std::path::PathBuf;

/// Print the sensitive volume table; prints nothing when the log lacks it
pub fn run(log: PathBuf, format: TableFormat) -> Result<()> {
    let volume = scan_log_file(&log)
        .with_context(|| format!("Failed to scan log {}", log.display()))?;

    if let Some(volume) = volume {
        let table = sensvol_table(&volume)?;
        println!("{}", table.render(format)?);
    }

    Ok(())
}
