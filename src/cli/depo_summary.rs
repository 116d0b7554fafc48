use anyhow::{Context, Result};
use log::info;
use ssss_pdsp::depo::load_depos;
use ssss_pdsp::summary::depo_table;
use ssss_pdsp::table::TableFormat;
use std::path::PathBuf;

/// Print time and drift coordinate ranges of the input and drifted depos
pub fn run(depos: PathBuf, drift: PathBuf, format: TableFormat) -> Result<()> {
    let before = load_depos(&depos)
        .and_then(|set| set.ranges())
        .with_context(|| format!("Failed to summarise depos {}", depos.display()))?;
    let after = load_depos(&drift)
        .and_then(|set| set.ranges())
        .with_context(|| format!("Failed to summarise depos {}", drift.display()))?;

    info!("depos: {}", before);
    info!("drift: {}", after);

    let table = depo_table(&before, &after)?;
    println!("{}", table.render(format)?);

    Ok(())
}
