//! Report tables printed by the summary subcommands.

use crate::depo::DepoRanges;
use crate::frame::FrameSummary;
use crate::logscan::SensitiveVolume;
use crate::table::{Cell, Table, TableError};

/// Time and drift ranges of the input and drifted depos
pub fn depo_table(depos: &DepoRanges, drift: &DepoRanges) -> Result<Table, TableError> {
    let mut table = Table::new(["", "min", "max", "units"])
        .with_caption("Depo t/x ranges:")
        .with_name("tab:depo-tx-ranges")
        .with_column_key(0, "quantity");

    for (label, r) in [("depos t", depos), ("drift t", drift)] {
        table.push_row(vec![
            Cell::text(label),
            Cell::Fixed(r.tmin, 2),
            Cell::Fixed(r.tmax, 3),
            Cell::text("us"),
        ])?;
    }
    for (label, r) in [("depos x", depos), ("drift x", drift)] {
        table.push_row(vec![
            Cell::text(label),
            Cell::Fixed(r.xmin, 2),
            Cell::Fixed(r.xmax, 2),
            Cell::text("mm"),
        ])?;
    }
    Ok(table)
}

/// One row per frame file, in the order given
pub fn frame_table(summaries: &[FrameSummary]) -> Result<Table, TableError> {
    let mut table = Table::new(["frame", "start", "duration", "n>0", "min", "max"])
        .with_caption("Frame times in microsecond.")
        .with_name("tab:frame times")
        .with_rule(false);

    for s in summaries {
        table.push_row(vec![
            Cell::text(s.name.as_str()),
            Cell::Float(s.start),
            Cell::Fixed(s.duration, 0),
            Cell::Int(s.positive as i64),
            Cell::Fixed(s.min, 1),
            Cell::Fixed(s.max, 1),
        ])?;
    }
    Ok(table)
}

/// The two corners of the sensitive volume
pub fn sensvol_table(volume: &SensitiveVolume) -> Result<Table, TableError> {
    let mut table = Table::new(["x (mm)", "y (mm)", "z (mm)"])
        .with_caption("Sensitive volume diagonal and ideal line track endpoints.")
        .with_name("tab:diagonal-endpoints");

    for point in [volume.p1, volume.p2] {
        table.push_row(point.iter().map(|&v| Cell::Float(v)).collect())?;
    }
    Ok(table)
}
