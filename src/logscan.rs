//! Extract the sensitive volume diagonal from a simulation job log.
//!
//! The anode plane reports its sensitive volume once at configuration time:
//!
//! ```text
//! [12:00:00.000] I [ anode ] <AnodePlane:0> face:0 with 3 planes and sensvol: [(-3594.1 6.0 0.0) --> (-0.1 6066.0 2302.0)]
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::units;

/// Text preceding the sensitive volume ray
pub const SENSVOL_MARKER: &str = "<AnodePlane:0> face:0 with 3 planes and sensvol: ";

/// Errors from scanning a log
#[derive(Debug, thiserror::Error)]
pub enum LogScanError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Marker line found but its coordinates are malformed
    #[error("Malformed sensitive volume on line {line}: {reason}")]
    Malformed {
        /// One-based line number
        line: usize,
        /// What went wrong
        reason: String,
    },
}

/// Two corners of the sensitive volume, in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensitiveVolume {
    /// First corner
    pub p1: [f64; 3],
    /// Second corner
    pub p2: [f64; 3],
}

/// Scan a log file; `None` when the marker never appears
pub fn scan_log_file<P: AsRef<Path>>(path: P) -> Result<Option<SensitiveVolume>, LogScanError> {
    let file = File::open(path)?;
    scan_log(BufReader::new(file))
}

/// Scan log lines; only the first marker line is used
pub fn scan_log<R: BufRead>(reader: R) -> Result<Option<SensitiveVolume>, LogScanError> {
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(pos) = line.find(SENSVOL_MARKER) else {
            continue;
        };
        let ray = &line[pos + SENSVOL_MARKER.len()..];
        return parse_ray(ray)
            .map(Some)
            .map_err(|reason| LogScanError::Malformed {
                line: index + 1,
                reason,
            });
    }
    log::info!("No sensitive volume line found");
    Ok(None)
}

/// Parse `[(x y z) --> (x y z)]`
fn parse_ray(text: &str) -> Result<SensitiveVolume, String> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("expected [..] around ray, got '{}'", text.trim()))?;

    let mut parts = inner.split(" --> ");
    let (Some(first), Some(second), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected two points in '{}'", inner));
    };

    Ok(SensitiveVolume {
        p1: parse_point(first)?,
        p2: parse_point(second)?,
    })
}

fn parse_point(text: &str) -> Result<[f64; 3], String> {
    let inner = text
        .trim()
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| format!("expected (x y z), got '{}'", text.trim()))?;

    let values = inner
        .split_whitespace()
        .map(|v| {
            v.parse::<f64>()
                .map(|x| x / units::MM)
                .map_err(|e| format!("bad coordinate '{}': {}", v, e))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    match values.as_slice() {
        &[x, y, z] => Ok([x, y, z]),
        _ => Err(format!("expected 3 coordinates, got {}", values.len())),
    }
}
