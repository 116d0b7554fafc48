use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use super::{Frame, FrameError};

/// Timing and extrema of one frame file
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSummary {
    /// File stem
    pub name: String,
    /// Left time edge
    pub start: f64,
    /// Width of the time extent
    pub duration: f64,
    /// Number of strictly positive samples
    pub positive: usize,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
}

impl FrameSummary {
    /// Summarise a loaded frame
    pub fn from_frame(name: impl Into<String>, frame: &Frame) -> Self {
        let extent = frame.extent();
        let samples = frame.samples();
        Self {
            name: name.into(),
            start: extent.t0,
            duration: extent.duration(),
            positive: samples.iter().filter(|&&v| v > 0.0).count(),
            min: samples.iter().copied().fold(f64::INFINITY, f64::min),
            max: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        }
    }
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: start {:?}, duration {:.0}, n>0 {}, range {:.1} - {:.1}",
            self.name, self.start, self.duration, self.positive, self.min, self.max
        )
    }
}

/// Load and summarise frame files, ordered by file stem.
///
/// Files sharing a stem collapse to the last one given.
pub fn summarize_files<P: AsRef<Path>>(
    paths: &[P],
    tunit: f64,
) -> Result<Vec<FrameSummary>, FrameError> {
    let mut by_name = BTreeMap::new();
    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let frame = Frame::load(path, tunit)?;
        by_name.insert(name.clone(), FrameSummary::from_frame(name, &frame));
    }
    Ok(by_name.into_values().collect())
}
