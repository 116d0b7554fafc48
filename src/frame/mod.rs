//! # Signal frames
//!
//! A frame archive stores, for a tag and index:
//!
//! - `frame_<tag>_<N>`: samples, one row per channel, one column per tick
//! - `channels_<tag>_<N>`: channel identifier of each row, ascending
//! - `tickinfo_<tag>_<N>`: `[start time, tick width, ...]`
//!
//! Loading densifies the frame over every channel between the lowest and the
//! highest identifier. Rows are stored highest channel first, so row `0` is
//! the top line of the rendered image. Channels missing from the archive are
//! zero rows.

mod error;
mod smear;
mod summary;

pub use error::FrameError;
pub use smear::{gaussian_kernel, smear_ticks, TickConvolver, DEFAULT_NSIGMA};
pub use summary::{summarize_files, FrameSummary};

use std::ops::Range;
use std::path::Path;

use ndarray::{s, Array1, Array2, ArrayView1, Axis};

use crate::npz::NpzArchive;
use crate::units;

/// Largest number of dense rows a frame may expand to
pub const MAX_CHANNEL_SPAN: usize = 1 << 20;

/// Names the three arrays of one frame inside an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameKey {
    /// Frame tag; `*` for untagged frames
    pub tag: String,
    /// Frame index within the archive
    pub ident: usize,
}

impl Default for FrameKey {
    fn default() -> Self {
        Self {
            tag: "*".to_string(),
            ident: 0,
        }
    }
}

impl FrameKey {
    /// Create a key for a tag and index
    pub fn new(tag: impl Into<String>, ident: usize) -> Self {
        Self {
            tag: tag.into(),
            ident,
        }
    }

    /// Name of the sample array
    pub fn frame_name(&self) -> String {
        format!("frame_{}_{}", self.tag, self.ident)
    }

    /// Name of the channel identifier array
    pub fn channels_name(&self) -> String {
        format!("channels_{}_{}", self.tag, self.ident)
    }

    /// Name of the tick info array
    pub fn tickinfo_name(&self) -> String {
        format!("tickinfo_{}_{}", self.tag, self.ident)
    }
}

/// Edge coordinates of a frame image: `(t0, t1)` in time units, `(c0, c1)` in channels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// Left time edge
    pub t0: f64,
    /// Right time edge
    pub t1: f64,
    /// Lower channel edge
    pub c0: f64,
    /// Upper channel edge
    pub c1: f64,
}

impl Extent {
    /// Width of the time axis
    pub fn duration(&self) -> f64 {
        self.t1 - self.t0
    }

    /// `n` evenly spaced left edges spanning the time axis
    pub fn time_edges(&self, n: usize) -> Vec<f64> {
        linspace_left(self.t0, self.t1, n)
    }
}

fn linspace_left(start: f64, stop: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let step = (stop - start) / n as f64;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// Dense channel-by-tick frame
#[derive(Debug, Clone)]
pub struct Frame {
    samples: Array2<f64>,
    channel_min: i64,
    channel_max: i64,
    start: f64,
    tick: f64,
}

impl Frame {
    /// Densify sparse rows given their channel identifiers and tick info.
    ///
    /// `tunit` is the time unit the extent is expressed in.
    pub fn from_arrays(
        rows: Array2<f64>,
        channels: &[i64],
        tickinfo: &[f64],
        tunit: f64,
    ) -> Result<Self, FrameError> {
        if rows.nrows() != channels.len() {
            return Err(FrameError::ChannelCountMismatch {
                rows: rows.nrows(),
                channels: channels.len(),
            });
        }
        if let Some(w) = channels.windows(2).find(|w| w[1] < w[0]) {
            return Err(FrameError::UnsortedChannels {
                prev: w[0],
                next: w[1],
            });
        }
        let (Some(&channel_min), Some(&channel_max)) = (channels.first(), channels.last()) else {
            return Err(FrameError::Empty {
                channels: 0,
                ticks: rows.ncols(),
            });
        };
        if rows.ncols() == 0 {
            return Err(FrameError::Empty {
                channels: channels.len(),
                ticks: 0,
            });
        }
        if tickinfo.len() < 2 {
            return Err(FrameError::BadTickInfo(tickinfo.len()));
        }

        let nchannels = channel_max
            .checked_sub(channel_min)
            .and_then(|span| span.checked_add(1))
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| n <= MAX_CHANNEL_SPAN)
            .ok_or(FrameError::ChannelSpan {
                min: channel_min,
                max: channel_max,
                limit: MAX_CHANNEL_SPAN,
            })?;
        let mut samples = Array2::<f64>::zeros((nchannels, rows.ncols()));
        for (row, &channel) in rows.rows().into_iter().zip(channels) {
            let dense_row = (channel_max - channel) as usize;
            samples.row_mut(dense_row).assign(&row);
        }

        Ok(Self {
            samples,
            channel_min,
            channel_max,
            start: tickinfo[0] / tunit,
            tick: tickinfo[1] / tunit,
        })
    }

    /// Load the default (`*`, index 0) frame with times in `tunit`
    pub fn load<P: AsRef<Path>>(path: P, tunit: f64) -> Result<Self, FrameError> {
        Self::load_key(path, &FrameKey::default(), tunit)
    }

    /// Load the frame named by `key` with times in `tunit`
    pub fn load_key<P: AsRef<Path>>(
        path: P,
        key: &FrameKey,
        tunit: f64,
    ) -> Result<Self, FrameError> {
        let mut archive = NpzArchive::open(path)?;
        let rows = archive.array2_f64(&key.frame_name())?;
        let channels = archive.array1_i64(&key.channels_name())?;
        let tickinfo = archive.array1_f64(&key.tickinfo_name())?;

        let frame = Self::from_arrays(rows, &channels.to_vec(), &tickinfo.to_vec(), tunit)?;
        log::info!(
            "Loaded frame {} from {}: channels {}..={}, {} ticks of {}",
            key.frame_name(),
            archive.path().display(),
            frame.channel_min,
            frame.channel_max,
            frame.nticks(),
            frame.tick
        );
        Ok(frame)
    }

    /// Samples, highest channel first
    pub fn samples(&self) -> &Array2<f64> {
        &self.samples
    }

    /// Mutable samples, highest channel first
    pub fn samples_mut(&mut self) -> &mut Array2<f64> {
        &mut self.samples
    }

    /// Number of dense rows (`max - min + 1`)
    pub fn nchannels(&self) -> usize {
        self.samples.nrows()
    }

    /// Number of ticks per channel
    pub fn nticks(&self) -> usize {
        self.samples.ncols()
    }

    /// Lowest channel identifier
    pub fn channel_min(&self) -> i64 {
        self.channel_min
    }

    /// Highest channel identifier
    pub fn channel_max(&self) -> i64 {
        self.channel_max
    }

    /// Time of the first tick
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Tick width
    pub fn tick(&self) -> f64 {
        self.tick
    }

    /// Image edges: `(start, start + (nticks + 1) * tick, cmin, cmax + 1)`
    pub fn extent(&self) -> Extent {
        let tf = self.start + self.nticks() as f64 * self.tick;
        Extent {
            t0: self.start,
            t1: tf + self.tick,
            c0: self.channel_min as f64,
            c1: (self.channel_max + 1) as f64,
        }
    }

    /// Dense row holding `channel`
    pub fn row_of(&self, channel: i64) -> Option<usize> {
        if channel < self.channel_min || channel > self.channel_max {
            return None;
        }
        Some((self.channel_max - channel) as usize)
    }

    /// Channel stored in dense row `row`
    pub fn channel_of_row(&self, row: usize) -> i64 {
        self.channel_max - row as i64
    }

    /// Samples of one channel
    pub fn waveform(&self, channel: i64) -> Option<ArrayView1<'_, f64>> {
        self.row_of(channel).map(|row| self.samples.row(row))
    }

    /// Sum of all samples
    pub fn total(&self) -> f64 {
        self.samples.sum()
    }

    /// Multiply every sample by `factor`
    pub fn scale(&mut self, factor: f64) {
        self.samples *= factor;
    }

    /// Sum over channels, one value per tick
    pub fn time_projection(&self) -> Array1<f64> {
        self.samples.sum_axis(Axis(0))
    }

    /// Sum over ticks, one value per dense row
    pub fn channel_projection(&self) -> Array1<f64> {
        self.samples.sum_axis(Axis(1))
    }

    /// Sum over the channels in `channels`, one value per tick
    pub fn channel_range_projection(&self, channels: Range<i64>) -> Array1<f64> {
        let first = channels.start.max(self.channel_min);
        let last = (channels.end - 1).min(self.channel_max);
        if first > last {
            return Array1::zeros(self.nticks());
        }
        // Higher channels sit in lower rows
        let top = (self.channel_max - last) as usize;
        let bottom = (self.channel_max - first) as usize;
        self.samples
            .slice(s![top..=bottom, ..])
            .sum_axis(Axis(0))
    }

    /// Channel-by-tick cut, highest channel first, zero outside the frame
    pub fn window(&self, channels: Range<i64>, ticks: Range<usize>) -> Array2<f64> {
        let nrows = channels.end.saturating_sub(channels.start).max(0) as usize;
        let ncols = ticks.end.saturating_sub(ticks.start);
        let mut out = Array2::<f64>::zeros((nrows, ncols));

        for (irow, mut out_row) in out.rows_mut().into_iter().enumerate() {
            let channel = channels.end - 1 - irow as i64;
            let Some(waveform) = self.waveform(channel) else {
                continue;
            };
            for (icol, value) in out_row.iter_mut().enumerate() {
                if let Some(&sample) = waveform.get(ticks.start + icol) {
                    *value = sample;
                }
            }
        }
        out
    }
}

/// Load the default frame of an archive with times in microseconds
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<Frame, FrameError> {
    Frame::load(path, units::US)
}
