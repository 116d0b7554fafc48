//! # Splat versus signal comparison document
//!
//! Pages, in order:
//!
//! 1. both full frames with time and channel projections, optional U/V/W
//!    channel-range overlays and a shared colour bar
//! 2. one zoomed splat / signal / difference page per [`ZoomWindow`]
//! 3. one overlaid waveform page per [`WaveformPage`]
//!
//! Pages are rendered to RGB rasters and written either as a multi-page PDF
//! or as numbered PNG files, depending on the output extension.

mod colormap;
mod config;
mod pages;
mod pdf;
mod render;

pub use colormap::{ColorMap, ColorScale};
pub use config::{PlotConfig, WaveformPage, ZoomWindow};
pub use pages::PageSink;
pub use pdf::PdfWriter;
pub use render::plane_projections;

use std::path::{Path, PathBuf};

use plotters::drawing::DrawingAreaErrorKind;

use crate::depo::{load_depos, DepoError};
use crate::frame::{load_frame, smear_ticks, Frame, FrameError};

/// Errors from building the comparison document
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Depo input failed to load
    #[error(transparent)]
    Depo(#[from] DepoError),

    /// Frame input failed to load or smear
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// I/O error writing the output
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// PNG encoding error
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    /// Plotting backend error
    #[error("Drawing error: {0}")]
    Drawing(String),

    /// Page buffer does not hold `width * height` RGB pixels
    #[error("Page buffer has {len} bytes, {width}x{height} RGB needs {expected}")]
    PageSize {
        /// Page width in pixels
        width: u32,
        /// Page height in pixels
        height: u32,
        /// Bytes given
        len: usize,
        /// Bytes required
        expected: usize,
    },

    /// Output extension is neither `.pdf` nor `.png`
    #[error("Unsupported output {0}: use a .pdf or .png file name")]
    UnsupportedOutput(PathBuf),

    /// Channel range boundaries are too few or descending
    #[error("Invalid channel ranges: {0}")]
    InvalidChannelRanges(String),

    /// Plot configuration is unusable
    #[error("Invalid plot configuration: {0}")]
    InvalidConfig(String),
}

impl<E> From<DrawingAreaErrorKind<E>> for PlotError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(err.to_string())
    }
}

/// The four input archives
#[derive(Debug, Clone)]
pub struct PlotInputs {
    /// Depos before drifting
    pub depos: PathBuf,
    /// Depos after drifting
    pub drift: PathBuf,
    /// Simulated truth frame
    pub splat: PathBuf,
    /// Reconstructed signal frame
    pub signal: PathBuf,
}

/// Per-run options given on the command line
#[derive(Debug, Clone, Default)]
pub struct PlotOptions {
    /// Ascending channel boundaries of up to three planes
    pub channel_ranges: Option<Vec<i64>>,
    /// Gaussian smear of the splat frame in ticks; zero disables
    pub smear: f64,
    /// Factor applied to the splat frame; zero disables
    pub scale: f64,
}

impl PlotOptions {
    /// Check the channel range boundaries
    pub fn validate(&self) -> Result<(), PlotError> {
        let Some(ranges) = &self.channel_ranges else {
            return Ok(());
        };
        if ranges.len() < 2 {
            return Err(PlotError::InvalidChannelRanges(format!(
                "need at least two boundaries, got {}",
                ranges.len()
            )));
        }
        if let Some(w) = ranges.windows(2).find(|w| w[1] < w[0]) {
            return Err(PlotError::InvalidChannelRanges(format!(
                "boundaries must ascend, got {} then {}",
                w[0], w[1]
            )));
        }
        Ok(())
    }
}

/// Load the splat and signal frames, smearing then scaling the splat
pub fn load_frames(
    inputs: &PlotInputs,
    options: &PlotOptions,
    config: &PlotConfig,
) -> Result<(Frame, Frame), PlotError> {
    let mut splat = load_frame(&inputs.splat)?;
    if options.smear != 0.0 {
        smear_ticks(&mut splat, options.smear, config.nsigma)?;
    }
    if options.scale != 0.0 {
        splat.scale(options.scale);
    }
    let signal = load_frame(&inputs.signal)?;
    Ok((splat, signal))
}

/// Draw every page into an RGB8 buffer of `config.width` by `config.height`
pub fn render_pages(
    splat: &Frame,
    signal: &Frame,
    options: &PlotOptions,
    config: &PlotConfig,
) -> Result<Vec<Vec<u8>>, PlotError> {
    options.validate()?;
    config.validate()?;

    let (width, height) = (config.width, config.height);
    let boundaries = options.channel_ranges.as_deref();
    let mut pages = Vec::with_capacity(1 + config.zooms.len() + config.waveforms.len());

    pages.push(render::render_page(width, height, |root| {
        render::overview_page(root, splat, signal, boundaries, config.frame_vmax)
    })?);

    for zoom in &config.zooms {
        pages.push(render::render_page(width, height, |root| {
            render::zoom_page(root, splat, signal, zoom, config.zoom_limit)
        })?);
    }

    for waveforms in &config.waveforms {
        let title = format!(
            "{} smear={:?} scale={:?}",
            waveforms.label, options.smear, options.scale
        );
        pages.push(render::render_page(width, height, |root| {
            render::waveform_page(root, splat, signal, waveforms, &title)
        })?);
    }

    Ok(pages)
}

/// Write rendered pages to `output`; nothing is left behind on failure
pub fn write_pages(
    output: &Path,
    width: u32,
    height: u32,
    pages: Vec<Vec<u8>>,
) -> Result<usize, PlotError> {
    let mut sink = PageSink::create(output)?;
    for page in pages {
        if let Err(err) = sink.add_page(width, height, page) {
            sink.discard();
            return Err(err);
        }
    }
    sink.finish()
}

/// Load the inputs, draw every page into `output`; returns the page count
pub fn make_plots(
    inputs: &PlotInputs,
    options: &PlotOptions,
    config: &PlotConfig,
    output: &Path,
) -> Result<usize, PlotError> {
    options.validate()?;
    config.validate()?;

    let depos = load_depos(&inputs.depos)?;
    let drift = load_depos(&inputs.drift)?;
    log::info!("depos: {} primary, drifted: {}", depos.len(), drift.len());

    let (splat, signal) = load_frames(inputs, options, config)?;
    let pages = render_pages(&splat, &signal, options, config)?;
    write_pages(output, config.width, config.height, pages)
}
