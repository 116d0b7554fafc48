use serde::Deserialize;

use super::PlotError;

/// Page geometry, colour limits and the zoom and waveform pages to draw
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlotConfig {
    /// Page width in pixels
    pub width: u32,
    /// Page height in pixels
    pub height: u32,
    /// Upper colour limit of the full-frame images
    pub frame_vmax: f64,
    /// Symmetric colour limit of the zoomed difference pages
    pub zoom_limit: f64,
    /// Gaussian smearing half-width in units of sigma
    pub nsigma: f64,
    /// Zoomed comparison pages
    pub zooms: Vec<ZoomWindow>,
    /// Per-channel waveform pages
    pub waveforms: Vec<WaveformPage>,
}

/// A channel by tick window drawn as splat, signal and their difference
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoomWindow {
    /// Tick range `[first, last)`
    pub ticks: [usize; 2],
    /// Channel range `[first, last)`
    pub channels: [i64; 2],
    /// Page title
    pub title: String,
}

/// Overlaid splat and signal waveforms of a few channels
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveformPage {
    /// Title prefix; smear and scale values are appended
    pub label: String,
    /// Channels to draw
    pub channels: Vec<i64>,
    /// Tick range `[first, last)`
    pub ticks: [usize; 2],
}

impl PlotConfig {
    /// Check page size, colour limits and page ranges
    pub fn validate(&self) -> Result<(), PlotError> {
        if self.width < 100 || self.height < 100 {
            return Err(PlotError::InvalidConfig(format!(
                "page size {}x{} is too small",
                self.width, self.height
            )));
        }
        if self.zoom_limit.is_nan() || self.zoom_limit <= 0.0 {
            return Err(PlotError::InvalidConfig(format!(
                "zoom_limit must be positive, got {}",
                self.zoom_limit
            )));
        }
        for zoom in &self.zooms {
            if zoom.ticks[1] <= zoom.ticks[0] || zoom.channels[1] <= zoom.channels[0] {
                return Err(PlotError::InvalidConfig(format!(
                    "zoom '{}' has an empty window",
                    zoom.title
                )));
            }
        }
        for page in &self.waveforms {
            if page.ticks[1] <= page.ticks[0] {
                return Err(PlotError::InvalidConfig(format!(
                    "waveform page '{}' has an empty tick range",
                    page.label
                )));
            }
        }
        Ok(())
    }
}

impl ZoomWindow {
    fn new(ticks: [usize; 2], channels: [i64; 2], title: &str) -> Self {
        Self {
            ticks,
            channels,
            title: title.to_string(),
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        const BEGIN: &str = "splat - signal difference, begin of track, V-plane";
        const END: &str = "splat - signal difference, end of track, V-plane";
        Self {
            width: 1280,
            height: 960,
            frame_vmax: 5000.0,
            zoom_limit: 2000.0,
            nsigma: crate::frame::DEFAULT_NSIGMA,
            zooms: vec![
                ZoomWindow::new([0, 400], [1400, 1600], BEGIN),
                ZoomWindow::new([4400, 4800], [1100, 1300], END),
                ZoomWindow::new([100, 200], [1525, 1560], BEGIN),
                ZoomWindow::new([4600, 4800], [1190, 1230], END),
            ],
            waveforms: vec![
                WaveformPage {
                    label: "V-plane start".to_string(),
                    channels: vec![1540, 1530, 1520, 1510],
                    ticks: [100, 350],
                },
                WaveformPage {
                    label: "V-plane end".to_string(),
                    channels: vec![1200, 1210, 1220, 1230],
                    ticks: [4550, 4750],
                },
            ],
        }
    }
}
