//! # ssss-pdsp - simulated signal vs. sim+sigproc signal diagnostics
//!
//! `ssss_pdsp` loads the energy depositions ("depos") and signal frames that a
//! ProtoDUNE-SP simulation job writes as NumPy `.npz` archives, summarises
//! them, and draws pages comparing the simulated truth ("splat") frame with
//! the reconstructed ("signal") frame.
//!
//! ## Key Features
//!
//! - **Native `.npz` reading**: ZIP container plus NPY v1/v2/v3 decoding of
//!   float, integer and boolean arrays in either byte order or memory order.
//!
//! - **Dense frames**: sparse per-channel rows are remapped onto every
//!   channel between the lowest and the highest identifier.
//!
//! - **Tick smearing**: Gaussian FFT convolution along the tick axis.
//!
//! - **Report tables**: Org-mode, CSV or JSON renderings of the summaries.
//!
//! - **Comparison document**: full-frame, zoom and waveform pages written to a
//!   multi-page PDF or a numbered PNG sequence.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ssss_pdsp::frame::load_frame;
//! use ssss_pdsp::summary::frame_table;
//! use ssss_pdsp::frame::FrameSummary;
//! use ssss_pdsp::table::TableFormat;
//!
//! let frame = load_frame("signal.npz")?;
//! let summary = FrameSummary::from_frame("signal", &frame);
//! let table = frame_table(&[summary])?;
//! println!("{}", table.render(TableFormat::Org)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`units`]: system of units (millimetre and nanosecond base)
//! - [`npz`]: `.npz` archive reading and writing
//! - [`depo`]: depo loading and range summary
//! - [`frame`]: frame loading, channel remapping, smearing and summaries
//! - [`logscan`]: sensitive volume extraction from job logs
//! - [`table`]: table model and rendering
//! - [`summary`]: the report tables of the summary commands
//! - [`plot`]: the comparison document

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod depo;
pub mod frame;
pub mod logscan;
pub mod npz;
pub mod plot;
pub mod summary;
pub mod table;
pub mod units;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::depo::{load_depos, DepoError, DepoRanges, DepoSet};
    pub use crate::frame::{
        load_frame, smear_ticks, summarize_files, Frame, FrameError, FrameKey, FrameSummary,
    };
    pub use crate::logscan::{scan_log_file, LogScanError, SensitiveVolume};
    pub use crate::npz::{NpyArray, NpzArchive, NpzError, NpzWriter};
    pub use crate::plot::{make_plots, PlotConfig, PlotError, PlotInputs, PlotOptions};
    pub use crate::summary::{depo_table, frame_table, sensvol_table};
    pub use crate::table::{Cell, Table, TableError, TableFormat};
}
