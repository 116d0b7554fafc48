//! Energy depositions ("depos") loaded from depo archives.
//!
//! A depo archive holds pairs of arrays per event index `N`:
//!
//! - `depo_data_N`: one row per depo, columns `t, q, x, y, z, L, T`
//! - `depo_info_N`: one row per depo, columns `id, pdg, gen, child`
//!
//! Only primary depos (`gen == 0`) are kept. Prior drift stages append their
//! parent depos with higher generation numbers.

use std::fmt;
use std::path::Path;

use ndarray::{Array2, ArrayView1, Axis};

use crate::npz::{NpzArchive, NpzError};
use crate::units;

/// Column index of the time in `depo_data_N`
pub const TIME_COLUMN: usize = 0;
/// Column index of the charge in `depo_data_N`
pub const CHARGE_COLUMN: usize = 1;
/// Column index of the drift coordinate in `depo_data_N`
pub const X_COLUMN: usize = 2;
/// Column index of the generation flag in `depo_info_N`
pub const GENERATION_COLUMN: usize = 2;

/// Errors from loading or summarising depos
#[derive(Debug, thiserror::Error)]
pub enum DepoError {
    /// Archive could not be read
    #[error(transparent)]
    Npz(#[from] NpzError),

    /// Data and info arrays disagree on the number of depos
    #[error("depo_data has {data} rows but depo_info has {info}")]
    RowMismatch {
        /// Rows of `depo_data_N`
        data: usize,
        /// Rows of `depo_info_N`
        info: usize,
    },

    /// An array has too few columns
    #[error("{array} has {found} columns, need at least {needed}")]
    TooFewColumns {
        /// Array name
        array: String,
        /// Columns present
        found: usize,
        /// Columns required
        needed: usize,
    },

    /// No primary depos survived selection
    #[error("no primary depos to summarise")]
    Empty,
}

/// Primary depos of one event
#[derive(Debug, Clone)]
pub struct DepoSet {
    data: Array2<f64>,
}

impl DepoSet {
    /// Build from a raw `depo_data`/`depo_info` pair, keeping generation-0 rows
    pub fn from_arrays(data: Array2<f64>, info: Array2<i64>) -> Result<Self, DepoError> {
        if data.nrows() != info.nrows() {
            return Err(DepoError::RowMismatch {
                data: data.nrows(),
                info: info.nrows(),
            });
        }
        if data.ncols() <= X_COLUMN {
            return Err(DepoError::TooFewColumns {
                array: "depo_data".to_string(),
                found: data.ncols(),
                needed: X_COLUMN + 1,
            });
        }
        if info.ncols() <= GENERATION_COLUMN {
            return Err(DepoError::TooFewColumns {
                array: "depo_info".to_string(),
                found: info.ncols(),
                needed: GENERATION_COLUMN + 1,
            });
        }

        let keep: Vec<usize> = info
            .column(GENERATION_COLUMN)
            .iter()
            .enumerate()
            .filter(|(_, &generation)| generation == 0)
            .map(|(row, _)| row)
            .collect();

        Ok(Self {
            data: data.select(Axis(0), &keep),
        })
    }

    /// Load event `ident` from a depo archive
    pub fn load_ident<P: AsRef<Path>>(path: P, ident: usize) -> Result<Self, DepoError> {
        let mut archive = NpzArchive::open(path)?;
        let data = archive.array2_f64(&format!("depo_data_{}", ident))?;
        let info = archive.array2_i64(&format!("depo_info_{}", ident))?;
        let set = Self::from_arrays(data, info)?;
        log::info!(
            "Loaded {} primary depos from {}",
            set.len(),
            archive.path().display()
        );
        Ok(set)
    }

    /// Number of primary depos
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// True when no depo was kept
    pub fn is_empty(&self) -> bool {
        self.data.nrows() == 0
    }

    /// Raw depo rows
    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    /// Depo times in archive units
    pub fn times(&self) -> ArrayView1<'_, f64> {
        self.data.column(TIME_COLUMN)
    }

    /// Depo charges
    pub fn charges(&self) -> ArrayView1<'_, f64> {
        self.data.column(CHARGE_COLUMN)
    }

    /// Depo drift coordinates in archive units
    pub fn xs(&self) -> ArrayView1<'_, f64> {
        self.data.column(X_COLUMN)
    }

    /// Time and drift coordinate ranges
    pub fn ranges(&self) -> Result<DepoRanges, DepoError> {
        let (tmin, tmax) = min_max(self.times()).ok_or(DepoError::Empty)?;
        let (xmin, xmax) = min_max(self.xs()).ok_or(DepoError::Empty)?;
        Ok(DepoRanges {
            tmin: tmin / units::US,
            tmax: tmax / units::US,
            xmin: xmin / units::MM,
            xmax: xmax / units::MM,
        })
    }
}

/// Load the primary depos of event 0
pub fn load_depos<P: AsRef<Path>>(path: P) -> Result<DepoSet, DepoError> {
    DepoSet::load_ident(path, 0)
}

/// Time (microseconds) and drift coordinate (millimetres) extremes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepoRanges {
    /// Earliest depo time
    pub tmin: f64,
    /// Latest depo time
    pub tmax: f64,
    /// Smallest drift coordinate
    pub xmin: f64,
    /// Largest drift coordinate
    pub xmax: f64,
}

impl fmt::Display for DepoRanges {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t: {:.2} - {:.3} us, x: {:.2} - {:.2} mm",
            self.tmin, self.tmax, self.xmin, self.xmax
        )
    }
}

pub(crate) fn min_max(values: ArrayView1<'_, f64>) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some((min, max))
}
