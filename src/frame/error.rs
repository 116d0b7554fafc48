use crate::npz::NpzError;

/// Errors from loading or transforming frames
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Archive could not be read
    #[error(transparent)]
    Npz(#[from] NpzError),

    /// Channel identifiers are not in ascending order
    #[error("channel identifiers are not sorted ascending (channel {next} follows {prev})")]
    UnsortedChannels {
        /// Identifier before the inversion
        prev: i64,
        /// Identifier that breaks the ordering
        next: i64,
    },

    /// Number of frame rows differs from the number of channel identifiers
    #[error("frame has {rows} rows but {channels} channel identifiers")]
    ChannelCountMismatch {
        /// Rows in the frame array
        rows: usize,
        /// Entries in the channel array
        channels: usize,
    },

    /// Channel identifiers span more rows than a dense frame may hold
    #[error("channel span {min}..={max} exceeds {limit} dense rows")]
    ChannelSpan {
        /// Lowest identifier
        min: i64,
        /// Highest identifier
        max: i64,
        /// Largest allowed number of dense rows
        limit: usize,
    },

    /// Frame has no channels or no ticks
    #[error("frame is empty ({channels} channels x {ticks} ticks)")]
    Empty {
        /// Number of channels
        channels: usize,
        /// Number of ticks
        ticks: usize,
    },

    /// Tick info array is too short
    #[error("tickinfo needs at least 2 values (start, tick), found {0}")]
    BadTickInfo(usize),

    /// Smearing parameters are unusable
    #[error("invalid smear: {0}")]
    InvalidSmear(String),

    /// Smearing kernel does not fit in the frame
    #[error("smear kernel half-width {half_width} exceeds {nticks} ticks")]
    KernelTooWide {
        /// Samples on each side of the kernel
        half_width: usize,
        /// Ticks per channel
        nticks: usize,
    },
}
