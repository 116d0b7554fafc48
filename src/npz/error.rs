use std::path::PathBuf;

/// Errors that can occur while reading or writing `.npy` / `.npz` data
#[derive(Debug, thiserror::Error)]
pub enum NpzError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Array shape does not match the element count
    #[error("Shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    /// Entry does not start with the NPY magic string
    #[error("Not an NPY array (bad magic)")]
    BadMagic,

    /// NPY format version this reader does not understand
    #[error("Unsupported NPY format version {0}")]
    UnsupportedVersion(u8),

    /// Header dictionary could not be parsed
    #[error("Invalid NPY header: {0}")]
    InvalidHeader(String),

    /// Element type not handled (structured, object, complex, ...)
    #[error("Unsupported dtype: {0}")]
    UnsupportedDtype(String),

    /// Array payload shorter than the header promises
    #[error("Truncated array data: expected {expected} bytes, found {found}")]
    Truncated {
        /// Bytes required by the header
        expected: usize,
        /// Bytes actually available
        found: usize,
    },

    /// Named entry is not present in the archive
    #[error("Entry '{name}' not found in {}", path.display())]
    MissingEntry {
        /// Entry name without the `.npy` suffix
        name: String,
        /// Archive path
        path: PathBuf,
    },

    /// Array has a different number of dimensions than requested
    #[error("Expected a {expected}-d array, found {found}-d")]
    RankMismatch {
        /// Requested rank
        expected: usize,
        /// Rank stored in the file
        found: usize,
    },

    /// Array holds floats where integers were requested
    #[error("Expected {expected} elements, found {found}")]
    TypeMismatch {
        /// Requested element family
        expected: &'static str,
        /// Element family stored in the file
        found: &'static str,
    },

    /// Unsigned value too large for a signed 64-bit integer
    #[error("Value out of range: {0}")]
    ValueOutOfRange(u64),
}
