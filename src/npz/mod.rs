//! # NumPy array archives
//!
//! Simulation stages dump their outputs as `.npz` files: a ZIP archive where
//! each entry `<name>.npy` holds one array. This module reads those archives
//! (stored or deflated entries, any NPY version, either byte order, C or
//! Fortran layout) and writes new ones.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ssss_pdsp::npz::NpzArchive;
//!
//! let mut archive = NpzArchive::open("depos.npz")?;
//! for name in archive.names() {
//!     println!("{}", name);
//! }
//! let data = archive.array2_f64("depo_data_0")?;
//! println!("{} depos", data.nrows());
//! # Ok::<(), ssss_pdsp::npz::NpzError>(())
//! ```

mod archive;
mod array;
mod error;
pub mod header;
mod writer;

#[cfg(test)]
mod tests;

pub use archive::NpzArchive;
pub use array::{NpyArray, NpyData};
pub use error::NpzError;
pub use header::{ElementKind, ElementType, Endianness, NpyHeader};
pub use writer::{write_npy, NpyElement, NpzWriter};
