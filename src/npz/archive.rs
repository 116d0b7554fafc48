use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2};
use zip::ZipArchive;

use super::{NpyArray, NpzError};

const NPY_SUFFIX: &str = ".npy";

/// Read access to the named arrays of an `.npz` file
pub struct NpzArchive {
    path: PathBuf,
    archive: ZipArchive<BufReader<File>>,
}

impl NpzArchive {
    /// Open an `.npz` file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, NpzError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let archive = ZipArchive::new(BufReader::new(file))?;
        log::debug!("Opened {} ({} entries)", path.display(), archive.len());
        Ok(Self { path, archive })
    }

    /// Path the archive was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Array names (entry names without the `.npy` suffix), sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .archive
            .file_names()
            .map(|n| n.strip_suffix(NPY_SUFFIX).unwrap_or(n).to_string())
            .collect();
        names.sort();
        names
    }

    /// Whether an array with this name is present
    pub fn contains(&self, name: &str) -> bool {
        self.entry_name(name).is_some()
    }

    /// Read the named array
    pub fn read(&mut self, name: &str) -> Result<NpyArray, NpzError> {
        let entry = self.entry_name(name).ok_or_else(|| NpzError::MissingEntry {
            name: name.to_string(),
            path: self.path.clone(),
        })?;
        let file = self.archive.by_name(&entry)?;
        let array = NpyArray::read(file)?;
        log::debug!(
            "Read '{}' {:?} from {}",
            name,
            array.shape,
            self.path.display()
        );
        Ok(array)
    }

    /// Read the named array as a 1-d `f64` array
    pub fn array1_f64(&mut self, name: &str) -> Result<Array1<f64>, NpzError> {
        self.read(name)?.into_array1_f64()
    }

    /// Read the named array as a 1-d `i64` array
    pub fn array1_i64(&mut self, name: &str) -> Result<Array1<i64>, NpzError> {
        self.read(name)?.into_array1_i64()
    }

    /// Read the named array as a 2-d `f64` array
    pub fn array2_f64(&mut self, name: &str) -> Result<Array2<f64>, NpzError> {
        self.read(name)?.into_array2_f64()
    }

    /// Read the named array as a 2-d `i64` array
    pub fn array2_i64(&mut self, name: &str) -> Result<Array2<i64>, NpzError> {
        self.read(name)?.into_array2_i64()
    }

    fn entry_name(&self, name: &str) -> Option<String> {
        let with_suffix = format!("{}{}", name, NPY_SUFFIX);
        let mut fallback = None;
        for entry in self.archive.file_names() {
            if entry == with_suffix {
                return Some(with_suffix);
            }
            if entry == name {
                fallback = Some(name.to_string());
            }
        }
        fallback
    }
}
