use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use ndarray::{ArrayBase, Data, Dimension};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::header::{ElementType, NpyHeader};
use super::NpzError;

/// Element types that can be written as little-endian NPY payloads
pub trait NpyElement: Copy {
    /// NumPy type string
    const DESCR: &'static str;

    /// Append one value to the payload
    fn write_le<W: Write>(self, writer: &mut W) -> std::io::Result<()>;
}

impl NpyElement for f32 {
    const DESCR: &'static str = "<f4";

    fn write_le<W: Write>(self, writer: &mut W) -> std::io::Result<()> {
        writer.write_f32::<LittleEndian>(self)
    }
}

impl NpyElement for f64 {
    const DESCR: &'static str = "<f8";

    fn write_le<W: Write>(self, writer: &mut W) -> std::io::Result<()> {
        writer.write_f64::<LittleEndian>(self)
    }
}

impl NpyElement for i32 {
    const DESCR: &'static str = "<i4";

    fn write_le<W: Write>(self, writer: &mut W) -> std::io::Result<()> {
        writer.write_i32::<LittleEndian>(self)
    }
}

impl NpyElement for i64 {
    const DESCR: &'static str = "<i8";

    fn write_le<W: Write>(self, writer: &mut W) -> std::io::Result<()> {
        writer.write_i64::<LittleEndian>(self)
    }
}

/// Write one array as a complete NPY entry
pub fn write_npy<T, S, D, W>(writer: &mut W, array: &ArrayBase<S, D>) -> Result<(), NpzError>
where
    T: NpyElement,
    S: Data<Elem = T>,
    D: Dimension,
    W: Write,
{
    let header = NpyHeader {
        element: ElementType::parse(T::DESCR)?,
        fortran_order: false,
        shape: array.shape().to_vec(),
    };
    header.write(writer)?;
    // Logical iteration order is row-major regardless of memory layout
    for &value in array.iter() {
        value.write_le(writer)?;
    }
    Ok(())
}

/// Builds an `.npz` archive one named array at a time
pub struct NpzWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: SimpleFileOptions,
}

impl NpzWriter<BufWriter<File>> {
    /// Create (truncate) an `.npz` file on disk
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, NpzError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Seek> NpzWriter<W> {
    /// Wrap a seekable sink; entries are stored uncompressed like `numpy.savez`
    pub fn new(inner: W) -> Self {
        Self {
            zip: ZipWriter::new(inner),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        }
    }

    /// Deflate subsequent entries like `numpy.savez_compressed`
    pub fn compressed(mut self, compress: bool) -> Self {
        let method = if compress {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        self.options = self.options.compression_method(method);
        self
    }

    /// Add an array under `name` (the `.npy` suffix is appended)
    pub fn add_array<T, S, D>(&mut self, name: &str, array: &ArrayBase<S, D>) -> Result<(), NpzError>
    where
        T: NpyElement,
        S: Data<Elem = T>,
        D: Dimension,
    {
        self.zip.start_file(format!("{}.npy", name), self.options)?;
        write_npy(&mut self.zip, array)
    }

    /// Write the central directory and return the sink
    pub fn finish(self) -> Result<W, NpzError> {
        Ok(self.zip.finish()?)
    }
}
