//! Decoded NPY arrays
//!
//! Every element type is widened on read: floats become `f64`, integers and
//! booleans become `i64`. Payloads are always handed out in row-major order.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use ndarray::{Array1, Array2, ArrayD, IxDyn, ShapeBuilder};

use super::header::{ElementKind, ElementType, Endianness, NpyHeader};
use super::NpzError;

/// Widened element storage
#[derive(Debug, Clone, PartialEq)]
pub enum NpyData {
    /// Floating point payload
    Float(Vec<f64>),
    /// Integer or boolean payload
    Int(Vec<i64>),
}

impl NpyData {
    /// Number of elements
    pub fn len(&self) -> usize {
        match self {
            NpyData::Float(v) => v.len(),
            NpyData::Int(v) => v.len(),
        }
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn family(&self) -> &'static str {
        match self {
            NpyData::Float(_) => "float",
            NpyData::Int(_) => "integer",
        }
    }
}

/// An n-dimensional array read from an `.npy` entry
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    /// Array dimensions
    pub shape: Vec<usize>,
    /// Row-major elements
    pub data: NpyData,
}

impl NpyArray {
    /// Read a complete NPY entry (header and payload)
    pub fn read<R: Read>(mut reader: R) -> Result<Self, NpzError> {
        let header = NpyHeader::read(&mut reader)?;
        let expected = header.payload_len()?;

        // Never trust the header for the allocation size
        let mut payload = Vec::new();
        reader.take(expected as u64).read_to_end(&mut payload)?;
        if payload.len() != expected {
            return Err(NpzError::Truncated {
                expected,
                found: payload.len(),
            });
        }

        let data = match header.element.endianness {
            Endianness::Big => decode::<BigEndian>(&payload, header.element)?,
            Endianness::Little | Endianness::NotApplicable => {
                decode::<LittleEndian>(&payload, header.element)?
            }
        };

        let data = if header.fortran_order && header.shape.len() > 1 {
            match data {
                NpyData::Float(v) => NpyData::Float(to_row_major(&header.shape, v)?),
                NpyData::Int(v) => NpyData::Int(to_row_major(&header.shape, v)?),
            }
        } else {
            data
        };

        Ok(Self {
            shape: header.shape,
            data,
        })
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when there are no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Elements as `f64`, integers converted
    pub fn into_f64_vec(self) -> Vec<f64> {
        match self.data {
            NpyData::Float(v) => v,
            NpyData::Int(v) => v.into_iter().map(|x| x as f64).collect(),
        }
    }

    /// Elements as `i64`; fails for floating point arrays
    pub fn into_i64_vec(self) -> Result<Vec<i64>, NpzError> {
        match self.data {
            NpyData::Int(v) => Ok(v),
            other => Err(NpzError::TypeMismatch {
                expected: "integer",
                found: other.family(),
            }),
        }
    }

    /// Dynamic-rank `f64` view of the array
    pub fn into_f64_dyn(self) -> Result<ArrayD<f64>, NpzError> {
        let shape = self.shape.clone();
        Ok(ArrayD::from_shape_vec(IxDyn(&shape), self.into_f64_vec())?)
    }

    /// One-dimensional `f64` array
    pub fn into_array1_f64(self) -> Result<Array1<f64>, NpzError> {
        self.expect_rank(1)?;
        Ok(Array1::from_vec(self.into_f64_vec()))
    }

    /// One-dimensional `i64` array
    pub fn into_array1_i64(self) -> Result<Array1<i64>, NpzError> {
        self.expect_rank(1)?;
        Ok(Array1::from_vec(self.into_i64_vec()?))
    }

    /// Two-dimensional `f64` array
    pub fn into_array2_f64(self) -> Result<Array2<f64>, NpzError> {
        self.expect_rank(2)?;
        let dims = (self.shape[0], self.shape[1]);
        Ok(Array2::from_shape_vec(dims, self.into_f64_vec())?)
    }

    /// Two-dimensional `i64` array
    pub fn into_array2_i64(self) -> Result<Array2<i64>, NpzError> {
        self.expect_rank(2)?;
        let dims = (self.shape[0], self.shape[1]);
        Ok(Array2::from_shape_vec(dims, self.into_i64_vec()?)?)
    }

    fn expect_rank(&self, rank: usize) -> Result<(), NpzError> {
        if self.ndim() != rank {
            return Err(NpzError::RankMismatch {
                expected: rank,
                found: self.ndim(),
            });
        }
        Ok(())
    }
}

fn decode<B: ByteOrder>(bytes: &[u8], element: ElementType) -> Result<NpyData, NpzError> {
    let count = bytes.len() / element.size;

    let data = match (element.kind, element.size) {
        (ElementKind::Float, 4) => {
            let mut out = vec![0f32; count];
            B::read_f32_into(bytes, &mut out);
            NpyData::Float(out.into_iter().map(f64::from).collect())
        }
        (ElementKind::Float, 8) => {
            let mut out = vec![0f64; count];
            B::read_f64_into(bytes, &mut out);
            NpyData::Float(out)
        }
        (ElementKind::Int, 1) => NpyData::Int(bytes.iter().map(|&b| i64::from(b as i8)).collect()),
        (ElementKind::Int, 2) => {
            let mut out = vec![0i16; count];
            B::read_i16_into(bytes, &mut out);
            NpyData::Int(out.into_iter().map(i64::from).collect())
        }
        (ElementKind::Int, 4) => {
            let mut out = vec![0i32; count];
            B::read_i32_into(bytes, &mut out);
            NpyData::Int(out.into_iter().map(i64::from).collect())
        }
        (ElementKind::Int, 8) => {
            let mut out = vec![0i64; count];
            B::read_i64_into(bytes, &mut out);
            NpyData::Int(out)
        }
        (ElementKind::UInt, 1) | (ElementKind::Bool, 1) => {
            NpyData::Int(bytes.iter().map(|&b| i64::from(b)).collect())
        }
        (ElementKind::UInt, 2) => {
            let mut out = vec![0u16; count];
            B::read_u16_into(bytes, &mut out);
            NpyData::Int(out.into_iter().map(i64::from).collect())
        }
        (ElementKind::UInt, 4) => {
            let mut out = vec![0u32; count];
            B::read_u32_into(bytes, &mut out);
            NpyData::Int(out.into_iter().map(i64::from).collect())
        }
        (ElementKind::UInt, 8) => {
            let mut out = vec![0u64; count];
            B::read_u64_into(bytes, &mut out);
            let converted = out
                .into_iter()
                .map(|x| i64::try_from(x).map_err(|_| NpzError::ValueOutOfRange(x)))
                .collect::<Result<Vec<_>, _>>()?;
            NpyData::Int(converted)
        }
        _ => return Err(NpzError::UnsupportedDtype(element.descr())),
    };

    Ok(data)
}

fn to_row_major<T: Copy>(shape: &[usize], column_major: Vec<T>) -> Result<Vec<T>, NpzError> {
    let array = ArrayD::from_shape_vec(IxDyn(shape).f(), column_major)?;
    Ok(array.iter().copied().collect())
}
