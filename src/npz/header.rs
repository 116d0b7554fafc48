//! NPY header parsing and formatting
//!
//! An NPY entry starts with:
//!
//! 1. The magic string `\x93NUMPY`
//! 2. Major and minor version bytes
//! 3. Header length (`u16` little-endian for v1, `u32` for v2/v3)
//! 4. A Python dict literal, e.g. `{'descr': '<f8', 'fortran_order': False, 'shape': (3, 4), }`,
//!    padded with spaces and a newline so the payload starts on a 64-byte boundary

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use super::NpzError;

/// Magic prefix of every NPY entry
pub const NPY_MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Alignment of the payload start
const HEADER_ALIGN: usize = 64;

/// Byte order of stored elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    /// `<`
    Little,
    /// `>`
    Big,
    /// `|`, single byte types
    NotApplicable,
}

/// Element family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `b`
    Bool,
    /// `i`
    Int,
    /// `u`
    UInt,
    /// `f`
    Float,
}

/// Element type decoded from a `descr` string such as `<f4`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementType {
    /// Element family
    pub kind: ElementKind,
    /// Bytes per element
    pub size: usize,
    /// Byte order
    pub endianness: Endianness,
}

impl ElementType {
    /// Parse a NumPy type string (`<f8`, `|u1`, `>i4`, `=f4`, ...)
    pub fn parse(descr: &str) -> Result<Self, NpzError> {
        let unsupported = || NpzError::UnsupportedDtype(descr.to_string());

        let mut chars = descr.chars();
        let endianness = match chars.next() {
            Some('<') => Endianness::Little,
            Some('>') => Endianness::Big,
            Some('|') => Endianness::NotApplicable,
            Some('=') if cfg!(target_endian = "big") => Endianness::Big,
            Some('=') => Endianness::Little,
            _ => return Err(unsupported()),
        };
        let kind = match chars.next() {
            Some('b') => ElementKind::Bool,
            Some('i') => ElementKind::Int,
            Some('u') => ElementKind::UInt,
            Some('f') => ElementKind::Float,
            _ => return Err(unsupported()),
        };
        let size: usize = chars.as_str().parse().map_err(|_| unsupported())?;

        let valid = match kind {
            ElementKind::Bool => size == 1,
            ElementKind::Int | ElementKind::UInt => matches!(size, 1 | 2 | 4 | 8),
            ElementKind::Float => matches!(size, 4 | 8),
        };
        if !valid {
            return Err(unsupported());
        }

        Ok(Self {
            kind,
            size,
            endianness,
        })
    }

    /// Format back into a NumPy type string
    pub fn descr(&self) -> String {
        let order = match self.endianness {
            Endianness::Little => '<',
            Endianness::Big => '>',
            Endianness::NotApplicable => '|',
        };
        let kind = match self.kind {
            ElementKind::Bool => 'b',
            ElementKind::Int => 'i',
            ElementKind::UInt => 'u',
            ElementKind::Float => 'f',
        };
        format!("{}{}{}", order, kind, self.size)
    }
}

/// Parsed NPY header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpyHeader {
    /// Element type
    pub element: ElementType,
    /// Column-major storage
    pub fortran_order: bool,
    /// Array dimensions; empty for a scalar
    pub shape: Vec<usize>,
}

impl NpyHeader {
    /// Number of elements described by the shape
    pub fn element_count(&self) -> Result<usize, NpzError> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or_else(|| NpzError::InvalidHeader(format!("shape {:?} overflows", self.shape)))
    }

    /// Number of payload bytes described by the header
    pub fn payload_len(&self) -> Result<usize, NpzError> {
        self.element_count()?
            .checked_mul(self.element.size)
            .ok_or_else(|| NpzError::InvalidHeader(format!("shape {:?} overflows", self.shape)))
    }

    /// Read the preamble and header dict, leaving the reader at the payload
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, NpzError> {
        let mut magic = [0u8; 6];
        reader.read_exact(&mut magic)?;
        if &magic != NPY_MAGIC {
            return Err(NpzError::BadMagic);
        }

        let major = reader.read_u8()?;
        let _minor = reader.read_u8()?;
        let header_len = match major {
            1 => reader.read_u16::<LittleEndian>()? as usize,
            2 | 3 => reader.read_u32::<LittleEndian>()? as usize,
            other => return Err(NpzError::UnsupportedVersion(other)),
        };

        let mut raw = Vec::new();
        reader.take(header_len as u64).read_to_end(&mut raw)?;
        if raw.len() != header_len {
            return Err(NpzError::Truncated {
                expected: header_len,
                found: raw.len(),
            });
        }
        let text = String::from_utf8(raw)
            .map_err(|_| NpzError::InvalidHeader("header is not valid text".to_string()))?;

        Self::parse_dict(&text)
    }

    /// Parse the header dict literal
    pub fn parse_dict(text: &str) -> Result<Self, NpzError> {
        let descr = dict_value(text, "descr")
            .ok_or_else(|| NpzError::InvalidHeader(format!("missing 'descr' in {}", text.trim())))?;
        if !descr.starts_with('\'') {
            // Structured dtypes are lists of fields
            return Err(NpzError::UnsupportedDtype(descr.to_string()));
        }
        let element = ElementType::parse(descr.trim_matches('\''))?;

        let fortran_order = match dict_value(text, "fortran_order") {
            Some("True") => true,
            Some("False") => false,
            other => {
                return Err(NpzError::InvalidHeader(format!(
                    "bad 'fortran_order': {:?}",
                    other
                )))
            }
        };

        let shape_text = dict_value(text, "shape")
            .ok_or_else(|| NpzError::InvalidHeader(format!("missing 'shape' in {}", text.trim())))?;
        let shape = parse_shape(shape_text)?;

        Ok(Self {
            element,
            fortran_order,
            shape,
        })
    }

    /// Write a version 1.0 (or 2.0 for very long headers) preamble and header
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), NpzError> {
        let dict = format!(
            "{{'descr': '{}', 'fortran_order': {}, 'shape': {}, }}",
            self.element.descr(),
            if self.fortran_order { "True" } else { "False" },
            format_shape(&self.shape)
        );

        // magic + version + u16 length, then dict + newline
        let v1_prefix = NPY_MAGIC.len() + 2 + 2;
        let pad = (HEADER_ALIGN - (v1_prefix + dict.len() + 1) % HEADER_ALIGN) % HEADER_ALIGN;
        let header_len = dict.len() + pad + 1;

        writer.write_all(NPY_MAGIC)?;
        if let Ok(len) = u16::try_from(header_len) {
            writer.write_all(&[1, 0])?;
            writer.write_u16::<LittleEndian>(len)?;
            writer.write_all(dict.as_bytes())?;
            writer.write_all(&vec![b' '; pad])?;
        } else {
            let v2_prefix = v1_prefix + 2;
            let pad = (HEADER_ALIGN - (v2_prefix + dict.len() + 1) % HEADER_ALIGN) % HEADER_ALIGN;
            let header_len = u32::try_from(dict.len() + pad + 1)
                .map_err(|_| NpzError::InvalidHeader("header too long".to_string()))?;
            writer.write_all(&[2, 0])?;
            writer.write_u32::<LittleEndian>(header_len)?;
            writer.write_all(dict.as_bytes())?;
            writer.write_all(&vec![b' '; pad])?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Raw text of the value stored under `key` in a Python dict literal
fn dict_value<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let pattern = format!("'{}':", key);
    let start = text.find(&pattern)? + pattern.len();
    let rest = text[start..].trim_start();

    let end = match rest.chars().next()? {
        '\'' => rest[1..].find('\'')? + 2,
        '(' => rest.find(')')? + 1,
        '[' => rest.find(']')? + 1,
        _ => rest.find(|c| c == ',' || c == '}').unwrap_or(rest.len()),
    };
    Some(rest[..end].trim())
}

fn parse_shape(text: &str) -> Result<Vec<usize>, NpzError> {
    let inner = text
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .ok_or_else(|| NpzError::InvalidHeader(format!("bad 'shape': {}", text)))?;

    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            // Older writers emit Python 2 longs, e.g. `3L`
            s.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|_| NpzError::InvalidHeader(format!("bad dimension '{}'", s)))
        })
        .collect()
}

fn format_shape(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [n] => format!("({},)", n),
        dims => {
            let parts: Vec<String> = dims.iter().map(|d| d.to_string()).collect();
            format!("({})", parts.join(", "))
        }
    }
}
