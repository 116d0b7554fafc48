use super::*;
use byteorder::{BigEndian, WriteBytesExt};
use ndarray::{array, Array2};
use std::io::Cursor;
use tempfile::tempdir;

fn raw_npy(dict: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = header::NPY_MAGIC.to_vec();
    buf.extend_from_slice(&[1, 0]);
    buf.extend_from_slice(&(dict.len() as u16 + 1).to_le_bytes());
    buf.extend_from_slice(dict.as_bytes());
    buf.push(b'\n');
    buf.extend_from_slice(payload);
    buf
}

#[test]
fn test_archive_read_back() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("frame.npz");

    let frame: Array2<f32> = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let channels = array![10i32, 11];

    let mut writer = NpzWriter::create(&path)?;
    writer.add_array("frame_*_0", &frame)?;
    writer.add_array("channels_*_0", &channels)?;
    writer.finish()?;

    let mut archive = NpzArchive::open(&path)?;
    assert_eq!(archive.names(), vec!["channels_*_0", "frame_*_0"]);
    assert!(archive.contains("frame_*_0"));
    assert!(!archive.contains("frame_*_1"));

    let read = archive.array2_f64("frame_*_0")?;
    assert_eq!(read.dim(), (2, 3));
    assert_eq!(read[[1, 2]], 6.0);

    let read = archive.array1_i64("channels_*_0")?;
    assert_eq!(read.to_vec(), vec![10, 11]);

    Ok(())
}

#[test]
fn test_compressed_archive() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let path = dir.path().join("big.npz");

    let data = Array2::<f64>::from_shape_fn((50, 200), |(r, c)| (r * 200 + c) as f64);
    let mut writer = NpzWriter::create(&path)?.compressed(true);
    writer.add_array("values", &data)?;
    writer.finish()?;

    let mut archive = NpzArchive::open(&path)?;
    assert_eq!(archive.array2_f64("values")?, data);
    Ok(())
}

#[test]
fn test_missing_entry_names_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.npz");
    NpzWriter::create(&path).unwrap().finish().unwrap();

    let mut archive = NpzArchive::open(&path).unwrap();
    let err = archive.read("depo_data_0").unwrap_err();
    match err {
        NpzError::MissingEntry { name, path: p } => {
            assert_eq!(name, "depo_data_0");
            assert_eq!(p, path);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_fortran_order_is_transposed_to_row_major() {
    // 2x3 array [[1,2,3],[4,5,6]] stored column-major
    let mut payload = Vec::new();
    for v in [1i32, 4, 2, 5, 3, 6] {
        payload.extend_from_slice(&v.to_le_bytes());
    }
    let bytes = raw_npy(
        "{'descr': '<i4', 'fortran_order': True, 'shape': (2, 3), }",
        &payload,
    );

    let array = NpyArray::read(Cursor::new(bytes)).unwrap();
    let array = array.into_array2_i64().unwrap();
    assert_eq!(array, array![[1i64, 2, 3], [4, 5, 6]]);
}

#[test]
fn test_big_endian_floats() {
    let mut payload = Vec::new();
    payload.write_f64::<BigEndian>(1.5).unwrap();
    payload.write_f64::<BigEndian>(-2.25).unwrap();
    let bytes = raw_npy(
        "{'descr': '>f8', 'fortran_order': False, 'shape': (2,), }",
        &payload,
    );

    let array = NpyArray::read(Cursor::new(bytes)).unwrap();
    assert_eq!(array.into_array1_f64().unwrap().to_vec(), vec![1.5, -2.25]);
}

#[test]
fn test_unsigned_and_bool_widen_to_i64() {
    let bytes = raw_npy(
        "{'descr': '|u1', 'fortran_order': False, 'shape': (3,), }",
        &[0, 200, 255],
    );
    let array = NpyArray::read(Cursor::new(bytes)).unwrap();
    assert_eq!(array.into_i64_vec().unwrap(), vec![0, 200, 255]);

    let bytes = raw_npy(
        "{'descr': '|b1', 'fortran_order': False, 'shape': (2,), }",
        &[1, 0],
    );
    let array = NpyArray::read(Cursor::new(bytes)).unwrap();
    assert_eq!(array.into_i64_vec().unwrap(), vec![1, 0]);
}

#[test]
fn test_truncated_payload() {
    let bytes = raw_npy(
        "{'descr': '<f8', 'fortran_order': False, 'shape': (4,), }",
        &[0u8; 12],
    );
    let err = NpyArray::read(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(
        err,
        NpzError::Truncated {
            expected: 32,
            found: 12
        }
    ));
}

#[test]
fn test_rank_and_type_checks() {
    let bytes = raw_npy(
        "{'descr': '<f8', 'fortran_order': False, 'shape': (1,), }",
        &2.0f64.to_le_bytes(),
    );
    let array = NpyArray::read(Cursor::new(bytes)).unwrap();
    assert!(matches!(
        array.clone().into_array2_f64(),
        Err(NpzError::RankMismatch {
            expected: 2,
            found: 1
        })
    ));
    assert!(matches!(
        array.into_array1_i64(),
        Err(NpzError::TypeMismatch { .. })
    ));
}
