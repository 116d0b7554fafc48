#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Malformed headers and short payloads must be errors, never panics
    if let Ok(array) = ssss_pdsp::npz::NpyArray::read(Cursor::new(data)) {
        match array.ndim() {
            1 => {
                let _ = array.into_array1_f64();
            }
            2 => {
                let _ = array.clone().into_array2_i64();
                let _ = array.into_array2_f64();
            }
            _ => {
                let _ = array.into_f64_dyn();
            }
        }
    }
});
