#![no_main]

use beegfs_wire::{
    ReadCursor, deserialize_char_array, deserialize_nested, deserialize_str,
    deserialize_str_align4,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut r = ReadCursor::new(data);
    if let Ok(view) = deserialize_str(&mut r) {
        assert_eq!(r.position(), 4 + view.len() + 1);
    }

    let mut r = ReadCursor::new(data);
    if deserialize_str_align4(&mut r).is_ok() {
        assert_eq!(r.position() % 4, 0);
    }

    let mut r = ReadCursor::new(data);
    let _ = deserialize_char_array(&mut r);
    assert!(r.position() <= data.len());

    let mut r = ReadCursor::new(data);
    if let Ok(inner) = deserialize_nested(&mut r) {
        assert_eq!(r.position(), 4 + inner.remaining());
    }
});
