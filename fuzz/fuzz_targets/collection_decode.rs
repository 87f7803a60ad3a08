#![no_main]

use std::collections::{BTreeMap, BTreeSet, LinkedList};

use beegfs_wire::{
    NicAddress, NodeDescriptor, ReadCursor, decode_from, encode_to_vec, preprocess_fixed_list,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let as_vector = decode_from::<Vec<String>>(data);
    let as_list = decode_from::<LinkedList<String>>(data)
        .map(|(l, used)| (l.into_iter().collect::<Vec<_>>(), used));
    assert_eq!(as_vector, as_list);

    // Byte strings accept everything UTF-8 strings do and re-encode exactly.
    match decode_from::<Vec<&[u8]>>(data) {
        Ok((names, used)) => {
            let bytes = encode_to_vec(&names).expect("decoded names re-encode");
            assert_eq!(bytes, data[..used]);
        },
        Err(_) => assert!(as_vector.is_err()),
    }

    let _ = decode_from::<BTreeSet<String>>(data);
    let _ = decode_from::<Vec<NodeDescriptor>>(data);
    let _ = decode_from::<Vec<(u32, String)>>(data);
    let _ = decode_from::<BTreeMap<u16, Vec<u8>>>(data);
    let _ = decode_from::<Vec<u8>>(data);
    let _ = decode_from::<Vec<u16>>(data);

    if let Ok((numbers, used)) = decode_from::<Vec<i64>>(data) {
        assert_eq!(used, 8 + numbers.len() * 8);
    }

    let mut r = ReadCursor::new(data);
    if let Ok(raw) = preprocess_fixed_list::<NicAddress>(&mut r) {
        assert_eq!(raw.materialize().len(), raw.len());
    }
});
