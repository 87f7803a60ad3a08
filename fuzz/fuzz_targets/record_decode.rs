#![no_main]

use beegfs_wire::{NodeDescriptor, NodeList, decode_from, encode_to_vec};
use libfuzzer_sys::fuzz_target;

// Whatever decodes must re-encode to exactly the bytes it consumed.
fuzz_target!(|data: &[u8]| {
    if let Ok((list, used)) = decode_from::<NodeList>(data) {
        assert!(used <= data.len());
        let bytes = encode_to_vec(&list).expect("decoded list re-encodes");
        assert_eq!(bytes.len(), used);
    }

    if let Ok((node, used)) = decode_from::<NodeDescriptor>(data) {
        let bytes = encode_to_vec(&node).expect("decoded node re-encodes");
        assert_eq!(bytes.len(), used);
    }
});
