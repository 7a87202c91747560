//! Fuzz target for pkt-line framing.
//!
//! The reader must never panic, must stop after the first error, and every
//! frame it yields must re-encode to the bytes it was read from.

#![no_main]

use gitcmp_git::{PktLine, PktLineReader, MAX_DATA_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut consumed = 0;
    let mut reader = PktLineReader::new(data);

    while let Some(frame) = reader.next() {
        let Ok(frame) = frame else {
            assert!(reader.next().is_none());
            return;
        };
        if let PktLine::Data(payload) = &frame {
            assert!(payload.len() <= MAX_DATA_LEN);
        }
        let encoded = frame.encode();
        assert!(encoded[..4].eq_ignore_ascii_case(&data[consumed..consumed + 4]));
        assert_eq!(encoded[4..], data[consumed + 4..consumed + encoded.len()]);
        consumed += encoded.len();
    }

    assert_eq!(consumed, data.len());
});
