//! Fuzz target for ref advertisement parsing.

#![no_main]

use gitcmp_git::{parse_advertisement, RefLine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = RefLine::parse(data) {
        assert!(!line.name.is_empty());
        assert!(line.name.bytes().all(|b| (0x20..=0x7e).contains(&b)));
    }

    if let Ok(refs) = parse_advertisement(data) {
        for (name, _) in &refs {
            assert!(!name.is_empty());
        }
    }
});
