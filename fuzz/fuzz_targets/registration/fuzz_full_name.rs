// Run with: cargo fuzz run fuzz_full_name
// Grapheme counting on arbitrary unicode must never panic.
#![no_main]

use accounts::domain::FullName;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = FullName::parse(s.to_string());
    }
});
