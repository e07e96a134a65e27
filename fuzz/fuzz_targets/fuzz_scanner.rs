//! Fuzz target: `Scanner::feed`
//!
//! Drives arbitrary bytes through the response scanner and checks that
//! captures stay within the buffer and that a capture is only reported
//! for a registered pattern.
//!
//! cargo fuzz run fuzz_scanner

#![no_main]

use atpoll::scanner::{ScanEvent, Scanner};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut scanner: Scanner<'_, (), 4, 16> = Scanner::new();
    for prefix in ["+CSQ:", "+CREG:", "RING", "+"] {
        let _ = scanner.register(prefix, ());
    }

    for &byte in data {
        if let ScanEvent::Captured { id, .. } = scanner.feed(byte) {
            assert!(id.index() < scanner.pattern_count());
            let len = scanner.captured().len();
            assert!(len <= 15, "capture overran buffer: {len}");
        }
    }
});
