//! Fuzz target: `AtHandler::poll`
//!
//! The first byte of each chunk selects a clock step, the rest is modem
//! output. The handler must never panic and never send more lines than
//! were queued plus resends.
//!
//! cargo fuzz run fuzz_handler

#![no_main]

use atpoll::AtHandler;
use atpoll::adapters::memory::{ManualClock, MemoryStream};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut modem: AtHandler<'_, MemoryStream, ManualClock, 4, 4, 16> =
        AtHandler::new(MemoryStream::new(), ManualClock::new(u32::MAX - 500));
    let _ = modem.register_pattern("+CSQ:", |v| assert!(v.len() <= 15));
    let _ = modem.register_pattern("+CREG:", |v| assert!(v.len() <= 15));
    for cmd in ["AT", "AT+CSQ", "AT+CREG?", "ATI", "AT+CGMR"] {
        let _ = modem.enqueue_command(cmd);
    }

    for chunk in data.chunks(9) {
        let Some((step, bytes)) = chunk.split_first() else {
            continue;
        };
        modem.clock_mut().advance(u32::from(*step) * 4);
        modem.stream_mut().feed(bytes);
        modem.poll();
        assert!(modem.pending_commands() <= 4);
    }

    let stats = modem.stats();
    let sent = modem.stream().sent().len() as u32;
    assert_eq!(sent, stats.commands_sent);
    assert!(sent <= 4 + stats.resends + stats.ok_received);
});
