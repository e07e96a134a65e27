//! In-memory stream and clock for host tests and simulation.
//!
//! [`MemoryStream`] plays the modem side: tests push response bytes in
//! with [`feed`](MemoryStream::feed) and read back the lines the
//! handler wrote with [`take_sent`](MemoryStream::take_sent).

use std::collections::VecDeque;

use crate::ports::{ByteStream, Clock};

/// Error returned when a [`MemoryStream`] is told to fail writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteRejected;

#[derive(Debug, Default)]
pub struct MemoryStream {
    rx: VecDeque<u8>,
    sent: Vec<String>,
    fail_writes: bool,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the handler to read.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Lines written so far, oldest first. Clears the record.
    pub fn take_sent(&mut self) -> Vec<String> {
        core::mem::take(&mut self.sent)
    }

    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Bytes still waiting to be read.
    pub fn pending_rx(&self) -> usize {
        self.rx.len()
    }

    /// Make every following `write_line` fail until switched off.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl ByteStream for MemoryStream {
    type Error = WriteRejected;

    fn available(&self) -> bool {
        !self.rx.is_empty()
    }

    fn read_byte(&mut self) -> Result<Option<u8>, WriteRejected> {
        Ok(self.rx.pop_front())
    }

    fn write_line(&mut self, line: &str) -> Result<(), WriteRejected> {
        if self.fail_writes {
            return Err(WriteRejected);
        }
        self.sent.push(line.to_owned());
        Ok(())
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManualClock {
    now_ms: u32,
}

impl ManualClock {
    pub const fn new(start_ms: u32) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn set(&mut self, now_ms: u32) {
        self.now_ms = now_ms;
    }

    /// Move forward, wrapping at `u32::MAX` like a hardware tick counter.
    pub fn advance(&mut self, delta_ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }
}
