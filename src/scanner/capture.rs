//! Bounded accumulator for the value that follows a matched prefix.
//!
//! `N` counts the terminator slot, so at most `N - 1` bytes of value are
//! kept. Once the buffer is full the next byte ends the capture and is
//! dropped, whatever it is. Longer values are cut off and still delivered.

use heapless::Vec;

/// Capture progress after one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// Keep feeding.
    Pending,
    /// Value is ready; `at_limit` when a byte arrived with the buffer full.
    Complete { at_limit: bool },
}

pub struct CaptureBuffer<const N: usize> {
    buf: Vec<u8, N>,
}

impl<const N: usize> CaptureBuffer<N> {
    const LIMIT: usize = {
        assert!(N >= 2, "capture buffer needs room for one byte plus terminator");
        N - 1
    };

    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Start a fresh capture, discarding the previous value.
    pub fn begin(&mut self) {
        self.buf.clear();
    }

    pub fn feed(&mut self, byte: u8) -> Feed {
        // Swallow the delimiter between prefix and value.
        if self.buf.is_empty() && (byte == b' ' || byte == b':') {
            return Feed::Pending;
        }
        if byte < 0x20 {
            return Feed::Complete { at_limit: false };
        }
        if self.buf.len() >= Self::LIMIT {
            return Feed::Complete { at_limit: true };
        }
        // len < LIMIT < N, so the push cannot fail.
        let _ = self.buf.push(byte);
        Feed::Pending
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// The captured value as text. Invalid UTF-8 is cut at the first bad byte.
    pub fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.buf) {
            Ok(s) => s,
            Err(e) => {
                core::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or_default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        Self::LIMIT
    }
}

impl<const N: usize> Default for CaptureBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
