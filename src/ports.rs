//! Port traits: the boundary between the AT handler and the outside world.
//!
//! ```text
//!   UART / memory ──▶ ByteStream ──▶ AtHandler ◀── Clock ◀── timer
//! ```
//!
//! The handler is generic over both traits, so the scanning and queue
//! logic never touches a peripheral directly and runs unchanged on the
//! host under test.

// ───────────────────────────────────────────────────────────────
// Byte stream (driven adapter: serial ↔ handler)
// ───────────────────────────────────────────────────────────────

/// Byte-oriented, line-writing serial channel.
///
/// Implementations must never block in [`read_byte`](Self::read_byte):
/// the handler only calls it after [`available`](Self::available)
/// returned `true`, and treats `Ok(None)` as "drained for now".
pub trait ByteStream {
    /// Error type for this stream.
    type Error: core::fmt::Debug;

    /// Whether at least one byte can be read without waiting.
    fn available(&self) -> bool;

    /// Read one byte. `Ok(None)` when nothing is buffered.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Write `line` followed by the stream's line terminator.
    fn write_line(&mut self, line: &str) -> Result<(), Self::Error>;
}

// ───────────────────────────────────────────────────────────────
// Clock (driven adapter: timer → handler)
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
///
/// The value is allowed to wrap at `u32::MAX`; the handler only ever
/// looks at `now.wrapping_sub(then)`.
pub trait Clock {
    fn now_ms(&self) -> u32;
}

impl<T: ByteStream + ?Sized> ByteStream for &mut T {
    type Error = T::Error;

    fn available(&self) -> bool {
        (**self).available()
    }

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_byte()
    }

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        (**self).write_line(line)
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
