//! Line-anchored `OK` / `ERROR` detection.
//!
//! Each token has its own cursor. A cursor is armed at position 0 by a
//! line-boundary control byte and is disabled by the first mismatching
//! byte, so a token is only recognised when it is the first thing on a
//! line. `XOK` never matches; `\r\nOK` does.

const OK: &[u8] = b"OK";
const ERROR: &[u8] = b"ERROR";

/// Outcome of feeding one byte to the [`TokenMatcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMatch {
    NoMatch,
    Ok,
    Error,
}

/// Match position inside a literal, or disabled until the next line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Armed(usize),
    Disabled,
}

impl Cursor {
    /// Advance over `byte`. Returns `true` when `literal` has just completed.
    fn step(&mut self, literal: &[u8], byte: u8) -> bool {
        let Self::Armed(pos) = *self else {
            return false;
        };
        if literal.get(pos) != Some(&byte) {
            *self = Self::Disabled;
            return false;
        }
        if pos + 1 == literal.len() {
            // Consumed: nothing more on this line can match.
            *self = Self::Disabled;
            return true;
        }
        *self = Self::Armed(pos + 1);
        false
    }
}

/// Incremental matcher for the two final-result tokens.
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    ok: Cursor,
    error: Cursor,
}

impl TokenMatcher {
    /// Both cursors start armed: the start of the stream counts as a line start.
    pub const fn new() -> Self {
        Self {
            ok: Cursor::Armed(0),
            error: Cursor::Armed(0),
        }
    }

    /// Re-arm both tokens. Call on every control byte (`< 0x20`).
    pub fn reset_on_line_boundary(&mut self) {
        self.ok = Cursor::Armed(0);
        self.error = Cursor::Armed(0);
    }

    /// Feed one printable byte.
    pub fn observe(&mut self, byte: u8) -> TokenMatch {
        let ok = self.ok.step(OK, byte);
        let error = self.error.step(ERROR, byte);
        if ok {
            TokenMatch::Ok
        } else if error {
            TokenMatch::Error
        } else {
            TokenMatch::NoMatch
        }
    }
}

impl Default for TokenMatcher {
    fn default() -> Self {
        Self::new()
    }
}
