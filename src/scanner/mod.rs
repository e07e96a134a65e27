//! Incremental byte-stream scanner.
//!
//! ```text
//!             ┌──────────────┐  OK / ERROR
//!   byte ──┬─▶│ TokenMatcher │──────────────▶ ScanEvent::Ok / Error
//!          │  └──────────────┘
//!          │  ┌──────────────┐  prefix hit
//!          └─▶│ PrefixMatcher│──────────────▶ state = Capturing(id)
//!             └──────────────┘
//!   Capturing(id):
//!   byte ────▶ CaptureBuffer ───complete───▶ ScanEvent::Captured(id)
//! ```
//!
//! The scanner is fed one byte at a time and keeps all progress in its
//! own fields, so a response split across any number of reads produces
//! the same events as one delivered whole.

pub mod capture;
pub mod prefix;
pub mod token;

use capture::{CaptureBuffer, Feed};
use prefix::PrefixMatcher;
use token::{TokenMatch, TokenMatcher};

use crate::error::PatternError;

/// Index of a registered response pattern, in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatternId(pub(crate) usize);

impl PatternId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// What the scanner is doing with the next byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Looking for tokens and prefixes.
    Normal,
    /// Collecting the value for the given pattern.
    Capturing(PatternId),
}

/// Result of feeding one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEvent {
    None,
    Ok,
    Error,
    /// A value is ready in the capture buffer.
    Captured { id: PatternId, at_limit: bool },
}

/// Line-protocol scanner: tokens, prefixes and capture in one state machine.
///
/// `T` is the per-pattern payload, `P` the pattern capacity and `C` the
/// capture buffer size including its terminator slot.
pub struct Scanner<'a, T, const P: usize, const C: usize> {
    state: ScanState,
    tokens: TokenMatcher,
    prefixes: PrefixMatcher<'a, T, P>,
    capture: CaptureBuffer<C>,
}

impl<'a, T, const P: usize, const C: usize> Scanner<'a, T, P, C> {
    pub const fn new() -> Self {
        Self {
            state: ScanState::Normal,
            tokens: TokenMatcher::new(),
            prefixes: PrefixMatcher::new(),
            capture: CaptureBuffer::new(),
        }
    }

    pub fn register(&mut self, prefix: &'a str, payload: T) -> Result<PatternId, PatternError> {
        self.prefixes.register(prefix, payload)
    }

    pub fn feed(&mut self, byte: u8) -> ScanEvent {
        match self.state {
            ScanState::Capturing(id) => {
                if byte < 0x20 {
                    self.tokens.reset_on_line_boundary();
                }
                match self.capture.feed(byte) {
                    Feed::Pending => ScanEvent::None,
                    Feed::Complete { at_limit } => {
                        self.state = ScanState::Normal;
                        ScanEvent::Captured { id, at_limit }
                    }
                }
            }
            ScanState::Normal => {
                // Line breaks only re-arm the tokens; prefix cursors carry over.
                if byte < 0x20 {
                    self.tokens.reset_on_line_boundary();
                    return ScanEvent::None;
                }
                match self.tokens.observe(byte) {
                    TokenMatch::Ok => return ScanEvent::Ok,
                    TokenMatch::Error => return ScanEvent::Error,
                    TokenMatch::NoMatch => {}
                }
                if let Some(id) = self.prefixes.observe(byte) {
                    self.capture.begin();
                    self.state = ScanState::Capturing(id);
                }
                ScanEvent::None
            }
        }
    }

    /// Hand the payload of `id` and the current capture text to `f`.
    ///
    /// Returns `None` if `id` is unknown.
    pub fn with_capture<R>(&mut self, id: PatternId, f: impl FnOnce(&mut T, &str) -> R) -> Option<R> {
        let pattern = self.prefixes.get_mut(id)?;
        Some(f(&mut pattern.payload, self.capture.as_str()))
    }

    pub fn captured(&self) -> &str {
        self.capture.as_str()
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn pattern_count(&self) -> usize {
        self.prefixes.len()
    }

    pub fn prefix_of(&self, id: PatternId) -> Option<&[u8]> {
        self.prefixes.get(id).map(prefix::ResponsePattern::prefix)
    }
}

impl<T, const P: usize, const C: usize> Default for Scanner<'_, T, P, C> {
    fn default() -> Self {
        Self::new()
    }
}
