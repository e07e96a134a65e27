//! Continuous matching of caller-registered response prefixes.
//!
//! Unlike the token matcher this scan is not anchored to line starts:
//! `+CSQ:` is found anywhere in the stream, including straight after a
//! previous capture with no line break in between.
//!
//! The restart rule is deliberately simple. On a mismatch the cursor
//! drops back to 0 and the same byte is tried once more against the
//! first character; there is no failure-function backtracking, so a
//! prefix whose head repeats inside itself (e.g. `AAB` in `AAAB`) can
//! be missed.

use heapless::Vec;

use crate::error::PatternError;

use super::PatternId;

/// A registered prefix with its match cursor and attached payload.
///
/// The payload is whatever the owner wants to get back on a match;
/// [`AtHandler`](crate::handler::AtHandler) stores the callback there.
pub struct ResponsePattern<'a, T> {
    prefix: &'a [u8],
    cursor: usize,
    pub payload: T,
}

impl<T> ResponsePattern<'_, T> {
    pub fn prefix(&self) -> &[u8] {
        self.prefix
    }

    fn step(&mut self, byte: u8) -> bool {
        if self.prefix[self.cursor] != byte {
            self.cursor = 0;
        }
        if self.prefix[self.cursor] == byte {
            self.cursor += 1;
            return self.cursor == self.prefix.len();
        }
        false
    }
}

/// Fixed-capacity table of [`ResponsePattern`]s, checked in registration order.
pub struct PrefixMatcher<'a, T, const N: usize> {
    patterns: Vec<ResponsePattern<'a, T>, N>,
}

impl<'a, T, const N: usize> PrefixMatcher<'a, T, N> {
    pub const fn new() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    /// Append a pattern. Registration is append-only.
    pub fn register(&mut self, prefix: &'a str, payload: T) -> Result<PatternId, PatternError> {
        if prefix.is_empty() {
            return Err(PatternError::EmptyPrefix);
        }
        if prefix.bytes().any(|b| b < 0x20) {
            return Err(PatternError::ControlByte);
        }
        let id = PatternId(self.patterns.len());
        self.patterns
            .push(ResponsePattern {
                prefix: prefix.as_bytes(),
                cursor: 0,
                payload,
            })
            .map_err(|_| PatternError::TableFull)?;
        Ok(id)
    }

    /// Feed one byte to every pattern. Returns the first pattern that
    /// completed; on a hit every cursor restarts from 0.
    pub fn observe(&mut self, byte: u8) -> Option<PatternId> {
        let hit = self.patterns.iter_mut().position(|p| p.step(byte))?;
        self.reset_all();
        Some(PatternId(hit))
    }

    pub fn reset_all(&mut self) {
        for p in &mut self.patterns {
            p.cursor = 0;
        }
    }

    pub fn get_mut(&mut self, id: PatternId) -> Option<&mut ResponsePattern<'a, T>> {
        self.patterns.get_mut(id.0)
    }

    pub fn get(&self, id: PatternId) -> Option<&ResponsePattern<'a, T>> {
        self.patterns.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<T, const N: usize> Default for PrefixMatcher<'_, T, N> {
    fn default() -> Self {
        Self::new()
    }
}
