//! Unified error types for the AT link.
//!
//! A single `Error` enum that every fallible setup call funnels into.
//! All variants are `Copy`; nothing here allocates, so errors can be
//! returned from the polling path without touching the heap.
//!
//! Note that `poll()` itself never fails: stream I/O problems are logged
//! and absorbed by the retry machinery.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The command queue rejected an entry.
    Queue(QueueError),
    /// A response pattern could not be registered.
    Pattern(PatternError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queue(e) => write!(f, "queue: {e}"),
            Self::Pattern(e) => write!(f, "pattern: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Queue errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// Queue is at capacity; the command was dropped.
    Full,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "command queue full, command dropped"),
        }
    }
}

impl From<QueueError> for Error {
    fn from(e: QueueError) -> Self {
        Self::Queue(e)
    }
}

// ---------------------------------------------------------------------------
// Pattern errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Every pattern slot is taken.
    TableFull,
    /// A zero-length prefix would match every byte.
    EmptyPrefix,
    /// Control bytes never reach the prefix matcher, so this could not match.
    ControlByte,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableFull => write!(f, "pattern table full"),
            Self::EmptyPrefix => write!(f, "empty prefix"),
            Self::ControlByte => write!(f, "prefix contains a control byte"),
        }
    }
}

impl From<PatternError> for Error {
    fn from(e: PatternError) -> Self {
        Self::Pattern(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
