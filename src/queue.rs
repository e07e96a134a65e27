//! Serial command queue with timeout-driven retry.
//!
//! Only the front entry is ever in flight. The queue itself does no I/O:
//! it tells the [`AtHandler`](crate::handler::AtHandler) when the front
//! command has to go out (again) and when the retry budget is spent.
//!
//! ```text
//!            push to empty                 OK, more queued
//!   Idle ─────────────────▶ Waiting ◀──────────────────────┐
//!    ▲                       │  │ │                        │
//!    │   OK, queue empty     │  │ └── timeout < budget ──▶ resend
//!    ├───────────────────────┘  │
//!    │   timeout == budget      │
//!    └──────── clear all ◀──────┘
//! ```

use heapless::Deque;

use crate::error::QueueError;

/// A caller-owned command and how long to wait for its `OK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry<'a> {
    pub command: &'a str,
    pub timeout_ms: u32,
}

/// Queue-level link state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing in flight.
    Idle,
    /// The front command was sent and its `OK` is outstanding.
    Waiting,
}

/// Outcome of [`CommandQueue::check_timeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutCheck {
    /// Not waiting, or the deadline has not passed.
    NotDue,
    /// Deadline passed with retries left: send the front entry again.
    Resend { attempt: u8 },
    /// Retry budget spent: every queued command was discarded.
    Exhausted { dropped: usize },
}

pub struct CommandQueue<'a, const N: usize> {
    entries: Deque<QueueEntry<'a>, N>,
    waiting: bool,
    retry_count: u8,
    last_send_ms: u32,
}

impl<'a, const N: usize> CommandQueue<'a, N> {
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
            waiting: false,
            retry_count: 0,
            last_send_ms: 0,
        }
    }

    /// Append an entry. `Ok(true)` means the queue was empty and the
    /// entry must be sent right away.
    pub fn push(&mut self, entry: QueueEntry<'a>) -> Result<bool, QueueError> {
        let was_empty = self.entries.is_empty();
        self.entries.push_back(entry).map_err(|_| QueueError::Full)?;
        Ok(was_empty)
    }

    pub fn front(&self) -> Option<&QueueEntry<'a>> {
        self.entries.front()
    }

    /// Record that the front entry just went out at `now_ms`.
    pub fn mark_sent(&mut self, now_ms: u32) {
        if !self.entries.is_empty() {
            self.waiting = true;
            self.last_send_ms = now_ms;
        }
    }

    /// `OK` arrived: drop the front entry and reset the retry state.
    pub fn complete_front(&mut self) -> Option<QueueEntry<'a>> {
        let done = self.entries.pop_front();
        self.waiting = false;
        self.retry_count = 0;
        done
    }

    pub fn check_timeout(&mut self, now_ms: u32, max_retries: u8) -> TimeoutCheck {
        if !self.waiting {
            return TimeoutCheck::NotDue;
        }
        let Some(front) = self.entries.front() else {
            self.waiting = false;
            return TimeoutCheck::NotDue;
        };
        // Wrapping subtraction stays correct across a clock rollover.
        if now_ms.wrapping_sub(self.last_send_ms) < front.timeout_ms {
            return TimeoutCheck::NotDue;
        }
        self.retry_count = self.retry_count.saturating_add(1);
        if self.retry_count >= max_retries {
            let dropped = self.clear();
            return TimeoutCheck::Exhausted { dropped };
        }
        TimeoutCheck::Resend {
            attempt: self.retry_count,
        }
    }

    /// Discard everything and return to idle. Returns how many entries went.
    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        self.waiting = false;
        self.retry_count = 0;
        dropped
    }

    pub fn state(&self) -> LinkState {
        if self.waiting {
            LinkState::Waiting
        } else {
            LinkState::Idle
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn retry_count(&self) -> u8 {
        self.retry_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.is_full()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry<'a>> {
        self.entries.iter()
    }
}

impl<const N: usize> Default for CommandQueue<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}
