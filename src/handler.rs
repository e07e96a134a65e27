//! The AT handler: poll dispatcher for one modem link.
//!
//! [`AtHandler`] owns the scanner, the command queue and the callbacks.
//! The caller's main loop invokes [`poll`](AtHandler::poll) as often as
//! timing precision requires; each call drains every byte the stream
//! currently has, dispatches callbacks, then runs one timeout check.
//! Nothing here blocks or spawns.
//!
//! ```text
//!  ByteStream ──▶ ┌───────────────────────────┐ ──▶ pattern callbacks
//!                 │         AtHandler         │ ──▶ on_error / on_timeout
//!  ByteStream ◀── │  Scanner · CommandQueue   │
//!       Clock ──▶ └───────────────────────────┘
//! ```
//!
//! Commands and prefixes are borrowed for `'a`, not copied: the caller
//! keeps them alive for as long as the handler may still send or match
//! them.

use log::{debug, info, warn};

use crate::config::{
    DEFAULT_CAPTURE_CAPACITY, DEFAULT_PATTERN_CAPACITY, DEFAULT_QUEUE_CAPACITY, LinkConfig,
};
use crate::error::Result;
use crate::ports::{ByteStream, Clock};
use crate::queue::{CommandQueue, LinkState, QueueEntry, TimeoutCheck};
use crate::scanner::{PatternId, ScanEvent, ScanState, Scanner};

/// Callback receiving the value captured after a prefix.
pub type ResponseCallback<'a> = Box<dyn FnMut(&str) + 'a>;
/// Callback for queue-level events (`ERROR` line, retries exhausted).
pub type LinkCallback<'a> = Box<dyn FnMut() + 'a>;

/// Running counters for the link. Never reset by the handler; they wrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Lines written, resends included.
    pub commands_sent: u32,
    pub ok_received: u32,
    pub error_received: u32,
    pub captures: u32,
    /// Captures ended by the buffer limit rather than a terminator.
    pub captures_at_limit: u32,
    pub resends: u32,
    /// Times the retry budget ran out and the queue was cleared.
    pub terminal_failures: u32,
    /// Commands lost to a full queue or a terminal failure.
    pub commands_dropped: u32,
    /// Read or write errors reported by the stream.
    pub io_errors: u32,
}

fn bump(counter: &mut u32, n: u32) {
    *counter = counter.wrapping_add(n);
}

/// Non-blocking AT command/response handler.
///
/// `P` bounds the number of response patterns, `Q` the command queue and
/// `C` the capture buffer (terminator slot included).
pub struct AtHandler<
    'a,
    S: ByteStream,
    K: Clock,
    const P: usize = DEFAULT_PATTERN_CAPACITY,
    const Q: usize = DEFAULT_QUEUE_CAPACITY,
    const C: usize = DEFAULT_CAPTURE_CAPACITY,
> {
    stream: S,
    clock: K,
    config: LinkConfig,
    scanner: Scanner<'a, ResponseCallback<'a>, P, C>,
    queue: CommandQueue<'a, Q>,
    on_timeout: Option<LinkCallback<'a>>,
    on_error: Option<LinkCallback<'a>>,
    stats: LinkStats,
}

impl<'a, S: ByteStream, K: Clock, const P: usize, const Q: usize, const C: usize>
    AtHandler<'a, S, K, P, Q, C>
{
    /// Construct with the default [`LinkConfig`].
    pub fn new(stream: S, clock: K) -> Self {
        Self::build(stream, clock, LinkConfig::default())
    }

    /// Construct with a validated configuration.
    pub fn with_config(stream: S, clock: K, config: LinkConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(stream, clock, config))
    }

    fn build(stream: S, clock: K, config: LinkConfig) -> Self {
        Self {
            stream,
            clock,
            config,
            scanner: Scanner::new(),
            queue: CommandQueue::new(),
            on_timeout: None,
            on_error: None,
            stats: LinkStats::default(),
        }
    }

    // ── Setup ─────────────────────────────────────────────────

    /// Invoke `callback` with the value following every occurrence of `prefix`.
    pub fn register_pattern(
        &mut self,
        prefix: &'a str,
        callback: impl FnMut(&str) + 'a,
    ) -> Result<PatternId> {
        let id = self.scanner.register(prefix, Box::new(callback))?;
        info!("AT: registered pattern '{}' as #{}", prefix, id.index());
        Ok(id)
    }

    /// Called once each time the retry budget runs out and the queue is cleared.
    pub fn on_timeout(&mut self, callback: impl FnMut() + 'a) {
        self.on_timeout = Some(Box::new(callback));
    }

    /// Called for every line-leading `ERROR`. The queue is left untouched.
    pub fn on_error(&mut self, callback: impl FnMut() + 'a) {
        self.on_error = Some(Box::new(callback));
    }

    // ── Commands ──────────────────────────────────────────────

    /// Queue `command` with the configured default timeout.
    pub fn enqueue_command(&mut self, command: &'a str) -> Result<()> {
        self.enqueue_command_with_timeout(command, self.config.default_timeout_ms)
    }

    /// Queue `command`; if nothing was queued it is sent immediately.
    ///
    /// A full queue drops the command and leaves all state unchanged.
    pub fn enqueue_command_with_timeout(&mut self, command: &'a str, timeout_ms: u32) -> Result<()> {
        let entry = QueueEntry {
            command,
            timeout_ms,
        };
        match self.queue.push(entry) {
            Ok(true) => {
                self.send_front();
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                bump(&mut self.stats.commands_dropped, 1);
                warn!("AT: queue full ({}), dropped '{}'", self.queue.len(), command);
                Err(e.into())
            }
        }
    }

    // ── Polling ───────────────────────────────────────────────

    /// Drain all available bytes, dispatch callbacks, then check for timeout.
    pub fn poll(&mut self) {
        while self.stream.available() {
            let byte = match self.stream.read_byte() {
                Ok(Some(b)) => b,
                Ok(None) => break,
                Err(e) => {
                    bump(&mut self.stats.io_errors, 1);
                    warn!("AT: read failed: {:?}", e);
                    break;
                }
            };
            self.handle_byte(byte);
        }
        self.check_timeout();
    }

    fn handle_byte(&mut self, byte: u8) {
        match self.scanner.feed(byte) {
            ScanEvent::None => {}
            ScanEvent::Ok => self.handle_ok(),
            ScanEvent::Error => self.handle_error(),
            ScanEvent::Captured { id, at_limit } => {
                bump(&mut self.stats.captures, 1);
                if at_limit {
                    bump(&mut self.stats.captures_at_limit, 1);
                }
                self.scanner.with_capture(id, |callback, value| {
                    debug!("AT: capture #{} = '{}'", id.index(), value);
                    callback(value);
                });
            }
        }
    }

    fn handle_ok(&mut self) {
        bump(&mut self.stats.ok_received, 1);
        if let Some(done) = self.queue.complete_front() {
            info!("AT: OK for '{}', {} left", done.command, self.queue.len());
        }
        self.send_front();
    }

    fn handle_error(&mut self) {
        bump(&mut self.stats.error_received, 1);
        warn!(
            "AT: ERROR while '{}' in flight",
            self.queue.front().map_or("<none>", |e| e.command)
        );
        if let Some(callback) = self.on_error.as_mut() {
            callback();
        }
    }

    fn check_timeout(&mut self) {
        let now = self.clock.now_ms();
        match self.queue.check_timeout(now, self.config.max_retries) {
            TimeoutCheck::NotDue => {}
            TimeoutCheck::Resend { attempt } => {
                bump(&mut self.stats.resends, 1);
                warn!(
                    "AT: timeout, resend {}/{} of '{}'",
                    attempt,
                    self.config.max_retries.saturating_sub(1),
                    self.queue.front().map_or("", |e| e.command)
                );
                self.send_front();
            }
            TimeoutCheck::Exhausted { dropped } => {
                bump(&mut self.stats.terminal_failures, 1);
                bump(&mut self.stats.commands_dropped, dropped as u32);
                warn!(
                    "AT: no response after {} tries, dropped {} command(s)",
                    self.config.max_retries, dropped
                );
                if let Some(callback) = self.on_timeout.as_mut() {
                    callback();
                }
            }
        }
    }

    /// Write the front command (if any) and start its timeout window.
    fn send_front(&mut self) {
        let Some(&QueueEntry { command, .. }) = self.queue.front() else {
            return;
        };
        debug!("AT: >> {}", command);
        if let Err(e) = self.stream.write_line(command) {
            // Still counts as sent: the timeout path will retry it.
            bump(&mut self.stats.io_errors, 1);
            warn!("AT: write of '{}' failed: {:?}", command, e);
        }
        bump(&mut self.stats.commands_sent, 1);
        self.queue.mark_sent(self.clock.now_ms());
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// The command currently awaiting its `OK`.
    pub fn in_flight(&self) -> Option<&'a str> {
        if self.queue.is_waiting() {
            self.queue.front().map(|e| e.command)
        } else {
            None
        }
    }

    pub fn queued(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.queue.iter().map(|e| e.command)
    }

    pub fn is_waiting(&self) -> bool {
        self.queue.is_waiting()
    }

    pub fn retry_count(&self) -> u8 {
        self.queue.retry_count()
    }

    pub fn link_state(&self) -> LinkState {
        self.queue.state()
    }

    pub fn scan_state(&self) -> ScanState {
        self.scanner.state()
    }

    pub fn pattern_count(&self) -> usize {
        self.scanner.pattern_count()
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }

    /// Tear down and return the owned stream and clock.
    pub fn into_parts(self) -> (S, K) {
        (self.stream, self.clock)
    }
}
