//! Non-blocking AT command/response handler.
//!
//! Talks to cellular modules (SIM800/SIM900 class and friends) over a
//! byte-oriented serial link from a single cooperative loop: queue
//! commands, register callbacks for response prefixes such as `+CSQ:`,
//! and call [`AtHandler::poll`] repeatedly. No call ever blocks.
//!
//! ```no_run
//! use atpoll::adapters::memory::MemoryStream;
//! use atpoll::adapters::time::SystemClock;
//! use atpoll::AtHandler;
//!
//! let mut modem: AtHandler<'_, _, _> = AtHandler::new(MemoryStream::new(), SystemClock::new());
//! modem.register_pattern("+CSQ:", |v| println!("signal: {v}")).unwrap();
//! modem.enqueue_command("AT+CSQ").unwrap();
//! loop {
//!     modem.poll();
//! }
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod config;
pub mod handler;
pub mod ports;
pub mod queue;
pub mod scanner;

mod error;

pub use config::LinkConfig;
pub use error::{Error, PatternError, QueueError, Result};
pub use handler::{AtHandler, LinkStats};
pub use ports::{ByteStream, Clock};
pub use queue::LinkState;
pub use scanner::{PatternId, ScanState};
