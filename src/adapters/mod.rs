//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter  | Implements  | Connects to                    |
//! |----------|-------------|--------------------------------|
//! | `memory` | ByteStream  | In-memory RX/TX (tests, sim)   |
//! |          | Clock       | Manually advanced time         |
//! | `time`   | Clock       | ESP32 system timer / `Instant` |
//! | `uart`   | ByteStream  | ESP-IDF UART driver            |

pub mod memory;
pub mod time;
#[cfg(feature = "espidf")]
pub mod uart;
