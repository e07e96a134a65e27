//! ESP-IDF UART adapter.
//!
//! Implements [`ByteStream`] over an `esp_idf_hal` [`UartDriver`]. Reads
//! use a zero-tick timeout so [`AtHandler::poll`](crate::handler::AtHandler::poll)
//! never waits on the modem.

use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::uart::UartDriver;
use esp_idf_sys::EspError;

use crate::ports::ByteStream;

/// Line ending appended to every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Cr,
    CrLf,
}

impl LineEnding {
    const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Cr => b"\r",
            Self::CrLf => b"\r\n",
        }
    }
}

pub struct UartStream<'d> {
    uart: UartDriver<'d>,
    ending: LineEnding,
}

impl<'d> UartStream<'d> {
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self::with_line_ending(uart, LineEnding::CrLf)
    }

    pub fn with_line_ending(uart: UartDriver<'d>, ending: LineEnding) -> Self {
        Self { uart, ending }
    }

    fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), EspError> {
        while !bytes.is_empty() {
            let n = self.uart.write(bytes)?;
            if n == 0 {
                break;
            }
            bytes = &bytes[n..];
        }
        Ok(())
    }
}

impl ByteStream for UartStream<'_> {
    type Error = EspError;

    fn available(&self) -> bool {
        self.uart.remaining_read().is_ok_and(|n| n > 0)
    }

    fn read_byte(&mut self) -> Result<Option<u8>, EspError> {
        let mut byte = [0u8; 1];
        match self.uart.read(&mut byte, NON_BLOCK)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn write_line(&mut self, line: &str) -> Result<(), EspError> {
        self.write_all(line.as_bytes())?;
        self.write_all(self.ending.as_bytes())
    }
}
