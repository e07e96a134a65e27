//! atpoll demo firmware: SIM800-class modem on UART1.
//!
//! ```text
//! ┌──────────────┐  UART1 115200 8N1   ┌──────────────┐
//! │   ESP32-S3   │ TX GPIO17 ────────▶ │    SIM800    │
//! │   main loop  │ RX GPIO18 ◀──────── │    modem     │
//! └──────────────┘                     └──────────────┘
//! ```
//!
//! Registers handlers for signal quality and network registration,
//! re-queues a status query every few seconds, and keeps polling.
#![deny(unused_must_use)]

use core::cell::Cell;

use anyhow::Result;
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::uart::{UartDriver, config::Config as UartConfig};
use esp_idf_hal::units::Hertz;
use log::{info, warn};

use atpoll::adapters::time::SystemClock;
use atpoll::adapters::uart::UartStream;
use atpoll::{AtHandler, Clock, LinkConfig};

/// Interval between status queries.
const STATUS_INTERVAL_MS: u32 = 5_000;

const STATUS_COMMANDS: [&str; 2] = ["AT+CSQ", "AT+CREG?"];

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("atpoll demo v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. UART to the modem ──────────────────────────────────
    let peripherals = Peripherals::take()?;
    let uart = UartDriver::new(
        peripherals.uart1,
        peripherals.pins.gpio17,
        peripherals.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(115_200)),
    )?;

    // ── 3. Handler + callbacks ────────────────────────────────
    let rssi = Cell::new(None::<u8>);
    let registered = Cell::new(false);
    let failures = Cell::new(0u32);

    let config = LinkConfig {
        default_timeout_ms: 1_000,
        ..LinkConfig::default()
    };
    let mut modem: AtHandler<'_, _, _> =
        AtHandler::with_config(UartStream::new(uart), SystemClock::new(), config)?;

    modem.register_pattern("+CSQ:", |value| {
        // "<rssi>,<ber>"; 99 means unknown.
        let parsed = value.split(',').next().and_then(|s| s.trim().parse::<u8>().ok());
        rssi.set(parsed.filter(|&r| r != 99));
    })?;
    modem.register_pattern("+CREG:", |value| {
        // "<n>,<stat>"; 1 = home, 5 = roaming.
        let stat = value.split(',').nth(1).map(str::trim);
        registered.set(matches!(stat, Some("1" | "5")));
    })?;
    modem.on_error(|| warn!("modem answered ERROR"));
    modem.on_timeout(|| {
        failures.set(failures.get() + 1);
        warn!("modem not responding ({} failures)", failures.get());
    });

    for cmd in ["AT", "ATE0", "AT+CMEE=1"] {
        modem.enqueue_command(cmd)?;
    }

    // ── 4. Main loop ──────────────────────────────────────────
    let mut last_status = modem.clock().now_ms();
    loop {
        modem.poll();

        let now = modem.clock().now_ms();
        if now.wrapping_sub(last_status) >= STATUS_INTERVAL_MS {
            last_status = now;
            if modem.pending_commands() == 0 {
                for cmd in STATUS_COMMANDS {
                    if let Err(e) = modem.enqueue_command(cmd) {
                        warn!("status query skipped: {}", e);
                    }
                }
            }
            let stats = modem.stats();
            info!(
                "MODEM | rssi={:?} registered={} | sent={} ok={} err={} resend={} fail={}",
                rssi.get(),
                registered.get(),
                stats.commands_sent,
                stats.ok_received,
                stats.error_received,
                stats.resends,
                stats.terminal_failures,
            );
        }

        esp_idf_hal::delay::FreeRtos::delay_ms(10);
    }
}
