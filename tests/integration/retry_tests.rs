//! Timeout-driven resend and terminal failure.

use atpoll::{AtHandler, LinkConfig, LinkState};
use atpoll::adapters::memory::{ManualClock, MemoryStream};

use super::mock_link::{Link, Recorder, Seen, deliver, link, wire};

fn at(l: &mut Link<'_>, now_ms: u32) {
    l.clock_mut().set(now_ms);
    l.poll();
}

#[test]
fn resends_on_each_timeout_then_fails_once() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);
    l.enqueue_command_with_timeout("AT", 100).unwrap();
    l.enqueue_command("AT+CSQ").unwrap();
    assert_eq!(l.stream_mut().take_sent(), ["AT"]);

    at(&mut l, 50);
    assert!(l.stream_mut().take_sent().is_empty());

    at(&mut l, 100);
    assert_eq!(l.stream_mut().take_sent(), ["AT"]);
    at(&mut l, 200);
    assert_eq!(l.stream_mut().take_sent(), ["AT"]);

    at(&mut l, 300);
    assert!(l.stream_mut().take_sent().is_empty());
    assert_eq!(rec.take(), vec![Seen::Timeout]);
    assert_eq!(l.pending_commands(), 0);
    assert_eq!(l.link_state(), LinkState::Idle);

    at(&mut l, 5_000);
    assert!(rec.take().is_empty(), "timeout callback fires exactly once");
}

#[test]
fn enqueue_after_failure_behaves_like_fresh_queue() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);
    l.enqueue_command_with_timeout("AT", 100).unwrap();
    for t in [100, 200, 300] {
        at(&mut l, t);
    }
    assert_eq!(rec.count(&Seen::Timeout), 1);
    l.stream_mut().take_sent();

    l.enqueue_command("AT").unwrap();
    assert_eq!(l.stream_mut().take_sent(), ["AT"]);
    assert_eq!(l.retry_count(), 0);
    deliver(&mut l, b"\r\nOK\r\n");
    assert_eq!(l.link_state(), LinkState::Idle);
}

#[test]
fn ok_after_resend_resets_retry_budget() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);
    l.enqueue_command_with_timeout("A", 100).unwrap();
    l.enqueue_command_with_timeout("B", 100).unwrap();

    at(&mut l, 100);
    at(&mut l, 200);
    assert_eq!(l.retry_count(), 2);
    l.clock_mut().set(250);
    deliver(&mut l, b"\r\nOK\r\n");
    assert_eq!(l.retry_count(), 0);
    assert_eq!(l.in_flight(), Some("B"));

    // B gets its own full budget, measured from its own send time.
    at(&mut l, 349);
    assert_eq!(l.retry_count(), 0);
    at(&mut l, 350);
    assert_eq!(l.retry_count(), 1);
    assert!(rec.take().is_empty());
}

#[test]
fn error_does_not_touch_retry_state() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);
    l.enqueue_command_with_timeout("AT+BAD", 100).unwrap();
    at(&mut l, 100);
    deliver(&mut l, b"\r\nERROR\r\n");
    assert_eq!(rec.take(), vec![Seen::Error]);
    assert_eq!(l.retry_count(), 1);
    assert_eq!(l.in_flight(), Some("AT+BAD"));
}

#[test]
fn timeout_measured_across_clock_wrap() {
    let rec = Recorder::new();
    let mut l: Link<'_> = AtHandler::new(MemoryStream::new(), ManualClock::new(u32::MAX - 50));
    wire(&mut l, &[], &rec);
    l.enqueue_command_with_timeout("AT", 100).unwrap();

    at(&mut l, 48);
    assert_eq!(l.retry_count(), 0);
    at(&mut l, 49);
    assert_eq!(l.retry_count(), 1);
}

#[test]
fn configured_retry_budget_is_honoured() {
    let rec = Recorder::new();
    let config = LinkConfig {
        default_timeout_ms: 10,
        max_retries: 1,
    };
    let mut l: Link<'_> =
        AtHandler::with_config(MemoryStream::new(), ManualClock::new(0), config).unwrap();
    wire(&mut l, &[], &rec);
    l.enqueue_command("AT").unwrap();
    at(&mut l, 10);
    assert_eq!(rec.take(), vec![Seen::Timeout]);
    assert_eq!(l.stream_mut().take_sent(), ["AT"]);
}
