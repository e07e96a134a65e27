//! Final-result tokens are only recognised at the start of a line.

use super::mock_link::{Recorder, Seen, deliver, link, wire};

#[test]
fn ok_mid_line_does_not_complete_command() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);
    l.enqueue_command("AT").unwrap();

    deliver(&mut l, b"\r\nXOK\r\n");
    assert_eq!(l.in_flight(), Some("AT"), "XOK must not count as OK");
    assert_eq!(l.stats().ok_received, 0);

    deliver(&mut l, b"\r\nOK\r\n");
    assert_eq!(l.in_flight(), None);
    assert_eq!(l.stats().ok_received, 1);
}

#[test]
fn error_mid_line_is_not_reported() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);

    deliver(&mut l, b"\r\nNO ERROR HERE\r\n+CME ERROR: 3\r\n");
    assert!(rec.take().is_empty());

    deliver(&mut l, b"\r\nERROR\r\n");
    assert_eq!(rec.take(), vec![Seen::Error]);
}

#[test]
fn lone_newline_is_enough_to_rearm() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);
    l.enqueue_command("AT").unwrap();

    deliver(&mut l, b"AT\nOK\n");
    assert_eq!(l.pending_commands(), 0);
}

#[test]
fn echoed_command_line_does_not_confuse_tokens() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &["+CSQ:"], &rec);
    l.enqueue_command("AT+CSQ").unwrap();

    // Echo enabled: the modem repeats the command before answering.
    deliver(&mut l, b"AT+CSQ\r\r\n+CSQ: 21,0\r\n\r\nOK\r\n");
    assert_eq!(rec.take(), vec![super::mock_link::value("+CSQ:", "21,0")]);
    assert_eq!(l.pending_commands(), 0);
}
