//! Prefix matching and value capture through the full poll path.

use atpoll::{AtHandler, ScanState};
use atpoll::adapters::memory::{ManualClock, MemoryStream};

use super::mock_link::{Recorder, SmallCaptureLink, deliver, link, value, wire};

#[test]
fn csq_value_delivered_once_without_separator() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &["+CSQ:"], &rec);

    deliver(&mut l, b"+CSQ: 15,99\r\n");
    assert_eq!(rec.take(), vec![value("+CSQ:", "15,99")]);
}

#[test]
fn overlong_value_truncated_to_capacity_minus_one() {
    let rec = Recorder::new();
    let mut l: SmallCaptureLink<'_> = AtHandler::new(MemoryStream::new(), ManualClock::new(0));
    wire(&mut l, &["+X:"], &rec);

    let mut bytes = b"+X:".to_vec();
    bytes.extend_from_slice(&[b'a'; 20]);
    deliver(&mut l, &bytes);

    assert_eq!(rec.take(), vec![value("+X:", "aaaaaaa")]);
    assert_eq!(l.stats().captures_at_limit, 1);
    assert_eq!(l.scan_state(), ScanState::Normal);
}

#[test]
fn capture_split_across_polls() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &["+CREG:"], &rec);

    deliver(&mut l, b"\r\n+CR");
    deliver(&mut l, b"EG: 0");
    assert!(matches!(l.scan_state(), ScanState::Capturing(_)));
    deliver(&mut l, b",1\r\n");
    assert_eq!(rec.take(), vec![value("+CREG:", "0,1")]);
}

#[test]
fn patterns_fire_in_stream_order() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &["+CSQ:", "+CREG:"], &rec);

    deliver(&mut l, b"+CREG: 0,5\r\n+CSQ: 7,0\r\n+CREG: 0,1\r\n");
    assert_eq!(
        rec.take(),
        vec![
            value("+CREG:", "0,5"),
            value("+CSQ:", "7,0"),
            value("+CREG:", "0,1"),
        ]
    );
    assert_eq!(l.stats().captures, 3);
}

#[test]
fn unsolicited_result_while_command_in_flight() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &["+CMTI:"], &rec);
    l.enqueue_command("AT+CSQ").unwrap();

    deliver(&mut l, b"\r\n+CMTI: \"SM\",3\r\n");
    assert_eq!(rec.take(), vec![value("+CMTI:", "\"SM\",3")]);
    assert_eq!(l.in_flight(), Some("AT+CSQ"));
}

#[test]
fn empty_value_is_still_delivered() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &["RING"], &rec);

    deliver(&mut l, b"\r\nRING\r\n");
    assert_eq!(rec.take(), vec![value("RING", "")]);
}

#[test]
fn prefix_split_by_line_break_still_matches() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &["+CSQ:"], &rec);

    deliver(&mut l, b"+CS\r\nQ: 5\r\n");
    assert_eq!(rec.take(), vec![value("+CSQ:", "5")]);
}

#[test]
fn byte_after_full_capture_is_consumed() {
    let rec = Recorder::new();
    let mut l: SmallCaptureLink<'_> = AtHandler::new(MemoryStream::new(), ManualClock::new(0));
    wire(&mut l, &["+CSQ:"], &rec);

    // The '+' arriving with the buffer full ends the capture and is lost,
    // so the second prefix is never seen.
    deliver(&mut l, b"+CSQ:1234567+CSQ:9\r\n");
    assert_eq!(rec.take(), vec![value("+CSQ:", "1234567")]);
    assert_eq!(l.stats().captures_at_limit, 1);
}
