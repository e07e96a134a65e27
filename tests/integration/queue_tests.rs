//! Serial command pipelining and queue bounds.

use atpoll::{Error, LinkState, QueueError};

use super::mock_link::{Recorder, deliver, link, wire};

#[test]
fn second_command_waits_for_ok_then_goes_automatically() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);

    l.enqueue_command("AT").unwrap();
    assert_eq!(l.stream_mut().take_sent(), ["AT"]);

    l.enqueue_command("AT+CSQ").unwrap();
    l.poll();
    assert!(l.stream_mut().take_sent().is_empty(), "must not send while AT in flight");

    deliver(&mut l, b"\r\nOK\r\n");
    assert_eq!(l.stream_mut().take_sent(), ["AT+CSQ"]);
    assert_eq!(l.in_flight(), Some("AT+CSQ"));
}

#[test]
fn commands_leave_in_fifo_order() {
    let rec = Recorder::new();
    let mut l = link();
    wire(&mut l, &[], &rec);
    for cmd in ["AT", "ATE0", "AT+CMEE=1", "AT+CSQ"] {
        l.enqueue_command(cmd).unwrap();
    }
    for _ in 0..4 {
        deliver(&mut l, b"\r\nOK\r\n");
    }
    assert_eq!(l.stream_mut().take_sent(), ["AT", "ATE0", "AT+CMEE=1", "AT+CSQ"]);
    assert_eq!(l.link_state(), LinkState::Idle);
}

#[test]
fn twenty_first_command_is_rejected() {
    let commands: Vec<String> = (0..21).map(|i| format!("AT+X={i}")).collect();
    let mut l = link();
    for cmd in &commands[..20] {
        l.enqueue_command(cmd).unwrap();
    }
    assert_eq!(l.enqueue_command(&commands[20]), Err(Error::Queue(QueueError::Full)));
    assert_eq!(l.pending_commands(), 20);
    assert_eq!(l.queued().last(), Some("AT+X=19"));
}

#[test]
fn several_oks_in_one_poll_drain_several_commands() {
    let mut l = link();
    for cmd in ["A", "B", "C"] {
        l.enqueue_command(cmd).unwrap();
    }
    deliver(&mut l, b"\r\nOK\r\n\r\nOK\r\n");
    assert_eq!(l.stream_mut().take_sent(), ["A", "B", "C"]);
    assert_eq!(l.in_flight(), Some("C"));
}

#[test]
fn stray_ok_on_idle_link_is_harmless() {
    let mut l = link();
    deliver(&mut l, b"\r\nOK\r\n");
    assert_eq!(l.link_state(), LinkState::Idle);
    assert!(l.stream_mut().take_sent().is_empty());
}
