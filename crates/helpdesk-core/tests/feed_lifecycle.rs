//! Subscription lifecycle of the live log feed against real and scripted sources.

use helpdesk_core::clock::{Clock, SystemClock};
use helpdesk_core::logs::{IntervalLogStream, LOG_MESSAGES, LogFeed, ScriptedLogSource};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn fast_stream() -> IntervalLogStream {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    IntervalLogStream::new(Duration::from_millis(5), clock)
}

fn message_of(entry: &str) -> &str {
    entry.split_once("] ").map_or("", |(_, message)| message)
}

#[test]
fn interval_feed_fills_with_well_formed_entries() {
    let stream = fast_stream();
    let mut feed = LogFeed::new();
    feed.start(&stream);

    let mut received = 0;
    for _ in 0..100 {
        received += feed.pump_blocking(Duration::from_secs(1));
        if received >= 3 {
            break;
        }
    }
    assert!(received >= 3, "only {received} entries arrived");

    for entry in feed.entries() {
        assert!(entry.starts_with('['), "{entry}");
        assert!(LOG_MESSAGES.contains(&message_of(entry)), "{entry}");
    }
    feed.stop();
}

#[test]
fn nothing_lands_after_teardown_of_a_running_timer() {
    let stream = fast_stream();
    let mut feed = LogFeed::new();
    feed.start(&stream);
    feed.pump_blocking(Duration::from_secs(1));

    feed.stop();
    let frozen = feed.len();
    thread::sleep(Duration::from_millis(40));
    assert_eq!(feed.pump(), 0);
    assert_eq!(feed.pump_blocking(Duration::from_millis(20)), 0);
    assert_eq!(feed.len(), frozen);
}

#[test]
fn emission_racing_teardown_never_appears() {
    let source = ScriptedLogSource::new();
    let mut feed = LogFeed::new();
    feed.start(&source);
    source.emit("[9:00:00 AM] User logged in");
    feed.pump();

    feed.stop();
    source.emit_in_flight("[9:00:02 AM] Cache cleared");
    feed.pump();

    let entries: Vec<&str> = feed.entries().iter().map(String::as_str).collect();
    assert_eq!(entries, ["[9:00:00 AM] User logged in"]);
}

#[test]
fn clear_then_emit_appends_normally() {
    let source = ScriptedLogSource::new();
    let mut feed = LogFeed::new();
    feed.start(&source);
    for i in 0..60 {
        source.emit(&format!("line {i}"));
    }
    feed.pump();
    assert_eq!(feed.len(), 50);

    feed.clear();
    assert!(feed.is_empty());
    assert_eq!(source.live_subscribers(), 1);

    source.emit("fresh");
    feed.pump();
    let entries: Vec<&str> = feed.entries().iter().map(String::as_str).collect();
    assert_eq!(entries, ["fresh"]);
}
