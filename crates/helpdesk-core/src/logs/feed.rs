use super::buffer::RollingLogBuffer;
use super::stream::{CancelHandle, LogSource};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::{debug, info};

/// The live log viewer's state: a rolling window of entries fed by at most
/// one subscription.
///
/// Producers hand entries over a channel; [`LogFeed::pump`] moves them into
/// the buffer on the owner's thread. The subscription is checked before every
/// append, so once [`LogFeed::stop`] runs nothing else reaches the buffer.
#[derive(Debug, Default)]
pub struct LogFeed {
    buffer: RollingLogBuffer,
    subscription: Option<CancelHandle>,
    inbox: Option<Receiver<String>>,
}

impl LogFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `source`. A feed holds one subscription at a time, so a
    /// second call while subscribed does nothing and returns `false`.
    pub fn start(&mut self, source: &dyn LogSource) -> bool {
        if self.subscription.is_some() {
            debug!("log feed already subscribed");
            return false;
        }
        let (tx, rx) = mpsc::channel();
        let handle = source.start(Box::new(move |entry| {
            // The receiver is gone once the feed stops; late entries are dropped.
            let _ = tx.send(entry);
        }));
        self.inbox = Some(rx);
        self.subscription = Some(handle);
        info!("log feed subscribed");
        true
    }

    /// Cancel the subscription, if any. Safe to call repeatedly; returns
    /// `true` only when a live subscription was actually cancelled.
    pub fn stop(&mut self) -> bool {
        self.inbox = None;
        match self.subscription.take() {
            Some(mut handle) => {
                let cancelled = handle.cancel();
                info!("log feed unsubscribed");
                cancelled
            }
            None => false,
        }
    }

    /// Drop every buffered entry. The subscription keeps running.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Move everything waiting in the inbox into the buffer. Returns how many
    /// entries were appended.
    pub fn pump(&mut self) -> usize {
        self.pump_with(|_| {})
    }

    /// Like [`LogFeed::pump`], but show each entry to `on_append` before it
    /// enters the buffer. The window keeps only the newest entries, so this is
    /// the way to see every entry of a burst.
    pub fn pump_with(&mut self, mut on_append: impl FnMut(&str)) -> usize {
        let (Some(handle), Some(inbox)) = (self.subscription.as_ref(), self.inbox.as_ref()) else {
            return 0;
        };
        let mut appended = 0;
        while !handle.is_cancelled() {
            let Ok(entry) = inbox.try_recv() else {
                break;
            };
            on_append(&entry);
            self.buffer.push(entry);
            appended += 1;
        }
        appended
    }

    /// Like [`LogFeed::pump`], but wait up to `timeout` for the first entry.
    pub fn pump_blocking(&mut self, timeout: Duration) -> usize {
        self.pump_blocking_with(timeout, |_| {})
    }

    /// Like [`LogFeed::pump_with`], but wait up to `timeout` for the first entry.
    pub fn pump_blocking_with(
        &mut self,
        timeout: Duration,
        mut on_append: impl FnMut(&str),
    ) -> usize {
        let (Some(handle), Some(inbox)) = (self.subscription.as_ref(), self.inbox.as_ref()) else {
            return 0;
        };
        let Ok(first) = inbox.recv_timeout(timeout) else {
            return 0;
        };
        if handle.is_cancelled() {
            return 0;
        }
        on_append(&first);
        self.buffer.push(first);
        1 + self.pump_with(on_append)
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription
            .as_ref()
            .is_some_and(|handle| !handle.is_cancelled())
    }

    #[must_use]
    pub const fn entries(&self) -> &RollingLogBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Drop for LogFeed {
    fn drop(&mut self) {
        self.stop();
    }
}
