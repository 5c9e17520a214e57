//! Synthetic log producers and the cancellable registrations they hand out.

use crate::clock::{Clock, time_of_day};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default spacing between synthetic log lines.
pub const DEFAULT_LOG_INTERVAL: Duration = Duration::from_millis(2000);

/// The messages the generator picks from.
pub const LOG_MESSAGES: [&str; 7] = [
    "User logged in",
    "API request failed: 500",
    "Database backup started",
    "New ticket created",
    "Payment processed",
    "Cache cleared",
    "User updated profile",
];

/// Callback invoked once per emitted entry.
pub type EntrySink = Box<dyn FnMut(String) + Send + 'static>;

/// Render one log line: `[h:mm:ss AM] message`.
#[must_use]
pub fn format_entry(clock: &dyn Clock, message: &str) -> String {
    format!("[{}] {message}", time_of_day(&clock.now()))
}

/// Pick a message uniformly at random.
pub fn pick_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    LOG_MESSAGES[rng.gen_range(0..LOG_MESSAGES.len())]
}

/// A producer of log lines.
///
/// Each call to [`LogSource::start`] opens an independent registration that
/// keeps delivering entries until its [`CancelHandle`] is cancelled or dropped.
pub trait LogSource {
    fn start(&self, on_entry: EntrySink) -> CancelHandle;
}

/// Owner side of a registration. Cancelling is idempotent; dropping cancels.
#[derive(Debug)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    wake: Option<mpsc::Sender<()>>,
}

/// Producer side of a registration.
#[derive(Debug)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    wake: mpsc::Receiver<()>,
}

/// Create a linked handle/token pair.
#[must_use]
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let cancelled = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    (
        CancelHandle {
            cancelled: Arc::clone(&cancelled),
            wake: Some(tx),
        },
        CancelToken {
            cancelled,
            wake: rx,
        },
    )
}

impl CancelHandle {
    /// A handle whose registration is already over.
    #[must_use]
    pub fn cancelled() -> Self {
        let (mut handle, _token) = cancel_pair();
        handle.cancel();
        handle
    }

    /// Cancel the registration. Returns `true` only for the call that
    /// actually performed the cancellation.
    pub fn cancel(&mut self) -> bool {
        let first = !self.cancelled.swap(true, Ordering::SeqCst);
        // Dropping the sender wakes a producer parked in `CancelToken::wait`.
        self.wake.take();
        first
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl CancelToken {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Sleep for up to `timeout`. Returns `true` if the registration is
    /// still live afterwards; returns early with `false` on cancellation.
    #[must_use]
    pub fn wait(&self, timeout: Duration) -> bool {
        match self.wake.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => !self.is_cancelled(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}

/// Timer-backed generator: one thread per registration, one entry per interval.
pub struct IntervalLogStream {
    interval: Duration,
    seed: Option<u64>,
    clock: Arc<dyn Clock>,
}

impl IntervalLogStream {
    #[must_use]
    pub fn new(interval: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            interval,
            seed: None,
            clock,
        }
    }

    /// Make every registration replay the same message sequence.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl LogSource for IntervalLogStream {
    fn start(&self, mut on_entry: EntrySink) -> CancelHandle {
        let (handle, token) = cancel_pair();
        let interval = self.interval;
        let clock = Arc::clone(&self.clock);
        let mut rng = self
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        let spawned = thread::Builder::new()
            .name("log-stream".to_string())
            .spawn(move || {
                while token.wait(interval) {
                    let entry = format_entry(clock.as_ref(), pick_message(&mut rng));
                    if token.is_cancelled() {
                        break;
                    }
                    on_entry(entry);
                }
                debug!("log stream timer stopped");
            });

        match spawned {
            Ok(_) => {
                debug!(?interval, "log stream timer started");
                handle
            }
            Err(err) => {
                warn!("log stream timer could not be started: {err}");
                CancelHandle::cancelled()
            }
        }
    }
}

struct ScriptedSubscriber {
    token: CancelToken,
    sink: EntrySink,
}

/// Hand-driven log source: nothing is emitted until [`ScriptedLogSource::emit`]
/// is called. Clones share their subscribers.
#[derive(Clone, Default)]
pub struct ScriptedLogSource {
    state: Arc<Mutex<ScriptedState>>,
}

#[derive(Default)]
struct ScriptedState {
    subscribers: Vec<ScriptedSubscriber>,
    opened: usize,
}

impl ScriptedLogSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScriptedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver `entry` to every registration that has not been cancelled.
    ///
    /// Cancelled registrations are released here, sinks included.
    pub fn emit(&self, entry: &str) -> usize {
        let mut state = self.state();
        state.subscribers.retain(|sub| !sub.token.is_cancelled());
        for sub in &mut state.subscribers {
            (sub.sink)(entry.to_string());
        }
        state.subscribers.len()
    }

    /// Deliver `entry` to every registration still held, cancelled or not.
    ///
    /// Models a timer tick that was already in flight when cancellation
    /// was requested, before the next regular tick released the registration.
    pub fn emit_in_flight(&self, entry: &str) -> usize {
        let mut state = self.state();
        for sub in &mut state.subscribers {
            (sub.sink)(entry.to_string());
        }
        state.subscribers.len()
    }

    /// Number of registrations that are still live.
    #[must_use]
    pub fn live_subscribers(&self) -> usize {
        self.state()
            .subscribers
            .iter()
            .filter(|sub| !sub.token.is_cancelled())
            .count()
    }

    /// Number of registrations held, live or cancelled but not yet released.
    #[must_use]
    pub fn held_subscribers(&self) -> usize {
        self.state().subscribers.len()
    }

    /// Number of registrations opened so far, including cancelled ones.
    #[must_use]
    pub fn total_subscriptions(&self) -> usize {
        self.state().opened
    }
}

impl LogSource for ScriptedLogSource {
    fn start(&self, on_entry: EntrySink) -> CancelHandle {
        let (handle, token) = cancel_pair();
        let mut state = self.state();
        state.subscribers.push(ScriptedSubscriber {
            token,
            sink: on_entry,
        });
        state.opened += 1;
        handle
    }
}
