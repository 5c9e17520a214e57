//! Live log feed: synthetic generator, cancellable subscriptions and the
//! rolling window the viewer displays.

pub mod buffer;
pub mod feed;
pub mod stream;

pub use buffer::{LOG_BUFFER_CAPACITY, RollingLogBuffer};
pub use feed::LogFeed;
pub use stream::{
    CancelHandle, CancelToken, DEFAULT_LOG_INTERVAL, EntrySink, IntervalLogStream, LOG_MESSAGES,
    LogSource, ScriptedLogSource, cancel_pair, format_entry,
};
