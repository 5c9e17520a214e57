//! `helpdesk logs`: follow the live log stream for a fixed number of entries.

use crate::output::{OutputMode, pretty_section};
use anyhow::bail;
use clap::Args;
use helpdesk_core::clock::SystemClock;
use helpdesk_core::config::LogsConfig;
use helpdesk_core::logs::{IntervalLogStream, LogFeed, LogSource};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Number of entries to print before unsubscribing.
    #[arg(short = 'n', long, default_value = "10")]
    pub count: usize,

    /// Milliseconds between entries (overrides `[logs] interval_ms`).
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Seed the message picker for a reproducible stream.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct LogsOutput {
    entries: Vec<String>,
}

/// Slack on top of the interval before a silent stream counts as stalled.
const STALL_GRACE: Duration = Duration::from_secs(2);

pub fn run_logs(args: &LogsArgs, config: &LogsConfig, output: OutputMode) -> anyhow::Result<()> {
    let interval_ms = args.interval_ms.unwrap_or(config.interval_ms);
    if interval_ms == 0 {
        return Err(helpdesk_core::Error::InvalidConfig {
            key: "--interval-ms",
            reason: "must be greater than zero".to_string(),
        }
        .into());
    }
    let interval = Duration::from_millis(interval_ms);
    let stream = IntervalLogStream::new(interval, Arc::new(SystemClock))
        .with_seed(args.seed.or(config.seed));

    if output == OutputMode::Pretty {
        pretty_section(
            &mut io::stdout().lock(),
            &format!("Live logs ({} entries, every {interval_ms} ms)", args.count),
        )?;
    }

    let entries = follow(&stream, args.count, interval + STALL_GRACE, |entry| {
        if output.is_json() {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        writeln!(out, "{entry}")?;
        out.flush()
    })?;

    if output.is_json() {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &LogsOutput { entries })?;
        writeln!(out)?;
    }
    Ok(())
}

/// Subscribe to `source`, hand each of the first `count` entries to
/// `on_entry` as it arrives, then unsubscribe.
fn follow(
    source: &dyn LogSource,
    count: usize,
    stall_after: Duration,
    mut on_entry: impl FnMut(&str) -> io::Result<()>,
) -> anyhow::Result<Vec<String>> {
    let mut feed = LogFeed::new();
    let mut collected = Vec::with_capacity(count);
    if count == 0 {
        return Ok(collected);
    }

    feed.start(source);
    info!(count, "following live logs");

    while collected.len() < count {
        let wanted = count - collected.len();
        let mut fresh = Vec::new();
        let appended = feed.pump_blocking_with(stall_after, |entry| {
            if fresh.len() < wanted {
                fresh.push(entry.to_string());
            }
        });
        if appended == 0 {
            feed.stop();
            bail!("log stream stalled after {} of {count} entries", collected.len());
        }
        for entry in fresh {
            on_entry(&entry)?;
            collected.push(entry);
        }
    }

    feed.stop();
    debug!(printed = collected.len(), "live log follow finished");
    Ok(collected)
}
