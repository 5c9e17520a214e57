#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use helpdesk_core::config::{self, AppConfig};
use helpdesk_core::tickets::MockTicketStore;
use output::{CliError, OutputMode};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV: &str = "HELPDESK_LOG";
const LOG_FORMAT_ENV: &str = "HELPDESK_LOG_FORMAT";
const LOG_FILE_ENV: &str = "HELPDESK_LOG_FILE";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "helpdesk: terminal support console",
    long_about = "Browse support tickets, edit the knowledgebase and watch live logs.\n\nRunning without a subcommand opens the interactive console."
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format; overrides --json and the FORMAT env var.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Read configuration from this TOML file.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Load tickets from this JSON fixture instead of the built-in set.
    #[arg(long, global = true, value_name = "PATH")]
    tickets: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Ui(_)))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Console",
        about = "Open the interactive console",
        long_about = "Open the full-screen console with the tickets, knowledgebase and live logs views.",
        after_help = "EXAMPLES:\n    # Open on the default route\n    helpdesk\n\n    # Open straight on the live logs\n    helpdesk ui --route /logs"
    )]
    Ui(cmd::ui::UiArgs),

    #[command(
        next_help_heading = "Read",
        about = "List tickets",
        long_about = "List tickets, optionally filtered by status label.",
        after_help = "EXAMPLES:\n    # List every ticket\n    helpdesk tickets\n\n    # Only open tickets\n    helpdesk tickets --status Open\n\n    # Emit machine-readable output\n    helpdesk tickets --status \"In Progress\" --json"
    )]
    Tickets(cmd::tickets::TicketsArgs),

    #[command(
        next_help_heading = "Read",
        about = "Follow the live log stream",
        long_about = "Subscribe to the live log stream, print entries as they arrive and unsubscribe after --count entries.",
        after_help = "EXAMPLES:\n    # Print the next ten entries\n    helpdesk logs\n\n    # Fast, reproducible stream\n    helpdesk logs --count 3 --interval-ms 50 --seed 7\n\n    # Emit machine-readable output\n    helpdesk logs --count 5 --json"
    )]
    Logs(cmd::logs::LogsArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    helpdesk completions bash > ~/.local/share/bash-completion/completions/helpdesk"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Where log records go.
enum LogSink {
    Stderr,
    File(fs::File),
    Discard,
}

fn init_tracing(verbose: bool, sink: LogSink) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "helpdesk=debug,warn"
        } else {
            "helpdesk=info,warn"
        })
    });

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "compact".to_string());

    let (writer, ansi) = match sink {
        LogSink::Stderr => (BoxMakeWriter::new(io::stderr), true),
        LogSink::File(file) => (BoxMakeWriter::new(Mutex::new(file)), false),
        LogSink::Discard => (BoxMakeWriter::new(io::sink), false),
    };

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(writer))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_ansi(ansi).with_writer(writer))
                .init();
        }
    }
}

/// The console owns the terminal, so its logs go to a file.
fn tui_log_sink() -> LogSink {
    let path = env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::cache_dir().map(|dir| dir.join("helpdesk/helpdesk.log")));
    let Some(path) = path else {
        return LogSink::Discard;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_or(LogSink::Discard, LogSink::File)
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let env_path = env::var_os(config::CONFIG_ENV).map(PathBuf::from);
    let config = config::resolve_config(cli.config.as_deref(), env_path.as_deref())?;
    debug!(?config, "configuration resolved");
    Ok(config)
}

fn load_store(cli: &Cli, config: &AppConfig) -> anyhow::Result<MockTicketStore> {
    let fixture: Option<&Path> = cli.tickets.as_deref().or(config.tickets.fixture.as_deref());
    match fixture {
        Some(path) => {
            let store = MockTicketStore::from_json_file(path)?;
            info!(path = %path.display(), "loaded ticket fixture");
            Ok(store)
        }
        None => Ok(MockTicketStore::with_fixtures()),
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    if let Some(Commands::Completions(args)) = &cli.command {
        let mut command = Cli::command();
        return cmd::completions::run_completions(args.shell, &mut command);
    }

    let config = load_config(cli)?;

    match &cli.command {
        Some(Commands::Completions(_)) => Ok(()),
        Some(Commands::Tickets(args)) => {
            let store = load_store(cli, &config)?;
            cmd::tickets::run_tickets(args, &store, output)
        }
        Some(Commands::Logs(args)) => cmd::logs::run_logs(args, &config.logs, output),
        Some(Commands::Ui(args)) => {
            let store = load_store(cli, &config)?;
            cmd::ui::run_ui(args, &config, store)
        }
        None => {
            let store = load_store(cli, &config)?;
            cmd::ui::run_ui(&cmd::ui::UiArgs::default(), &config, store)
        }
    }
    .context("helpdesk command failed")
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let sink = if cli.is_interactive() {
        tui_log_sink()
    } else {
        LogSink::Stderr
    };
    init_tracing(cli.verbose, sink);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();

    if let Err(err) = run(&cli, output) {
        let error = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<helpdesk_core::Error>())
            .map_or_else(
                || CliError::new(format!("{err:#}")),
                |core| CliError {
                    message: format!("{err:#}"),
                    ..CliError::from(core)
                },
            );
        output::render_error(output, &error)?;
        std::process::exit(1);
    }

    Ok(())
}
