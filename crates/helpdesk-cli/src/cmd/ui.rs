//! `helpdesk ui`: open the interactive console.

use crate::tui::{self, app::App};
use clap::Args;
use helpdesk_core::clock::SystemClock;
use helpdesk_core::config::AppConfig;
use helpdesk_core::logs::IntervalLogStream;
use helpdesk_core::route::Route;
use helpdesk_core::tickets::MockTicketStore;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug, Default)]
pub struct UiArgs {
    /// Route to open on: /tickets, /knowledgebase or /logs.
    #[arg(long, value_name = "PATH")]
    pub route: Option<String>,
}

/// Pick the starting route. An explicit `--route` must name a known view.
fn start_route(args: &UiArgs, config: &AppConfig) -> helpdesk_core::Result<Route> {
    args.route
        .as_deref()
        .map_or_else(|| Ok(config.start_route()), str::parse::<Route>)
}

pub fn run_ui(args: &UiArgs, config: &AppConfig, store: MockTicketStore) -> anyhow::Result<()> {
    let route = start_route(args, config)?;
    let clock = Arc::new(SystemClock);
    let logs = IntervalLogStream::new(config.logs.interval(), clock.clone())
        .with_seed(config.logs.seed);

    info!(%route, "opening console");
    let mut app = App::new(
        Box::new(store),
        Box::new(logs),
        clock,
        config.ui.saved_indicator(),
        route,
    );
    tui::run_tui(&mut app, config.ui.tick_rate())
}
