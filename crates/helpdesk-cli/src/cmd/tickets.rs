//! `helpdesk tickets`: print the ticket list, optionally filtered by status.

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};
use clap::Args;
use helpdesk_core::model::ticket::{Ticket, TicketStatus};
use helpdesk_core::tickets::{FILTER_ALL, TicketBoard, TicketStore};
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

#[derive(Args, Debug)]
pub struct TicketsArgs {
    /// Status filter: All, Open, "In Progress" or Closed.
    #[arg(short, long, default_value = FILTER_ALL)]
    pub status: String,
}

#[derive(Debug, Serialize)]
struct TicketListOutput<'a> {
    filter: &'a str,
    count: usize,
    total: usize,
    tickets: &'a [Ticket],
}

/// Map loose user input onto a filter label. Case and separators are
/// forgiven for known labels; anything else is passed through as typed and
/// matches nothing.
fn canonical_filter(raw: &str) -> String {
    if raw.trim().eq_ignore_ascii_case(FILTER_ALL) {
        return FILTER_ALL.to_string();
    }
    raw.parse::<TicketStatus>()
        .map_or_else(|_| raw.to_string(), |status| status.label().to_string())
}

pub fn run_tickets(
    args: &TicketsArgs,
    store: &dyn TicketStore,
    output: OutputMode,
) -> anyhow::Result<()> {
    let mut board = TicketBoard::load(store);
    let filter = canonical_filter(&args.status);
    board.filter_tickets(&filter);
    debug!(filter = %filter, shown = board.filtered().len(), "tickets filtered");

    let listing = TicketListOutput {
        filter: board.current_filter(),
        count: board.filtered().len(),
        total: board.tickets().len(),
        tickets: board.filtered(),
    };
    render_mode(output, &listing, write_text, write_pretty)
}

fn created(ticket: &Ticket) -> String {
    ticket.created_at.format("%Y-%m-%d %H:%M").to_string()
}

fn write_text(listing: &TicketListOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    for ticket in listing.tickets {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            ticket.id,
            ticket.status,
            created(ticket),
            ticket.subject
        )?;
    }
    Ok(())
}

fn write_pretty(listing: &TicketListOutput<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Tickets ({})", listing.filter))?;
    pretty_kv(w, "Showing", format!("{} of {}", listing.count, listing.total))?;
    writeln!(w)?;
    if listing.tickets.is_empty() {
        writeln!(w, "No tickets match this filter.")?;
        return Ok(());
    }
    writeln!(
        w,
        "{:<8} {:<12} {:<17} SUBJECT",
        "ID", "STATUS", "CREATED"
    )?;
    for ticket in listing.tickets {
        writeln!(
            w,
            "{:<8} {:<12} {:<17} {}",
            ticket.id,
            ticket.status.label(),
            created(ticket),
            ticket.subject
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpdesk_core::tickets::MockTicketStore;

    fn listing_for(filter: &str) -> (TicketBoard, String) {
        let mut board = TicketBoard::load(&MockTicketStore::with_fixtures());
        let filter = canonical_filter(filter);
        board.filter_tickets(&filter);
        (board, filter)
    }

    #[test]
    fn tickets_args_default_to_all() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: TicketsArgs,
        }
        let w = Wrapper::parse_from(["test"]);
        assert_eq!(w.args.status, "All");
    }

    #[test]
    fn loose_labels_are_canonicalised() {
        assert_eq!(canonical_filter("all"), "All");
        assert_eq!(canonical_filter("open"), "Open");
        assert_eq!(canonical_filter("in-progress"), "In Progress");
        assert_eq!(canonical_filter("Pending"), "Pending");
    }

    #[test]
    fn text_rows_are_tab_separated() {
        let (board, filter) = listing_for("Open");
        let listing = TicketListOutput {
            filter: &filter,
            count: board.filtered().len(),
            total: board.tickets().len(),
            tickets: board.filtered(),
        };
        let mut buf = Vec::new();
        write_text(&listing, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            [
                "T-101\tOpen\t2023-10-26 10:00\tLogin failure on iOS",
                "T-104\tOpen\t2023-10-27 11:20\tFeature request: Dark mode",
            ]
        );
    }

    #[test]
    fn pretty_output_reports_empty_filter() {
        let (board, filter) = listing_for("Pending");
        let listing = TicketListOutput {
            filter: &filter,
            count: board.filtered().len(),
            total: board.tickets().len(),
            tickets: board.filtered(),
        };
        let mut buf = Vec::new();
        write_pretty(&listing, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Tickets (Pending)\n"));
        assert!(text.contains("0 of 5"));
        assert!(text.contains("No tickets match this filter."));
    }
}
