use super::store::TicketStore;
use crate::model::ticket::{Ticket, TicketStatus};

/// Filter label that matches every ticket.
pub const FILTER_ALL: &str = "All";

/// Filter labels offered to the user, in display order.
pub const FILTER_OPTIONS: [&str; 4] = [
    FILTER_ALL,
    TicketStatus::Open.label(),
    TicketStatus::InProgress.label(),
    TicketStatus::Closed.label(),
];

/// Select tickets whose status label equals `status`, keeping source order.
///
/// `"All"` selects everything. Any other label, recognised or not, goes
/// through the same equality check, so unknown labels select nothing.
#[must_use]
pub fn filter_tickets(tickets: &[Ticket], status: &str) -> Vec<Ticket> {
    if status == FILTER_ALL {
        return tickets.to_vec();
    }
    tickets
        .iter()
        .filter(|ticket| ticket.status.label() == status)
        .cloned()
        .collect()
}

/// Visual weight given to a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Caution,
    Neutral,
}

/// Badge tone for a status label. Unrecognised labels get [`StatusTone::Neutral`].
#[must_use]
pub fn status_tone(status: &str) -> StatusTone {
    match status {
        "Open" => StatusTone::Positive,
        "In Progress" => StatusTone::Caution,
        _ => StatusTone::Neutral,
    }
}

/// Next filter label after `current`, wrapping around. Unknown labels restart at `All`.
#[must_use]
pub fn next_filter(current: &str) -> &'static str {
    match FILTER_OPTIONS.iter().position(|&option| option == current) {
        Some(pos) => FILTER_OPTIONS[(pos + 1) % FILTER_OPTIONS.len()],
        None => FILTER_ALL,
    }
}

/// Previous filter label before `current`, wrapping around.
#[must_use]
pub fn previous_filter(current: &str) -> &'static str {
    match FILTER_OPTIONS.iter().position(|&option| option == current) {
        Some(0) | None => FILTER_OPTIONS[FILTER_OPTIONS.len() - 1],
        Some(pos) => FILTER_OPTIONS[pos - 1],
    }
}

/// The ticket viewer's state: one snapshot from the store plus the
/// currently filtered view of it.
#[derive(Debug, Clone)]
pub struct TicketBoard {
    tickets: Vec<Ticket>,
    filtered: Vec<Ticket>,
    current_filter: String,
}

impl TicketBoard {
    /// Take a snapshot from `store` and show all of it.
    pub fn load(store: &dyn TicketStore) -> Self {
        let tickets = store.list_tickets();
        tracing::debug!(count = tickets.len(), "ticket snapshot loaded");
        let mut board = Self {
            tickets,
            filtered: Vec::new(),
            current_filter: FILTER_ALL.to_string(),
        };
        board.filter_tickets(FILTER_ALL);
        board
    }

    /// Re-derive the filtered view for `status`.
    pub fn filter_tickets(&mut self, status: &str) {
        self.current_filter = status.to_string();
        self.filtered = filter_tickets(&self.tickets, status);
    }

    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn filtered(&self) -> &[Ticket] {
        &self.filtered
    }

    #[must_use]
    pub fn current_filter(&self) -> &str {
        &self.current_filter
    }

    /// How many tickets in the snapshot a given filter would show.
    #[must_use]
    pub fn count_for(&self, status: &str) -> usize {
        if status == FILTER_ALL {
            self.tickets.len()
        } else {
            self.tickets
                .iter()
                .filter(|ticket| ticket.status.label() == status)
                .count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tickets::store::MockTicketStore;

    fn ids(tickets: &[Ticket]) -> Vec<&str> {
        tickets.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn open_filter_keeps_source_order() {
        let board = {
            let mut board = TicketBoard::load(&MockTicketStore::with_fixtures());
            board.filter_tickets("Open");
            board
        };
        assert_eq!(ids(board.filtered()), ["T-101", "T-104"]);
        assert_eq!(board.current_filter(), "Open");
    }

    #[test]
    fn all_filter_returns_everything_unchanged() {
        let mut board = TicketBoard::load(&MockTicketStore::with_fixtures());
        board.filter_tickets("Closed");
        board.filter_tickets("All");
        assert_eq!(
            ids(board.filtered()),
            ["T-101", "T-102", "T-103", "T-104", "T-105"]
        );
    }

    #[test]
    fn load_starts_unfiltered() {
        let board = TicketBoard::load(&MockTicketStore::with_fixtures());
        assert_eq!(board.current_filter(), FILTER_ALL);
        assert_eq!(board.filtered(), board.tickets());
    }

    #[test]
    fn in_progress_matches_by_label() {
        let tickets = MockTicketStore::with_fixtures().list_tickets();
        assert_eq!(ids(&filter_tickets(&tickets, "In Progress")), ["T-102"]);
        assert!(filter_tickets(&tickets, "InProgress").is_empty());
    }

    #[test]
    fn unknown_status_yields_empty_set() {
        let mut board = TicketBoard::load(&MockTicketStore::with_fixtures());
        board.filter_tickets("Escalated");
        assert!(board.filtered().is_empty());
        assert_eq!(board.current_filter(), "Escalated");
        assert_eq!(board.tickets().len(), 5);
    }

    #[test]
    fn empty_store_filters_to_nothing() {
        let board = TicketBoard::load(&MockTicketStore::new(Vec::new()));
        assert!(board.filtered().is_empty());
        assert_eq!(board.count_for("Open"), 0);
    }

    #[test]
    fn counts_per_filter() {
        let board = TicketBoard::load(&MockTicketStore::with_fixtures());
        assert_eq!(board.count_for("All"), 5);
        assert_eq!(board.count_for("Open"), 2);
        assert_eq!(board.count_for("In Progress"), 1);
        assert_eq!(board.count_for("Closed"), 2);
        assert_eq!(board.count_for("nope"), 0);
    }

    #[test]
    fn status_tone_is_total_with_fallback() {
        assert_eq!(status_tone("Open"), StatusTone::Positive);
        assert_eq!(status_tone("In Progress"), StatusTone::Caution);
        assert_eq!(status_tone("Closed"), StatusTone::Neutral);
        assert_eq!(status_tone("whatever"), StatusTone::Neutral);
        assert_eq!(status_tone(""), StatusTone::Neutral);
    }

    #[test]
    fn filter_cycle_wraps_both_ways() {
        let mut label = FILTER_ALL;
        for expected in ["Open", "In Progress", "Closed", "All"] {
            label = next_filter(label);
            assert_eq!(label, expected);
        }
        assert_eq!(previous_filter("All"), "Closed");
        assert_eq!(previous_filter("Open"), "All");
        assert_eq!(next_filter("bogus"), "All");
        assert_eq!(previous_filter("bogus"), "Closed");
    }
}
