use crate::error::{Error, Result};
use crate::model::ticket::{Ticket, fixture_tickets};
use std::path::Path;
use tracing::debug;

/// Read access to the ticket collection.
pub trait TicketStore {
    /// Snapshot of every ticket the store currently holds, in store order.
    fn list_tickets(&self) -> Vec<Ticket>;
}

/// In-memory store serving a fixed ticket set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTicketStore {
    tickets: Vec<Ticket>,
}

impl MockTicketStore {
    #[must_use]
    pub const fn new(tickets: Vec<Ticket>) -> Self {
        Self { tickets }
    }

    /// Store preloaded with the built-in fixture set.
    #[must_use]
    pub fn with_fixtures() -> Self {
        Self::new(fixture_tickets())
    }

    /// Load a fixture set from a JSON array of tickets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FixtureRead`] if the file cannot be read and
    /// [`Error::FixtureParse`] if it is not a valid ticket array.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FixtureRead {
            path: path.to_path_buf(),
            source,
        })?;
        let tickets: Vec<Ticket> =
            serde_json::from_str(&content).map_err(|source| Error::FixtureParse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(path = %path.display(), count = tickets.len(), "loaded ticket fixture");
        Ok(Self::new(tickets))
    }
}

impl Default for MockTicketStore {
    fn default() -> Self {
        Self::with_fixtures()
    }
}

impl TicketStore for MockTicketStore {
    fn list_tickets(&self) -> Vec<Ticket> {
        self.tickets.clone()
    }
}
