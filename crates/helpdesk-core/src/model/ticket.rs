use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Where a ticket sits in its support lifecycle.
///
/// Status is fixed by whoever supplies the ticket; nothing in the console
/// moves a ticket between states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl TicketStatus {
    pub const ALL: [Self; 3] = [Self::Open, Self::InProgress, Self::Closed];

    /// Display label, also the value the status filter matches against.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing a status from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    pub got: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid ticket status: '{}'", self.got)
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for TicketStatus {
    type Err = ParseStatusError;

    /// Lenient parse: case-insensitive, and `in progress`, `in-progress`,
    /// `in_progress` and `inprogress` all name the same status.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "inprogress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseStatusError { got: s.to_string() }),
        }
    }
}

/// A support request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub subject: String,
    pub status: TicketStatus,
    pub created_at: NaiveDateTime,
}

impl Ticket {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        status: TicketStatus,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            status,
            created_at,
        }
    }
}

/// The built-in ticket set served by the mock store.
#[must_use]
pub fn fixture_tickets() -> Vec<Ticket> {
    vec![
        Ticket::new(
            "T-101",
            "Login failure on iOS",
            TicketStatus::Open,
            at(2023, 10, 26, 10, 0),
        ),
        Ticket::new(
            "T-102",
            "Dashboard not loading",
            TicketStatus::InProgress,
            at(2023, 10, 25, 14, 30),
        ),
        Ticket::new(
            "T-103",
            "Password reset email missing",
            TicketStatus::Closed,
            at(2023, 10, 24, 9, 15),
        ),
        Ticket::new(
            "T-104",
            "Feature request: Dark mode",
            TicketStatus::Open,
            at(2023, 10, 27, 11, 20),
        ),
        Ticket::new(
            "T-105",
            "Typo in settings menu",
            TicketStatus::Closed,
            at(2023, 10, 23, 16, 45),
        ),
    ]
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}
