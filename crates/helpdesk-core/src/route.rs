use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The console's three views, addressed by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Route {
    #[default]
    Tickets,
    Knowledgebase,
    Logs,
}

impl Route {
    /// Route table order, also the order of the navigation tabs.
    pub const ALL: [Self; 3] = [Self::Tickets, Self::Knowledgebase, Self::Logs];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Tickets => "/tickets",
            Self::Knowledgebase => "/knowledgebase",
            Self::Logs => "/logs",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Tickets => "Tickets",
            Self::Knowledgebase => "Knowledgebase",
            Self::Logs => "Live Logs",
        }
    }

    /// Look up a path. The empty path and `/` redirect to `/tickets`;
    /// anything not in the table is `None`.
    #[must_use]
    pub fn resolve(path: &str) -> Option<Self> {
        match path.trim() {
            "" | "/" | "/tickets" | "tickets" => Some(Self::Tickets),
            "/knowledgebase" | "knowledgebase" => Some(Self::Knowledgebase),
            "/logs" | "logs" => Some(Self::Logs),
            _ => None,
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&route| route == self)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::resolve(s).ok_or_else(|| Error::UnknownRoute(s.to_string()))
    }
}
