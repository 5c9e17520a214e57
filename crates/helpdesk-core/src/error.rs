use std::fmt;
use std::io;
use std::path::PathBuf;

/// Machine-readable error codes for scripts and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigReadFailed,
    ConfigParseError,
    InvalidConfigValue,
    FixtureReadFailed,
    FixtureParseError,
    UnknownRoute,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidConfigValue => "E1003",
            Self::FixtureReadFailed => "E2001",
            Self::FixtureParseError => "E2002",
            Self::UnknownRoute => "E3001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigReadFailed => "Config file could not be read",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidConfigValue => "Invalid config value",
            Self::FixtureReadFailed => "Ticket fixture could not be read",
            Self::FixtureParseError => "Ticket fixture parse error",
            Self::UnknownRoute => "Unknown route",
        }
    }

    /// Optional remediation hint surfaced next to the error.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigReadFailed => Some("Check the --config path or HELPDESK_CONFIG."),
            Self::ConfigParseError => Some("Fix the TOML syntax in the config file and retry."),
            Self::InvalidConfigValue => Some("Intervals and tick rates must be greater than zero."),
            Self::FixtureReadFailed => Some("Check the --tickets path or [tickets] fixture."),
            Self::FixtureParseError => {
                Some("Fixtures are a JSON array of {id, subject, status, createdAt} objects.")
            }
            Self::UnknownRoute => Some("Use one of /tickets, /knowledgebase, /logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while loading configuration and ticket fixtures.
///
/// The views themselves never fail; everything here happens before the
/// console starts.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead { path: PathBuf, source: io::Error },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config value for `{key}`: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("failed to read ticket fixture {}: {source}", path.display())]
    FixtureRead { path: PathBuf, source: io::Error },

    #[error("failed to parse ticket fixture {}: {source}", path.display())]
    FixtureParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unknown route '{0}'")]
    UnknownRoute(String),
}

impl Error {
    /// The stable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::ConfigRead { .. } => ErrorCode::ConfigReadFailed,
            Self::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfigValue,
            Self::FixtureRead { .. } => ErrorCode::FixtureReadFailed,
            Self::FixtureParse { .. } => ErrorCode::FixtureParseError,
            Self::UnknownRoute(_) => ErrorCode::UnknownRoute,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::{Error, ErrorCode};
    use std::collections::HashSet;

    const ALL: [ErrorCode; 6] = [
        ErrorCode::ConfigReadFailed,
        ErrorCode::ConfigParseError,
        ErrorCode::InvalidConfigValue,
        ErrorCode::FixtureReadFailed,
        ErrorCode::FixtureParseError,
        ErrorCode::UnknownRoute,
    ];

    #[test]
    fn all_codes_are_unique() {
        let mut seen = HashSet::new();
        for code in ALL {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        for code in ALL {
            let code = code.code();
            assert_eq!(code.len(), 5);
            assert!(code.starts_with('E'));
            assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn every_code_has_a_hint() {
        assert!(ALL.iter().all(|code| code.hint().is_some()));
    }

    #[test]
    fn unknown_route_maps_to_its_code() {
        let err = Error::UnknownRoute("/admin".to_string());
        assert_eq!(err.code(), ErrorCode::UnknownRoute);
        assert_eq!(err.to_string(), "unknown route '/admin'");
    }
}
