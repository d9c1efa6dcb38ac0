//! Transport modes served by the dashboard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown transport mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0}")]
pub struct InvalidMode(String);

/// The two networks the dashboard knows about.
///
/// The mode selects which station directory is consulted, which countdown
/// variant interprets the scraped time text, and how a board is sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// Metro and tram. Times are clock times of day (`HH:MM:SS`).
    Rail,
    /// City buses. Times are relative ("... - 7 min").
    Bus,
}

impl TransportMode {
    /// Lowercase identifier used in URLs and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Rail => "rail",
            TransportMode::Bus => "bus",
        }
    }

    /// Human-readable label for page headings.
    pub fn label(&self) -> &'static str {
        match self {
            TransportMode::Rail => "Metro",
            TransportMode::Bus => "Bus",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rail" | "metro" => Ok(TransportMode::Rail),
            "bus" => Ok(TransportMode::Bus),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}
