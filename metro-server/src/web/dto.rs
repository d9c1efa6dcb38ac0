//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::board::ArrivalBoard;
use crate::domain::{ArrivalRecord, TransportMode};

/// Default number of station search results.
const DEFAULT_SEARCH_LIMIT: usize = 20;
/// Upper bound on station search results.
const MAX_SEARCH_LIMIT: usize = 500;

/// Query for the arrivals page.
#[derive(Debug, Default, Deserialize)]
pub struct ArrivalsPageRequest {
    /// Text filter for the station list
    pub q: Option<String>,

    /// Chosen station (defaults to the first filtered station)
    pub station: Option<String>,
}

/// Query for a single board.
#[derive(Debug, Deserialize)]
pub struct BoardRequest {
    /// Station display name
    pub station: String,
}

/// Query for station search.
#[derive(Debug, Deserialize)]
pub struct StationSearchRequest {
    /// Case-insensitive substring; empty matches all
    #[serde(default)]
    pub q: String,

    /// Maximum number of results
    pub limit: Option<usize>,
}

impl StationSearchRequest {
    /// The effective result limit.
    pub fn limit(&self) -> usize {
        self.limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .min(MAX_SEARCH_LIMIT)
    }
}

/// Response for station search.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub mode: TransportMode,

    /// Matching station names, sorted
    pub stations: Vec<String>,
}

/// Query for the map data.
#[derive(Debug, Default, Deserialize)]
pub struct MapRequest {
    /// Comma-separated line names
    pub lines: Option<String>,

    /// Show every line
    #[serde(default)]
    pub all: bool,
}

/// One arrival in a board response.
#[derive(Debug, Serialize)]
pub struct ArrivalResult {
    /// Line identifier (or "unknown line")
    pub line: String,

    /// Destination (or "unknown destination")
    pub destination: String,

    /// Arrival time text as published
    pub time: String,

    /// Formatted remaining time, or "unknown"
    pub remaining: String,

    /// Remaining time in seconds, when known
    pub remaining_secs: Option<i64>,
}

impl ArrivalResult {
    pub fn from_record(record: &ArrivalRecord) -> Self {
        Self {
            line: record.line.clone(),
            destination: record.destination.clone(),
            time: record.raw_time.clone(),
            remaining: record.remaining.to_string(),
            remaining_secs: record.remaining.duration().map(|d| d.num_seconds()),
        }
    }
}

/// Response for a board.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub mode: TransportMode,
    pub station: String,

    /// Time of day the countdowns refer to (HH:MM:SS)
    pub computed_at: String,

    pub arrivals: Vec<ArrivalResult>,
}

impl BoardResponse {
    pub fn from_board(board: &ArrivalBoard) -> Self {
        Self {
            mode: board.mode,
            station: board.station.clone(),
            computed_at: board.computed_at.format("%H:%M:%S").to_string(),
            arrivals: board.arrivals.iter().map(ArrivalResult::from_record).collect(),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
