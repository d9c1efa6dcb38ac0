//! Arrival boards: the resolve → fetch → scrape → countdown pipeline.

use chrono::NaiveTime;
use tracing::{info, warn};

use crate::directory::{NotFound, StopResolver};
use crate::domain::{ArrivalRecord, Clock, TransportMode, sort_for_mode};
use crate::fetch::{FetchError, MarkupSource};
use crate::scrape::ArrivalPage;

/// Errors that abort a single board.
///
/// Neither is fatal: the view shows the message and the rest of the
/// dashboard keeps working.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Upcoming arrivals at one stop, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalBoard {
    pub mode: TransportMode,
    pub station: String,
    /// The time of day the countdowns were computed against.
    pub computed_at: NaiveTime,
    /// Sorted per [`sort_for_mode`]. One record per scraped row.
    pub arrivals: Vec<ArrivalRecord>,
}

impl ArrivalBoard {
    /// Build a board from a fetched page.
    pub fn from_markup(
        mode: TransportMode,
        station: impl Into<String>,
        markup: &str,
        now: NaiveTime,
    ) -> Self {
        let mut arrivals: Vec<ArrivalRecord> = ArrivalPage::parse(markup)
            .arrivals()
            .map(|scraped| scraped.into_record(mode, now))
            .collect();
        sort_for_mode(&mut arrivals, mode);

        Self {
            mode,
            station: station.into(),
            computed_at: now,
            arrivals,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}

/// Resolve `station`, fetch its status page and build the board.
///
/// "Now" is read from `clock` after the page arrives, so a slow fetch does
/// not skew the countdowns.
pub async fn load_board<S: MarkupSource>(
    resolver: &StopResolver,
    source: &S,
    clock: &Clock,
    mode: TransportMode,
    station: &str,
) -> Result<ArrivalBoard, BoardError> {
    let entry = resolver.resolve(mode, station)?;

    let markup = source.fetch_markup(&entry.lookup_url).await.map_err(|e| {
        warn!(%mode, station = %entry.name, error = %e, "failed to fetch arrivals");
        e
    })?;

    let board = ArrivalBoard::from_markup(mode, entry.name.as_str(), &markup, clock.now());
    info!(
        %mode,
        station = %board.station,
        arrivals = board.arrivals.len(),
        "loaded arrival board"
    );
    Ok(board)
}
