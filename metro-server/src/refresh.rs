//! Live refresh of arrival boards.
//!
//! A live view re-runs the whole pipeline (resolve, fetch, scrape,
//! countdown) on a fixed period. Ticks never overlap: the next tick is only
//! awaited once the previous board has been produced, and a board that takes
//! longer than the period delays the schedule instead of queueing a burst of
//! catch-up fetches. Dropping the stream cancels any fetch in flight.

use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use futures::stream;
use tokio::time::{Interval, MissedTickBehavior};

use crate::board::{ArrivalBoard, BoardError, load_board};
use crate::directory::StopResolver;
use crate::domain::{Clock, TransportMode};
use crate::fetch::MarkupSource;

/// Default refresh period.
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(1);

/// Shortest period accepted; tokio intervals reject a zero period.
const MIN_REFRESH: Duration = Duration::from_millis(10);

/// How often a live board is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    period: Duration,
}

impl RefreshSchedule {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_REFRESH),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    fn interval(&self) -> Interval {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH)
    }
}

/// Everything a live board needs between ticks.
struct LiveBoard<S> {
    resolver: Arc<StopResolver>,
    source: Arc<S>,
    clock: Clock,
    mode: TransportMode,
    station: String,
    schedule: RefreshSchedule,
    ticks: Option<Interval>,
}

/// Stream one freshly built board per tick, starting immediately.
///
/// Errors are yielded, not terminal: a failed fetch is reported for that
/// tick and the next tick tries again.
pub fn live_boards<S>(
    resolver: Arc<StopResolver>,
    source: Arc<S>,
    clock: Clock,
    mode: TransportMode,
    station: impl Into<String>,
    schedule: RefreshSchedule,
) -> impl Stream<Item = Result<ArrivalBoard, BoardError>> + Send
where
    S: MarkupSource + Send + Sync + 'static,
{
    let live = LiveBoard {
        resolver,
        source,
        clock,
        mode,
        station: station.into(),
        schedule,
        ticks: None,
    };

    stream::unfold(live, |mut live| async move {
        let schedule = live.schedule;
        live.ticks
            .get_or_insert_with(|| schedule.interval())
            .tick()
            .await;

        let board = load_board(
            &live.resolver,
            live.source.as_ref(),
            &live.clock,
            live.mode,
            &live.station,
        )
        .await;

        Some((board, live))
    })
}
