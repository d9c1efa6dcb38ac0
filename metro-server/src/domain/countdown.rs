//! Countdown-to-arrival computation.
//!
//! The two networks publish arrival times differently. Rail pages show the
//! clock time of day at which the train is due ("13:05:00"); bus pages show a
//! relative estimate ("P. Congressos - 21 min"). Both are normalized into a
//! [`RemainingTime`], which is never negative. Text that cannot be read
//! becomes [`RemainingTime::Unknown`] instead of an error, so a single bad
//! row never takes down a whole board.

use std::fmt;
use std::sync::LazyLock;

use chrono::{Duration, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use regex::Regex;

use super::TransportMode;

/// Placeholder shown when the remaining time could not be computed.
pub const UNKNOWN_REMAINING: &str = "unknown";

/// The trailing "<N> min" of a bus estimate. Only the last match counts.
static MINUTES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*min").expect("minutes pattern is valid"));

/// Error returned when parsing an invalid clock time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid clock time: {reason}")]
pub struct ClockTimeError {
    reason: &'static str,
}

impl ClockTimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Time left until a vehicle arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemainingTime {
    /// Derived from a rail clock time. Always in `[0, 24h)`.
    Clock(Duration),
    /// Derived from a bus "N min" estimate. Whole minutes, unbounded.
    Minutes(Duration),
    /// The raw text could not be interpreted.
    Unknown,
}

impl RemainingTime {
    /// The underlying duration, if known.
    pub fn duration(&self) -> Option<Duration> {
        match self {
            RemainingTime::Clock(d) | RemainingTime::Minutes(d) => Some(*d),
            RemainingTime::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, RemainingTime::Unknown)
    }

    /// Key that orders known durations ascending and unknown ones last.
    pub fn sort_key(&self) -> (bool, Duration) {
        match self.duration() {
            Some(d) => (false, d),
            None => (true, Duration::zero()),
        }
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemainingTime::Clock(d) => {
                let secs = d.num_seconds();
                let (hours, mins, secs) = (secs / 3600, (secs % 3600) / 60, secs % 60);
                if hours == 0 {
                    write!(f, "{mins:02}:{secs:02}")
                } else {
                    write!(f, "{hours:02}:{mins:02}:{secs:02}")
                }
            }
            RemainingTime::Minutes(d) => {
                let mins = d.num_minutes();
                write!(f, "{:02}:{:02}", mins / 60, mins % 60)
            }
            RemainingTime::Unknown => f.write_str(UNKNOWN_REMAINING),
        }
    }
}

/// Compute the remaining time for raw arrival text in the given mode.
pub fn remaining_time(mode: TransportMode, raw: &str, now: NaiveTime) -> RemainingTime {
    match mode {
        TransportMode::Rail => rail_remaining(raw, now),
        TransportMode::Bus => bus_remaining(raw),
    }
}

/// Remaining time until a rail arrival given as `HH:MM:SS`.
///
/// An arrival earlier than `now` is taken to be tomorrow: exactly one day is
/// added, never more. An arrival equal to `now` is zero, not a rollover.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use metro_server::domain::rail_remaining;
///
/// let now = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
/// assert_eq!(rail_remaining("13:05:00", now).to_string(), "05:00");
/// assert_eq!(rail_remaining("12:58:00", now).to_string(), "23:58:00");
/// assert_eq!(rail_remaining("soon", now).to_string(), "unknown");
/// ```
pub fn rail_remaining(raw: &str, now: NaiveTime) -> RemainingTime {
    let Ok(arrival) = parse_clock_time(raw) else {
        return RemainingTime::Unknown;
    };

    let mut remaining = arrival.signed_duration_since(truncate_to_second(now));
    if remaining < Duration::zero() {
        remaining += Duration::hours(24);
    }

    RemainingTime::Clock(remaining)
}

/// Remaining time from a bus estimate such as `"Centre - 5-8 min"`.
///
/// Only the last integer directly before `min` is used, so a range resolves
/// to its upper bound.
///
/// # Examples
///
/// ```
/// use metro_server::domain::bus_remaining;
///
/// assert_eq!(bus_remaining("P. Congressos - 21 min").to_string(), "00:21");
/// assert_eq!(bus_remaining("Centre - 5-8 min").to_string(), "00:08");
/// assert_eq!(bus_remaining("pronto").to_string(), "unknown");
/// ```
pub fn bus_remaining(raw: &str) -> RemainingTime {
    MINUTES_PATTERN
        .captures_iter(raw)
        .last()
        .and_then(|caps| caps[1].parse::<i64>().ok())
        .and_then(Duration::try_minutes)
        .map_or(RemainingTime::Unknown, RemainingTime::Minutes)
}

/// Parse a clock time in strict `HH:MM:SS` form.
///
/// Surrounding whitespace is ignored.
pub fn parse_clock_time(s: &str) -> Result<NaiveTime, ClockTimeError> {
    let s = s.trim();
    if s.len() != 8 {
        return Err(ClockTimeError::new("expected HH:MM:SS format"));
    }

    let bytes = s.as_bytes();
    if bytes[2] != b':' || bytes[5] != b':' {
        return Err(ClockTimeError::new("expected colons at positions 2 and 5"));
    }

    let hour = parse_two_digits(&bytes[0..2])
        .ok_or_else(|| ClockTimeError::new("invalid hour digits"))?;
    let minute = parse_two_digits(&bytes[3..5])
        .ok_or_else(|| ClockTimeError::new("invalid minute digits"))?;
    let second = parse_two_digits(&bytes[6..8])
        .ok_or_else(|| ClockTimeError::new("invalid second digits"))?;

    NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or_else(|| ClockTimeError::new("time out of range"))
}

/// Current wall-clock time in `tz`, at one-second resolution.
pub fn current_time(tz: Tz) -> NaiveTime {
    truncate_to_second(Utc::now().with_timezone(&tz).time())
}

fn truncate_to_second(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}
