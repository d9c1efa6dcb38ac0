//! Arrival records scraped from a stop's status page.

use chrono::NaiveTime;

use super::TransportMode;
use super::countdown::{RemainingTime, remaining_time};

/// Placeholder for a line identifier that could not be read.
pub const UNKNOWN_LINE: &str = "unknown line";
/// Placeholder for a destination that could not be read.
pub const UNKNOWN_DESTINATION: &str = "unknown destination";
/// Placeholder for arrival time text that could not be read.
pub const UNKNOWN_TIME: &str = "unknown time";

/// One scraped row before its countdown is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedArrival {
    pub line: String,
    pub destination: String,
    /// Time text exactly as published (after trimming).
    pub raw_time: String,
}

impl ScrapedArrival {
    /// Attach the remaining time, interpreting `raw_time` per `mode`.
    pub fn into_record(self, mode: TransportMode, now: NaiveTime) -> ArrivalRecord {
        let remaining = remaining_time(mode, &self.raw_time, now);
        ArrivalRecord {
            line: self.line,
            destination: self.destination,
            raw_time: self.raw_time,
            remaining,
        }
    }
}

/// A line, destination and arrival time for a stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub line: String,
    pub destination: String,
    pub raw_time: String,
    pub remaining: RemainingTime,
}

/// Order records for display.
///
/// Rail boards are sorted by destination (byte order), bus boards by
/// remaining time with unknown estimates last. The sort is stable, so ties
/// keep the order in which rows were scraped.
pub fn sort_for_mode(records: &mut [ArrivalRecord], mode: TransportMode) {
    match mode {
        TransportMode::Rail => records.sort_by(|a, b| a.destination.cmp(&b.destination)),
        TransportMode::Bus => records.sort_by_key(|r| r.remaining.sort_key()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraped(line: &str, destination: &str, raw_time: &str) -> ScrapedArrival {
        ScrapedArrival {
            line: line.to_string(),
            destination: destination.to_string(),
            raw_time: raw_time.to_string(),
        }
    }

    fn now() -> NaiveTime {
        NaiveTime::from_hms_opt(13, 0, 0).unwrap()
    }

    #[test]
    fn into_record_computes_remaining() {
        let record = scraped("3", "Aeroport", "13:05:00").into_record(TransportMode::Rail, now());
        assert_eq!(record.line, "3");
        assert_eq!(record.raw_time, "13:05:00");
        assert_eq!(record.remaining.to_string(), "05:00");
    }

    #[test]
    fn sentinel_time_is_unknown() {
        let record = scraped("3", "Aeroport", UNKNOWN_TIME).into_record(TransportMode::Bus, now());
        assert!(record.remaining.is_unknown());
    }

    #[test]
    fn rail_sorted_by_destination() {
        let mut records: Vec<_> = [
            scraped("5", "Bétera", "12:58:00"),
            scraped("3", "Aeroport", "13:05:00"),
            scraped("1", "Castelló", "13:01:00"),
        ]
        .into_iter()
        .map(|s| s.into_record(TransportMode::Rail, now()))
        .collect();

        sort_for_mode(&mut records, TransportMode::Rail);
        let order: Vec<_> = records.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(order, ["Aeroport", "Bétera", "Castelló"]);
    }

    #[test]
    fn rail_sort_is_case_sensitive() {
        let mut records: Vec<_> = [
            scraped("1", "alboraya", "13:01:00"),
            scraped("1", "Torrent", "13:02:00"),
        ]
        .into_iter()
        .map(|s| s.into_record(TransportMode::Rail, now()))
        .collect();

        sort_for_mode(&mut records, TransportMode::Rail);
        assert_eq!(records[0].destination, "Torrent");
    }

    #[test]
    fn bus_sorted_by_remaining_unknown_last() {
        let mut records: Vec<_> = [
            scraped("19", "Platja", "pronto"),
            scraped("7", "Centre", "Centre - 12 min"),
            scraped("35", "Marxalenes", "Marxalenes - 3-4 min"),
        ]
        .into_iter()
        .map(|s| s.into_record(TransportMode::Bus, now()))
        .collect();

        sort_for_mode(&mut records, TransportMode::Bus);
        let lines: Vec<_> = records.iter().map(|r| r.line.as_str()).collect();
        assert_eq!(lines, ["35", "7", "19"]);
    }
}
