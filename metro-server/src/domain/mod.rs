//! Domain types for the arrivals dashboard.
//!
//! Arrival records, transport modes and the countdown rules that turn the
//! operator's published time text into a remaining duration.

mod arrival;
mod clock;
mod countdown;
mod mode;

pub use arrival::{
    ArrivalRecord, ScrapedArrival, UNKNOWN_DESTINATION, UNKNOWN_LINE, UNKNOWN_TIME, sort_for_mode,
};
pub use clock::Clock;
pub use countdown::{
    ClockTimeError, RemainingTime, UNKNOWN_REMAINING, bus_remaining, current_time,
    parse_clock_time, rail_remaining, remaining_time,
};
pub use mode::{InvalidMode, TransportMode};
