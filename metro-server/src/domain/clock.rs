//! Wall-clock source for countdowns.

use chrono::NaiveTime;
use chrono_tz::Tz;

use super::countdown::current_time;

/// Where "now" comes from when computing countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// The system clock, read in the given time zone.
    System(Tz),
    /// A fixed time of day.
    Fixed(NaiveTime),
}

impl Clock {
    /// The current time of day at one-second resolution.
    pub fn now(&self) -> NaiveTime {
        match self {
            Clock::System(tz) => current_time(*tz),
            Clock::Fixed(time) => *time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn fixed_clock_is_fixed() {
        let t = NaiveTime::from_hms_opt(13, 0, 0).unwrap();
        assert_eq!(Clock::Fixed(t).now(), t);
    }

    #[test]
    fn system_clock_has_whole_seconds() {
        let now = Clock::System(chrono_tz::Europe::Madrid).now();
        assert_eq!(now.nanosecond(), 0);
    }
}
