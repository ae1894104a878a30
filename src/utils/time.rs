use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;

/// Week 0 origin used when converting week number and time of week to a
/// calendar date: 1980-01-05 00:00:00 UTC, as seconds since the unix epoch.
pub const GPS_REFERENCE_EPOCH_UNIX_SECONDS: i64 = 315_878_400;

pub fn gps_reference_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + TimeDelta::seconds(GPS_REFERENCE_EPOCH_UNIX_SECONDS)
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("Unknown time of week unit '{0}' (expected 'ms' or 's')")]
pub struct TowUnitError(String);

/// Unit of the time of week field on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TowUnit {
    #[default]
    Milliseconds,
    Seconds,
}

impl TowUnit {
    pub fn to_delta(&self, time_of_week: u32) -> TimeDelta {
        match self {
            TowUnit::Milliseconds => TimeDelta::milliseconds(time_of_week as i64),
            TowUnit::Seconds => TimeDelta::seconds(time_of_week as i64),
        }
    }
}

impl FromStr for TowUnit {
    type Err = TowUnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ms" | "milliseconds" => Ok(TowUnit::Milliseconds),
            "s" | "seconds" => Ok(TowUnit::Seconds),
            other => Err(TowUnitError(other.to_string())),
        }
    }
}

impl fmt::Display for TowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TowUnit::Milliseconds => write!(f, "ms"),
            TowUnit::Seconds => write!(f, "s"),
        }
    }
}

/// Maps (week number, time of week) pairs to UTC. Leap seconds are not
/// modeled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeConverter {
    unit: TowUnit,
}

impl TimeConverter {
    pub fn new(unit: TowUnit) -> Self {
        TimeConverter { unit }
    }

    pub fn unit(&self) -> TowUnit {
        self.unit
    }

    pub fn to_calendar(&self, week_number: u16, time_of_week: u32) -> DateTime<Utc> {
        gps_reference_epoch()
            + TimeDelta::weeks(week_number as i64)
            + self.unit.to_delta(time_of_week)
    }

    pub fn time_of_week_seconds(&self, time_of_week: u32) -> f64 {
        TD(self.unit.to_delta(time_of_week)).seconds()
    }
}

pub struct TD(pub TimeDelta);

impl TD {
    pub fn seconds(&self) -> f64 {
        self.0.num_seconds() as f64 + (self.0.subsec_nanos() as f64) / 1000000000.0
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    #[test]
    fn test_epoch() {
        let expected = Utc.with_ymd_and_hms(1980, 1, 5, 0, 0, 0).unwrap();

        assert_eq!(gps_reference_epoch(), expected);
        assert_eq!(TimeConverter::default().to_calendar(0, 0), expected);
        assert_eq!(
            TimeConverter::new(TowUnit::Seconds).to_calendar(0, 0),
            expected
        );
    }

    #[test]
    fn test_weeks_and_tow_ms() {
        let conv = TimeConverter::new(TowUnit::Milliseconds);

        let t = conv.to_calendar(1, 1_500);
        let expected = NaiveDate::from_ymd_opt(1980, 1, 12)
            .unwrap()
            .and_hms_milli_opt(0, 0, 1, 500)
            .unwrap()
            .and_utc();
        assert_eq!(t, expected);

        // Last millisecond of a week
        let t = conv.to_calendar(0, 604_799_999);
        assert_eq!(t, gps_reference_epoch() + TimeDelta::weeks(1) - TimeDelta::milliseconds(1));
    }

    #[test]
    fn test_tow_seconds() {
        let conv = TimeConverter::new(TowUnit::Seconds);

        assert_eq!(
            conv.to_calendar(2, 3600),
            Utc.with_ymd_and_hms(1980, 1, 19, 1, 0, 0).unwrap()
        );
        assert_relative_eq!(conv.time_of_week_seconds(3600), 3600.0);
        assert_relative_eq!(
            TimeConverter::default().time_of_week_seconds(1_250),
            1.25
        );
    }

    #[test]
    fn test_unit_from_str() {
        assert_eq!("ms".parse::<TowUnit>(), Ok(TowUnit::Milliseconds));
        assert_eq!("seconds".parse::<TowUnit>(), Ok(TowUnit::Seconds));
        assert_eq!(
            "ns".parse::<TowUnit>(),
            Err(TowUnitError("ns".to_string()))
        );
    }
}
