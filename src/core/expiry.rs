//! Time to expiry
//!
//! Converts an expiry date into a year fraction that never reaches zero.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::error::LevelsError;

/// Days per year used for time to expiry
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Lower bound applied to the year fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryFloor {
    /// 1/365: one trading day
    Day,
    /// 7/365: one calendar week
    #[default]
    Week,
}

impl ExpiryFloor {
    /// Floor as a year fraction
    pub fn years(&self) -> f64 {
        match self {
            ExpiryFloor::Day => 1.0 / DAYS_PER_YEAR,
            ExpiryFloor::Week => 7.0 / DAYS_PER_YEAR,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpiryFloor::Day => "day",
            ExpiryFloor::Week => "week",
        }
    }
}

impl fmt::Display for ExpiryFloor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ExpiryFloor {
    type Err = LevelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(ExpiryFloor::Day),
            "week" => Ok(ExpiryFloor::Week),
            other => Err(LevelsError::config(format!(
                "unknown expiry floor '{}' (expected day or week)",
                other
            ))),
        }
    }
}

/// Whole calendar days from `now` (UTC date) to `expiry`; negative once expired
pub fn days_to_expiry(expiry: NaiveDate, now: DateTime<Utc>) -> i64 {
    (expiry - now.date_naive()).num_days()
}

/// Year fraction to expiry, floored so it is always positive
pub fn time_to_expiry(expiry: NaiveDate, now: DateTime<Utc>, floor: ExpiryFloor) -> f64 {
    let days = days_to_expiry(expiry, now) as f64;
    (days / DAYS_PER_YEAR).max(floor.years())
}

/// Year fraction to expiry from the current moment
pub fn time_to_expiry_now(expiry: NaiveDate, floor: ExpiryFloor) -> f64 {
    time_to_expiry(expiry, Utc::now(), floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 15, 30, 0).unwrap()
    }

    #[test]
    fn test_natural_value() {
        let expiry = NaiveDate::from_ymd_opt(2025, 2, 19).unwrap();
        let t = time_to_expiry(expiry, at(2025, 1, 20), ExpiryFloor::Week);
        assert!((t - 30.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_week_floor_binds_below_seven_days() {
        let expiry = NaiveDate::from_ymd_opt(2025, 1, 23).unwrap();
        let now = at(2025, 1, 20);
        assert_eq!(days_to_expiry(expiry, now), 3);

        let t = time_to_expiry(expiry, now, ExpiryFloor::Week);
        assert!((t - 7.0 / 365.0).abs() < 1e-12);

        let t = time_to_expiry(expiry, now, ExpiryFloor::Day);
        assert!((t - 3.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_expired_and_same_day_are_floored() {
        let now = at(2025, 1, 20);
        let same_day = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 12, 20).unwrap();

        for floor in [ExpiryFloor::Day, ExpiryFloor::Week] {
            assert_eq!(time_to_expiry(same_day, now, floor), floor.years());
            assert_eq!(time_to_expiry(past, now, floor), floor.years());
            assert!(time_to_expiry(past, now, floor) > 0.0);
        }
    }

    #[test]
    fn test_floor_default() {
        assert_eq!(ExpiryFloor::default(), ExpiryFloor::Week);
    }

    #[test]
    fn test_floor_from_str() {
        assert_eq!("day".parse::<ExpiryFloor>().unwrap(), ExpiryFloor::Day);
        assert_eq!(" Week ".parse::<ExpiryFloor>().unwrap(), ExpiryFloor::Week);
        assert_eq!(ExpiryFloor::Day.to_string(), "day");

        let err = "month".parse::<ExpiryFloor>().unwrap_err();
        assert!(matches!(err, LevelsError::Config(_)));
    }
}
