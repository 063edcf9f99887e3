//! Shift and business-date resolution
//!
//! Maps a local timestamp to one of three daily shifts and the business
//! date its activity is booked under. The overnight shift crosses midnight,
//! so early-morning timestamps book to the previous calendar date.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "shift1")]
    First,
    #[serde(rename = "shift2")]
    Second,
    #[serde(rename = "shift3")]
    Third,
}

impl Shift {
    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::First => "shift1",
            Shift::Second => "shift2",
            Shift::Third => "shift3",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "shift1" => Some(Shift::First),
            "shift2" => Some(Shift::Second),
            "shift3" => Some(Shift::Third),
            _ => None,
        }
    }

    pub fn all() -> [Shift; 3] {
        [Shift::First, Shift::Second, Shift::Third]
    }
}

/// Resolve a timestamp to its shift and business date.
///
/// Boundaries are end-closed and start-exclusive, so every timestamp
/// (sub-second ones included) lands in exactly one shift:
/// - shift1: 06:00:00 <= t <= 14:00:00
/// - shift2: 14:00:00 <  t <= 20:00:00
/// - shift3: 20:00:00 <  t, wrapping through midnight until t < 06:00:00
///
/// Timestamps before 06:00 book to the previous calendar date: the
/// overnight shift started the evening before.
pub fn resolve(at: NaiveDateTime) -> (Shift, NaiveDate) {
    let shift1_start = NaiveTime::from_hms_opt(6, 0, 0).unwrap();
    let shift1_end = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
    let shift2_end = NaiveTime::from_hms_opt(20, 0, 0).unwrap();

    let t = at.time();
    let date = at.date();

    if t >= shift1_start && t <= shift1_end {
        (Shift::First, date)
    } else if t <= shift2_end && t > shift1_end {
        (Shift::Second, date)
    } else if t > shift2_end {
        (Shift::Third, date)
    } else {
        (Shift::Third, date - Duration::days(1))
    }
}
