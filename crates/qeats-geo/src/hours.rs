//! Open-hours filter.
//!
//! A restaurant is open at `t` iff `opens_at < t < closes_at`. Both bounds are
//! exclusive, and an interval whose closing time is earlier than its opening
//! time (past midnight) is never open: `22:00`-`02:00` reads as closed at
//! `23:00` and at `01:00` alike.

use chrono::{NaiveTime, Timelike};
use qeats_core::models::RestaurantRecord;
use qeats_core::{QeatsError, Result};

/// Accepted ISO local time layouts, tried in order
const TIME_FORMATS: [&str; 3] = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Parse an ISO local time of day (`HH:MM`, `HH:MM:SS`, `HH:MM:SS.fff`).
///
/// Every field is exactly two digits, the fraction has one to nine digits,
/// and surrounding whitespace or a leap second makes the value invalid.
pub fn parse_time_of_day(value: &str) -> Option<NaiveTime> {
    if !has_iso_layout(value) {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
        .filter(|time| time.nanosecond() < 1_000_000_000)
}

fn has_iso_layout(value: &str) -> bool {
    let (clock, fraction) = match value.split_once('.') {
        Some((clock, fraction)) => (clock, Some(fraction)),
        None => (value, None),
    };
    let fields: Vec<&str> = clock.split(':').collect();

    let fraction_ok = match (fields.len(), fraction) {
        (2 | 3, None) => true,
        (3, Some(digits)) => {
            (1..=9).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
        }
        _ => false,
    };

    fraction_ok
        && fields.iter().all(|field| field.len() == 2 && field.bytes().all(|b| b.is_ascii_digit()))
}

/// Parsed opening interval of a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenHours {
    pub opens_at: NaiveTime,
    pub closes_at: NaiveTime,
}

impl OpenHours {
    /// Parse the opening interval of `record`
    pub fn from_record(record: &RestaurantRecord) -> Result<Self> {
        Ok(Self {
            opens_at: parse_bound(record, "opensAt", &record.opens_at)?,
            closes_at: parse_bound(record, "closesAt", &record.closes_at)?,
        })
    }

    /// Strictly between opening and closing time
    pub fn is_open_at(&self, instant: NaiveTime) -> bool {
        self.opens_at < instant && instant < self.closes_at
    }
}

fn parse_bound(record: &RestaurantRecord, field: &str, value: &str) -> Result<NaiveTime> {
    parse_time_of_day(value).ok_or_else(|| QeatsError::RecordParse {
        restaurant_id: record.restaurant_id.clone(),
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Whether `record` is open at `instant`.
///
/// Fails with `RecordParse` if either bound is not a valid time of day.
pub fn is_open(record: &RestaurantRecord, instant: NaiveTime) -> Result<bool> {
    Ok(OpenHours::from_record(record)?.is_open_at(instant))
}
