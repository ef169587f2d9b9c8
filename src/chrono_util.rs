use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use thiserror::Error;

/// `01/02/25`
pub const SHORT_DATE: &str = "%d/%m/%y";
/// `01/02/2025`
pub const FULL_DATE: &str = "%d/%m/%Y";

const BANGKOK_OFFSET_HOURS: i32 = 7;

pub fn bangkok_now() -> NaiveDateTime {
    Utc::now()
        .with_timezone(&FixedOffset::east_opt(BANGKOK_OFFSET_HOURS * 60 * 60).unwrap())
        .naive_local()
}

pub fn utc_to_bangkok(utc: NaiveDateTime) -> NaiveDateTime {
    utc + TimeDelta::hours(BANGKOK_OFFSET_HOURS.into())
}

pub fn parse_short_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), SHORT_DATE).ok()
}

/// Minutes since midnight of an `HH:MM` string.
pub fn minutes_of_day(text: &str) -> Option<u32> {
    let (hour, minute) = text.trim().split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    (hour < 24 && minute < 60).then_some(hour * 60 + minute)
}

/// Like [`minutes_of_day`] but without range checks, so `24:30` is 1470.
pub fn clock_minutes(text: &str) -> Option<u32> {
    let (hour, minute) = text.trim().split_once(':')?;
    let hour: u32 = hour.trim().parse().ok()?;
    let minute: u32 = minute.trim().parse().ok()?;
    hour.checked_mul(60)?.checked_add(minute)
}

const THAI_MONTHS: [&str; 12] = [
    "ม.ค", "ก.พ", "มี.ค", "เม.ย", "พ.ค", "มิ.ย", "ก.ค", "ส.ค", "ก.ย", "ต.ค", "พ.ย", "ธ.ค",
];

/// Month number of an abbreviated Thai month name, with or without the final dot.
pub fn thai_month(abbrev: &str) -> Option<u32> {
    let abbrev = abbrev.strip_suffix('.').unwrap_or(abbrev);
    THAI_MONTHS
        .iter()
        .position(|&m| m == abbrev)
        .map(|i| i as u32 + 1)
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum ThaiDateError {
    #[error("Expected `<day> <month> <year>`, found {0:?}")]
    Shape(String),
    #[error("Not a number: {0:?}")]
    Number(String),
    #[error("No such date: day {day}, month {month}, year {year}")]
    OutOfRange { year: i32, month: u32, day: u32 },
}

/// Parses dates such as `17 ต.ค. 2569`, where the year is in the Buddhist era.
///
/// Unknown month names are read as January.
pub fn parse_thai_date(text: &str) -> Result<NaiveDate, ThaiDateError> {
    let mut parts = text.split_whitespace();
    let (Some(day), Some(month), Some(year)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ThaiDateError::Shape(text.to_owned()));
    };
    let day: u32 = day
        .parse()
        .map_err(|_| ThaiDateError::Number(day.to_owned()))?;
    let month = thai_month(month).unwrap_or(1);
    let year = year
        .parse::<i32>()
        .map_err(|_| ThaiDateError::Number(year.to_owned()))?
        - 543;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(ThaiDateError::OutOfRange { year, month, day })
}
