//! Values of the `dateTime` primitive.
//!
//! A FHIR `dateTime` may be written to year, month, day or full instant
//! precision. Equality and hashing follow the written form: a full
//! dateTime compares its local time and its offset, so `10:00+00:00` and
//! `11:00+01:00` are different values even though they are the same instant.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

static PARTIAL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?<year>\d{4})(?:-(?<month>\d{2}))?$").expect("valid partial date pattern")
});

/// A `dateTime` at the precision it was written with.
#[derive(Debug, Clone, Copy)]
pub enum DateTimeValue {
    /// `2023`
    Year(i32),
    /// `2023-05`
    YearMonth(i32, u32),
    /// `2023-05-01`
    Date(NaiveDate),
    /// `2023-05-01T10:00:00+02:00`
    DateTime(DateTime<FixedOffset>),
}

/// A string that is not a valid FHIR `dateTime`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid dateTime '{value}': {reason}")]
pub struct DateTimeParseError {
    pub value: String,
    pub reason: &'static str,
}

impl DateTimeValue {
    pub fn year(&self) -> i32 {
        match self {
            DateTimeValue::Year(year) | DateTimeValue::YearMonth(year, _) => *year,
            DateTimeValue::Date(date) => date.year(),
            DateTimeValue::DateTime(date_time) => date_time.year(),
        }
    }

    /// True for year, year-month and date values.
    pub fn is_partial(&self) -> bool {
        !matches!(self, DateTimeValue::DateTime(_))
    }

    /// Range checks for the components chrono does not validate itself.
    pub(crate) fn check(&self) -> Result<(), &'static str> {
        let month = match self {
            DateTimeValue::YearMonth(_, month) => Some(*month),
            _ => None,
        };
        if !(1..=9999).contains(&self.year()) {
            return Err("year must be between 0001 and 9999");
        }
        if month.is_some_and(|month| !(1..=12).contains(&month)) {
            return Err("month must be between 01 and 12");
        }
        Ok(())
    }
}

impl FromStr for DateTimeValue {
    type Err = DateTimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: &'static str| DateTimeParseError {
            value: s.to_string(),
            reason,
        };

        let value = if let Some(parts) = PARTIAL_PATTERN.captures(s) {
            let year = parts["year"].parse::<i32>().map_err(|_| error("invalid year"))?;
            match parts.name("month") {
                Some(month) => {
                    let month = month.as_str().parse::<u32>().map_err(|_| error("invalid month"))?;
                    DateTimeValue::YearMonth(year, month)
                }
                None => DateTimeValue::Year(year),
            }
        } else if s.contains('T') {
            DateTime::parse_from_rfc3339(s)
                .map(DateTimeValue::DateTime)
                .map_err(|_| error("a time requires seconds and a timezone offset"))?
        } else {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(DateTimeValue::Date)
                .map_err(|_| error("expected YYYY, YYYY-MM, YYYY-MM-DD or a full dateTime"))?
        };

        value.check().map_err(error)?;
        Ok(value)
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeValue::Year(year) => write!(f, "{year:04}"),
            DateTimeValue::YearMonth(year, month) => write!(f, "{year:04}-{month:02}"),
            DateTimeValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateTimeValue::DateTime(date_time) => {
                f.write_str(&date_time.to_rfc3339_opts(SecondsFormat::AutoSi, false))
            }
        }
    }
}

impl PartialEq for DateTimeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (DateTimeValue::Year(a), DateTimeValue::Year(b)) => a == b,
            (DateTimeValue::YearMonth(a, a_month), DateTimeValue::YearMonth(b, b_month)) => {
                a == b && a_month == b_month
            }
            (DateTimeValue::Date(a), DateTimeValue::Date(b)) => a == b,
            (DateTimeValue::DateTime(a), DateTimeValue::DateTime(b)) => {
                a.naive_local() == b.naive_local() && a.offset() == b.offset()
            }
            _ => false,
        }
    }
}

impl Eq for DateTimeValue {}

impl Hash for DateTimeValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            DateTimeValue::Year(year) => year.hash(state),
            DateTimeValue::YearMonth(year, month) => {
                year.hash(state);
                month.hash(state);
            }
            DateTimeValue::Date(date) => date.hash(state),
            DateTimeValue::DateTime(date_time) => {
                date_time.naive_local().hash(state);
                date_time.offset().local_minus_utc().hash(state);
            }
        }
    }
}

impl From<DateTime<FixedOffset>> for DateTimeValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DateTimeValue::DateTime(value)
    }
}

impl From<NaiveDate> for DateTimeValue {
    fn from(value: NaiveDate) -> Self {
        DateTimeValue::Date(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_precision() {
        assert_eq!("2023".parse::<DateTimeValue>(), Ok(DateTimeValue::Year(2023)));
        assert_eq!("2023-05".parse::<DateTimeValue>(), Ok(DateTimeValue::YearMonth(2023, 5)));
        let date = "2023-05-01".parse::<DateTimeValue>().unwrap();
        assert_eq!(date, DateTimeValue::Date(NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()));
        assert!(date.is_partial());

        let full = "2023-05-01T10:00:00+02:00".parse::<DateTimeValue>().unwrap();
        assert!(!full.is_partial());
        assert_eq!(full.year(), 2023);
    }

    #[test]
    fn test_written_form_round_trips() {
        for text in ["2023", "2023-05", "2023-05-01", "2023-05-01T10:00:00+02:00"] {
            let value = text.parse::<DateTimeValue>().unwrap();
            assert_eq!(value.to_string(), text);
        }
    }

    #[test]
    fn test_offset_is_part_of_equality() {
        let utc = "2023-05-01T10:00:00+00:00".parse::<DateTimeValue>().unwrap();
        let shifted = "2023-05-01T11:00:00+01:00".parse::<DateTimeValue>().unwrap();
        assert_ne!(utc, shifted);
        assert_eq!(utc, "2023-05-01T10:00:00Z".parse::<DateTimeValue>().unwrap());
    }

    #[test]
    fn test_invalid_values() {
        assert!("2023-13".parse::<DateTimeValue>().is_err());
        assert!("0000".parse::<DateTimeValue>().is_err());
        assert!("2023-02-30".parse::<DateTimeValue>().is_err());
        assert!("2023-05-01T10:00".parse::<DateTimeValue>().is_err());
        let err = "May 2023".parse::<DateTimeValue>().unwrap_err();
        assert_eq!(err.value, "May 2023");
        assert!(DateTimeValue::YearMonth(2023, 0).check().is_err());
    }
}
