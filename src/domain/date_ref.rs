//! Date reference parsing and resolution

use crate::error::{PilarisError, Result};
use chrono::{NaiveDate, TimeDelta};

/// A user-supplied reference to a calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateReference {
    Today,
    Yesterday,
    Tomorrow,
    /// Signed number of days relative to today (`+3`, `-7`)
    Offset(i64),
    Specific(NaiveDate),
}

impl DateReference {
    /// Parse a date reference string
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_lowercase();

        match normalized.as_str() {
            "today" | "now" => Ok(DateReference::Today),
            "yesterday" => Ok(DateReference::Yesterday),
            "tomorrow" => Ok(DateReference::Tomorrow),
            s if s.starts_with('+') || s.starts_with('-') => s
                .parse::<i64>()
                .map(DateReference::Offset)
                .map_err(|_| PilarisError::InvalidDateReference(input.to_string())),
            s => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(DateReference::Specific)
                .map_err(|_| PilarisError::InvalidDateReference(input.to_string())),
        }
    }

    /// Resolve this reference against `today`
    ///
    /// Offsets that leave the representable calendar are invalid references.
    pub fn resolve(&self, today: NaiveDate) -> Result<NaiveDate> {
        let days = match self {
            DateReference::Today => 0,
            DateReference::Yesterday => -1,
            DateReference::Tomorrow => 1,
            DateReference::Offset(days) => *days,
            DateReference::Specific(date) => return Ok(*date),
        };

        TimeDelta::try_days(days)
            .and_then(|delta| today.checked_add_signed(delta))
            .ok_or_else(|| PilarisError::InvalidDateReference(format!("{:+}", days)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(DateReference::parse("today").unwrap(), DateReference::Today);
        assert_eq!(DateReference::parse(" NOW ").unwrap(), DateReference::Today);
        assert_eq!(
            DateReference::parse("Yesterday").unwrap(),
            DateReference::Yesterday
        );
        assert_eq!(
            DateReference::parse("tomorrow").unwrap(),
            DateReference::Tomorrow
        );
    }

    #[test]
    fn test_parse_offsets() {
        assert_eq!(DateReference::parse("+3").unwrap(), DateReference::Offset(3));
        assert_eq!(DateReference::parse("-10").unwrap(), DateReference::Offset(-10));
        assert!(DateReference::parse("+x").is_err());
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            DateReference::parse("2025-02-28").unwrap(),
            DateReference::Specific(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );
        assert!(DateReference::parse("2025-02-30").is_err());
        assert!(DateReference::parse("28-02-2025").is_err());
    }

    #[test]
    fn test_invalid_reference_error_kind() {
        match DateReference::parse("someday").unwrap_err() {
            PilarisError::InvalidDateReference(s) => assert_eq!(s, "someday"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_across_year_boundary() {
        assert_eq!(
            DateReference::Yesterday.resolve(base()).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert_eq!(
            DateReference::Offset(31).resolve(base()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
        );
        assert_eq!(DateReference::Today.resolve(base()).unwrap(), base());
    }

    #[test]
    fn test_resolve_out_of_range_offset() {
        let huge = DateReference::parse("+999999999999").unwrap();
        let err = huge.resolve(base()).unwrap_err();
        assert!(matches!(err, PilarisError::InvalidDateReference(_)));
        assert_eq!(err.exit_code(), 3);

        assert!(DateReference::Offset(i64::MIN).resolve(base()).is_err());
        assert!(DateReference::Tomorrow.resolve(NaiveDate::MAX).is_err());
    }
}
