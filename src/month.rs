//! The `YYYY-MM` key used to bucket budgets and transactions by month.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::Error;

/// A calendar month, e.g. January 2024.
///
/// Serialized as `YYYY-MM`, e.g. "2024-01".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u8,
}

impl MonthKey {
    /// Create a month key.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if `year` is not four digits or `month`
    /// is not in `1..=12`.
    pub fn new(year: i32, month: u8) -> Result<Self, Error> {
        if !(0..=9999).contains(&year) || !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(format!("{year}-{month}")));
        }

        Ok(Self { year, month })
    }

    /// The month that `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    /// The year, e.g. 2024.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month of the year as a number from 1 to 12.
    pub fn month(&self) -> u8 {
        self.month
    }

    /// Whether `date` falls in this month.
    pub fn contains(&self, date: Date) -> bool {
        Self::from_date(date) == *self
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// A short label for charts, e.g. "Jan 2024".
    pub fn label(&self) -> String {
        let name = match Month::try_from(self.month) {
            Ok(month) => month_abbreviation(month),
            Err(_) => "???",
        };

        format!("{name} {}", self.year)
    }
}

fn month_abbreviation(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    /// Parse a string of the form `YYYY-MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidMonth(s.to_owned());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;

        if year.len() != 4
            || month.len() != 2
            || !year.bytes().all(|b| b.is_ascii_digit())
            || !month.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let year = year.parse().map_err(|_| invalid())?;
        let month = month.parse().map_err(|_| invalid())?;

        MonthKey::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(value: MonthKey) -> Self {
        value.to_string()
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl ToSql for MonthKey {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for MonthKey {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{Error, MonthKey};

    #[test]
    fn parses_valid_month() {
        let month: MonthKey = "2024-01".parse().unwrap();

        assert_eq!(month.year(), 2024);
        assert_eq!(month.month(), 1);
        assert_eq!(month.to_string(), "2024-01");
    }

    #[test]
    fn rejects_malformed_strings() {
        for input in ["2024-1", "24-01", "2024/01", "2024-001", "abcd-ef", "", "2024-01-05"] {
            assert_eq!(
                input.parse::<MonthKey>(),
                Err(Error::InvalidMonth(input.to_owned())),
                "want error for {input:?}"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!("2024-00".parse::<MonthKey>().is_err());
        assert!("2024-13".parse::<MonthKey>().is_err());
    }

    #[test]
    fn contains_dates_in_same_month_only() {
        let month: MonthKey = "2024-02".parse().unwrap();

        assert!(month.contains(date!(2024 - 02 - 01)));
        assert!(month.contains(date!(2024 - 02 - 29)));
        assert!(!month.contains(date!(2024 - 03 - 01)));
        assert!(!month.contains(date!(2023 - 02 - 15)));
    }

    #[test]
    fn previous_wraps_around_year() {
        let month: MonthKey = "2024-01".parse().unwrap();

        assert_eq!(month.previous().to_string(), "2023-12");
        assert_eq!(month.previous().previous().to_string(), "2023-11");
    }

    #[test]
    fn label_uses_short_month_name() {
        let month = MonthKey::from_date(date!(2025 - 09 - 14));

        assert_eq!(month.label(), "Sep 2025");
    }

    #[test]
    fn serializes_as_string() {
        let month: MonthKey = "2024-07".parse().unwrap();

        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-07\"");
        assert_eq!(
            serde_json::from_str::<MonthKey>("\"2024-07\"").unwrap(),
            month
        );
        assert!(serde_json::from_str::<MonthKey>("\"July\"").is_err());
    }
}
