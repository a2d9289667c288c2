//! Helpers for decoding loosely typed JSON request payloads.
//!
//! Clients may send numbers as JSON numbers or as numeric strings (e.g. the
//! value of an HTML input), and may omit fields entirely. The request structs
//! therefore use optional, permissive field types and are validated into
//! strict domain types by the handlers.

use axum::{
    Json,
    extract::{
        Query,
        rejection::{JsonRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, MonthKey};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// A JSON value that is either a number or a string holding a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    /// A plain JSON number, e.g. `12.5`.
    Number(f64),
    /// A string, e.g. `"12.5"`.
    String(String),
}

impl NumberOrString {
    /// Whether the value should be treated as absent, i.e. a blank string.
    pub fn is_blank(&self) -> bool {
        matches!(self, NumberOrString::String(text) if text.trim().is_empty())
    }

    /// Interpret the value as an amount of money.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the string is not a number.
    pub fn to_amount(&self) -> Result<f64, Error> {
        match self {
            NumberOrString::Number(number) => Ok(*number),
            NumberOrString::String(text) => text
                .trim()
                .parse()
                .map_err(|_| Error::InvalidAmount(text.to_owned())),
        }
    }

    /// Interpret the value as an integer database ID.
    ///
    /// # Errors
    /// Returns [Error::InvalidId] if the value is not a whole number.
    pub fn to_id(&self) -> Result<i64, Error> {
        match self {
            NumberOrString::Number(number) if number.fract() == 0.0 && number.is_finite() => {
                Ok(*number as i64)
            }
            NumberOrString::Number(number) => Err(Error::InvalidId(number.to_string())),
            NumberOrString::String(text) => parse_id(text),
        }
    }
}

/// Parse an integer database ID from text.
///
/// # Errors
/// Returns [Error::InvalidId] if `text` is not an integer.
pub fn parse_id(text: &str) -> Result<i64, Error> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidId(text.to_owned()))
}

/// Parse a calendar date in the format `YYYY-MM-DD`.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Whether an optional text field is missing or blank.
pub fn is_blank_text(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|text| text.trim().is_empty())
}

/// Whether an optional number field is missing or blank.
pub fn is_blank_number(value: &Option<NumberOrString>) -> bool {
    value.as_ref().is_none_or(NumberOrString::is_blank)
}

/// Return [Error::MissingFields] naming every field flagged as missing.
///
/// Each entry in `fields` is a field name paired with whether it is missing.
///
/// # Errors
/// Returns an error if any field is missing.
pub fn require_fields(fields: &[(&str, bool)]) -> Result<(), Error> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, is_missing)| *is_missing)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::MissingFields(missing.join(", ")))
    }
}

/// Unwrap a JSON body, converting a rejection into a client error.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!("Rejected JSON body: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    })
}

/// Unwrap a query string, converting a rejection into a client error.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, Error> {
    query.map(|Query(params)| params).map_err(|rejection| {
        tracing::debug!("Rejected query string: {rejection}");
        Error::InvalidRequestBody(rejection.body_text())
    })
}

/// The query string of endpoints that operate on a single month.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The month in the format `YYYY-MM`.
    pub month: Option<String>,
}

impl MonthQuery {
    /// Parse the month, treating a blank value as absent.
    ///
    /// # Errors
    /// Returns [Error::InvalidMonth] if the month is present but malformed.
    pub fn parse(&self) -> Result<Option<MonthKey>, Error> {
        match self.month.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(month) => month.parse().map(Some),
        }
    }
}
