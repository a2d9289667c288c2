//! The fixed set of spending categories.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// What a transaction or budget is for.
///
/// Categories are ordered by declaration, which is also the order they are
/// listed in summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, eating out, etc.
    Food,
    /// Fuel, public transport, taxis, etc.
    Transport,
    /// Clothes, electronics and other purchases.
    Shopping,
    /// Doctor visits, medicine, gym memberships, etc.
    Health,
    /// Power, water, internet, phone, etc.
    Utilities,
    /// Anything that does not fit the other categories.
    Other,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Transport,
        Category::Shopping,
        Category::Health,
        Category::Utilities,
        Category::Other,
    ];

    /// The name of the category as it appears in JSON and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Parse a category from its exact name, e.g. "Food".
    ///
    /// Surrounding whitespace is ignored, but the name is case sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();

        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
            .ok_or_else(|| Error::InvalidCategory(name.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let name = value.as_str()?;

        name.parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}
