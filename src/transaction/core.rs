//! Defines the core data models and database queries for transactions.

use std::ops::RangeInclusive;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, category::Category, database_id::TransactionId, month::MonthKey};

/// The largest amount accepted for a transaction or budget.
///
/// Keeps sums over many records finite.
pub const MAX_AMOUNT: f64 = 1_000_000_000_000.0;

/// The max number of characters (grapheme clusters) in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 200;

// ============================================================================
// MODELS
// ============================================================================

/// An expense, i.e. an event where money was spent.
///
/// To create a new `Transaction`, validate the details with
/// [NewTransaction::new] and save it with [create_transaction].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The amount of money spent in this transaction. Always greater than zero.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// What kind of spending the transaction was.
    pub category: Category,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was first saved.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last saved.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated details of a transaction that has not been saved yet.
///
/// Also used to replace the details of an existing transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    amount: f64,
    description: String,
    category: Category,
    date: Date,
}

impl NewTransaction {
    /// Validate the details of a transaction.
    ///
    /// The description is trimmed of surrounding whitespace.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if `amount` is not a finite number greater than zero,
    /// - [Error::AmountTooLarge] if `amount` is greater than [MAX_AMOUNT],
    /// - [Error::MissingFields] if `description` is blank,
    /// - or [Error::DescriptionTooLong] if `description` is longer than [MAX_DESCRIPTION_LENGTH].
    pub fn new(
        amount: f64,
        description: &str,
        category: Category,
        date: Date,
    ) -> Result<Self, Error> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        if amount > MAX_AMOUNT {
            return Err(Error::AmountTooLarge);
        }

        let description = description.trim();

        if description.is_empty() {
            return Err(Error::MissingFields("description".to_owned()));
        }

        if description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::DescriptionTooLong);
        }

        Ok(Self {
            amount,
            description: description.to_owned(),
            category,
            date,
        })
    }

    /// The amount of money spent.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The trimmed description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The spending category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// When the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str = "id, amount, description, category, date, created_at, updated_at";

/// Create a new transaction in the database.
///
/// Both timestamps are set to the current time.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" (amount, description, category, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.amount,
                transaction.description,
                transaction.category,
                transaction.date,
                now,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve all transactions, most recent date first.
///
/// Transactions on the same date are ordered newest first by ID.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY date DESC, id DESC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the transactions dated within `months`, most recent date first.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_transactions_in_months(
    months: RangeInclusive<MonthKey>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // Dates are stored as `YYYY-MM-DD`, so the first seven characters are the month key.
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"
             WHERE substr(date, 1, 7) BETWEEN ?1 AND ?2
             ORDER BY date DESC, id DESC"
        ))?
        .query_map((months.start(), months.end()), map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL CHECK (length(description) > 0),
                category TEXT NOT NULL
                    CHECK (category IN ('Food', 'Transport', 'Shopping', 'Health', 'Utilities', 'Other')),
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date DESC);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        description: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
