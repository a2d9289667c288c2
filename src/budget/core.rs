//! Defines the core data models and database queries for budgets.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Error, category::Category, database_id::BudgetId, month::MonthKey, transaction::MAX_AMOUNT,
};

/// A spending limit for one category in one month.
///
/// There is at most one budget for each (category, month) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The category the limit applies to.
    pub category: Category,
    /// The month the limit applies to.
    pub month: MonthKey,
    /// The most that should be spent in the category during the month.
    pub amount: f64,
    /// When the budget was first saved.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the budget was last saved.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated details of a budget that has not been saved yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewBudget {
    category: Category,
    month: MonthKey,
    amount: f64,
}

impl NewBudget {
    /// Validate the details of a budget.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if `amount` is not a finite number greater than zero,
    /// or [Error::AmountTooLarge] if `amount` is greater than [MAX_AMOUNT].
    pub fn new(category: Category, month: MonthKey, amount: f64) -> Result<Self, Error> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        if amount > MAX_AMOUNT {
            return Err(Error::AmountTooLarge);
        }

        Ok(Self {
            category,
            month,
            amount,
        })
    }

    /// The category the limit applies to.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The month the limit applies to.
    pub fn month(&self) -> MonthKey {
        self.month
    }

    /// The spending limit.
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

pub(super) const BUDGET_COLUMNS: &str = "id, category, month, amount, created_at, updated_at";

/// Create a new budget in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::DuplicateBudget] if a budget already exists for the category and month,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(budget: NewBudget, connection: &Connection) -> Result<Budget, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .prepare(&format!(
            "INSERT INTO budget (category, month, amount, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (budget.category, budget.month, budget.amount, now),
            map_budget_row,
        )
        .map_err(map_unique_violation)
}

/// Retrieve a budget by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid budget,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_budget(id: BudgetId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(&format!("SELECT {BUDGET_COLUMNS} FROM budget WHERE id = :id"))?
        .query_row(&[(":id", &id)], map_budget_row)
        .map_err(|error| error.into())
}

/// Retrieve budgets ordered by category name, optionally only those for `month`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_budgets(month: Option<MonthKey>, connection: &Connection) -> Result<Vec<Budget>, Error> {
    let mut statement = connection.prepare(&format!(
        "SELECT {BUDGET_COLUMNS} FROM budget
         WHERE ?1 IS NULL OR month = ?1
         ORDER BY category ASC, month ASC"
    ))?;

    statement
        .query_map([month], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Create the budget table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL
                CHECK (category IN ('Food', 'Transport', 'Shopping', 'Health', 'Utilities', 'Other')),
            month TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_budget_category_month ON budget(category, month);",
    )?;

    Ok(())
}

/// Map a database row to a Budget.
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        month: row.get(2)?,
        amount: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Convert a failed budget write into [Error::DuplicateBudget] if it violated
/// the (category, month) unique index.
pub(super) fn map_unique_violation(error: rusqlite::Error) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            _,
        ) => Error::DuplicateBudget,
        error => error.into(),
    }
}

#[cfg(test)]
mod new_budget_tests {
    use crate::{Category, Error, MAX_AMOUNT, MonthKey};

    use super::NewBudget;

    fn january() -> MonthKey {
        "2024-01".parse().unwrap()
    }

    #[test]
    fn accepts_positive_amount() {
        let budget = NewBudget::new(Category::Food, january(), 80.0).unwrap();

        assert_eq!(budget.category(), Category::Food);
        assert_eq!(budget.month(), january());
        assert_eq!(budget.amount(), 80.0);
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert_eq!(
            NewBudget::new(Category::Food, january(), 0.0),
            Err(Error::NonPositiveAmount)
        );
        assert_eq!(
            NewBudget::new(Category::Food, january(), -1.0),
            Err(Error::NonPositiveAmount)
        );
    }

    #[test]
    fn rejects_amount_over_limit() {
        assert_eq!(
            NewBudget::new(Category::Food, january(), MAX_AMOUNT * 2.0),
            Err(Error::AmountTooLarge)
        );
    }

    #[test]
    fn rejects_infinite_amount() {
        assert_eq!(
            NewBudget::new(Category::Food, january(), f64::INFINITY),
            Err(Error::NonPositiveAmount)
        );
    }
}

#[cfg(test)]
mod database_tests {
    use rusqlite::Connection;

    use crate::{Category, Error, MonthKey, db::initialize};

    use super::{NewBudget, create_budget, get_budget, get_budgets};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn month(text: &str) -> MonthKey {
        text.parse().unwrap()
    }

    fn new_budget(category: Category, month_text: &str, amount: f64) -> NewBudget {
        NewBudget::new(category, month(month_text), amount).unwrap()
    }

    #[test]
    fn create_succeeds() {
        let connection = get_test_connection();

        let budget = create_budget(new_budget(Category::Food, "2024-01", 80.0), &connection)
            .expect("Could not create budget");

        assert!(budget.id > 0);
        assert_eq!(budget.category, Category::Food);
        assert_eq!(budget.month, month("2024-01"));
        assert_eq!(budget.amount, 80.0);
        assert_eq!(budget.created_at, budget.updated_at);
    }

    #[test]
    fn create_fails_on_duplicate_category_and_month() {
        let connection = get_test_connection();
        create_budget(new_budget(Category::Food, "2024-01", 80.0), &connection)
            .expect("Could not create budget");

        let duplicate = create_budget(new_budget(Category::Food, "2024-01", 120.0), &connection);

        assert_eq!(duplicate, Err(Error::DuplicateBudget));
    }

    #[test]
    fn same_category_in_different_months_is_allowed() {
        let connection = get_test_connection();
        create_budget(new_budget(Category::Food, "2024-01", 80.0), &connection).unwrap();

        let result = create_budget(new_budget(Category::Food, "2024-02", 80.0), &connection);

        assert!(result.is_ok());
    }

    #[test]
    fn get_returns_created_budget() {
        let connection = get_test_connection();
        let created = create_budget(new_budget(Category::Health, "2024-03", 50.0), &connection)
            .expect("Could not create budget");

        assert_eq!(get_budget(created.id, &connection), Ok(created));
    }

    #[test]
    fn get_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_budget(1, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_budgets_orders_by_category_name() {
        let connection = get_test_connection();
        let utilities =
            create_budget(new_budget(Category::Utilities, "2024-01", 1.0), &connection).unwrap();
        let food = create_budget(new_budget(Category::Food, "2024-01", 1.0), &connection).unwrap();
        let health = create_budget(new_budget(Category::Health, "2024-01", 1.0), &connection).unwrap();

        let budgets = get_budgets(None, &connection).expect("Could not get budgets");

        assert_eq!(budgets, vec![food, health, utilities]);
    }

    #[test]
    fn get_budgets_filters_by_month() {
        let connection = get_test_connection();
        let january =
            create_budget(new_budget(Category::Food, "2024-01", 1.0), &connection).unwrap();
        create_budget(new_budget(Category::Food, "2024-02", 1.0), &connection).unwrap();

        let budgets =
            get_budgets(Some(month("2024-01")), &connection).expect("Could not get budgets");

        assert_eq!(budgets, vec![january]);
    }

    #[test]
    fn get_budgets_for_month_without_budgets_is_empty() {
        let connection = get_test_connection();
        create_budget(new_budget(Category::Food, "2024-01", 1.0), &connection).unwrap();

        let budgets =
            get_budgets(Some(month("2025-01")), &connection).expect("Could not get budgets");

        assert!(budgets.is_empty());
    }
}
