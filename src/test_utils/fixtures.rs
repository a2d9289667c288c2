use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{AppState, Budget, Category, Transaction, db::initialize};

/// An in-memory database with the application's tables.
pub(crate) fn get_test_connection() -> Connection {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");
    initialize(&connection).expect("Could not initialize database.");
    connection
}

/// Application state backed by an in-memory database, using UTC as the local timezone.
pub(crate) fn get_test_state() -> AppState {
    AppState::new(
        Connection::open_in_memory().expect("Could not open database in memory."),
        "Etc/UTC",
    )
    .expect("Could not create app state.")
}

/// An unsaved transaction for testing the aggregation functions.
pub(crate) fn transaction(amount: f64, category: Category, date: Date) -> Transaction {
    Transaction {
        id: 0,
        amount,
        description: "Test".to_owned(),
        category,
        date,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}

/// An unsaved budget for testing the aggregation functions.
pub(crate) fn budget(category: Category, month: &str, amount: f64) -> Budget {
    Budget {
        id: 0,
        category,
        month: month.parse().expect("Invalid month in test"),
        amount,
        created_at: OffsetDateTime::UNIX_EPOCH,
        updated_at: OffsetDateTime::UNIX_EPOCH,
    }
}
