//! A personal finance tracker.
//!
//! Users record transactions, set monthly budgets per category and get
//! summaries and insights derived from both.
//!
//! This library provides a JSON REST API backed by a SQLite database.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::{Deserialize, Serialize};
use tokio::signal;

mod app_state;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod month;
mod payload;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use budget::{Budget, NewBudget, create_budget, get_budget, get_budgets};
pub use category::Category;
pub use dashboard::{
    BudgetVsActual, CategoryTotal, DashboardSummary, Insight, InsightKind, InsightsReport,
    MonthlyExpense, SpendingSummary, actual_spending, budget_vs_actual, category_breakdown,
    dashboard_summary, generate_insights, monthly_expenses,
};
pub use database_id::{BudgetId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::MonthKey;
pub use routing::build_router;
pub use timezone::get_local_offset;
pub use transaction::{
    MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, NewTransaction, Transaction, create_transaction, get_all_transactions,
    get_transaction, get_transactions_in_months,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more required fields were missing or blank in the request body.
    ///
    /// Holds a comma separated list of the missing field names.
    #[error("Missing required fields: {0}")]
    MissingFields(String),

    /// An amount was given as a string that could not be parsed as a number.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    /// A transaction amount was zero, negative or not finite.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// An amount was larger than [MAX_AMOUNT].
    #[error("Amount cannot exceed {max}", max = MAX_AMOUNT)]
    AmountTooLarge,

    /// A transaction description was longer than [MAX_DESCRIPTION_LENGTH].
    #[error("Description cannot exceed {max} characters", max = MAX_DESCRIPTION_LENGTH)]
    DescriptionTooLong,

    /// The category is not one of the allowed categories.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The date string is not a calendar date in the format `YYYY-MM-DD`.
    #[error("invalid date \"{0}\", expected YYYY-MM-DD")]
    InvalidDate(String),

    /// The month string is not a month in the format `YYYY-MM`.
    #[error("invalid month \"{0}\", expected YYYY-MM")]
    InvalidMonth(String),

    /// An ID in the path, query string or body was not a valid integer ID.
    #[error("invalid ID \"{0}\"")]
    InvalidId(String),

    /// A budget update or delete request did not include the budget ID.
    #[error("Budget ID required")]
    BudgetIdRequired,

    /// The request body could not be parsed as JSON of the expected shape.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// A budget for the same category and month already exists.
    ///
    /// Budgets are unique per (category, month) so that each category has at
    /// most one spending limit in any month.
    #[error("Budget already exists for this category and month")]
    DuplicateBudget,

    /// Tried to update a transaction that does not exist
    #[error("Transaction not found")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("Transaction not found")]
    DeleteMissingTransaction,

    /// Tried to update a budget that does not exist
    #[error("Budget not found")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("Budget not found")]
    DeleteMissingBudget,

    /// The route exists but does not support the request method.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code that the error should be reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingFields(_)
            | Error::InvalidAmount(_)
            | Error::NonPositiveAmount
            | Error::AmountTooLarge
            | Error::DescriptionTooLong
            | Error::InvalidCategory(_)
            | Error::InvalidDate(_)
            | Error::InvalidMonth(_)
            | Error::InvalidId(_)
            | Error::BudgetIdRequired
            | Error::InvalidRequestBody(_)
            | Error::DuplicateBudget => StatusCode::BAD_REQUEST,
            Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingBudget
            | Error::DeleteMissingBudget
            | Error::NotFound => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// A message describing what went wrong.
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Details of server-side failures are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
