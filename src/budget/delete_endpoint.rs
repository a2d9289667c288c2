//! The endpoint for deleting budgets.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, BudgetId, Error,
    payload::{parse_id, query_params},
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query string for deleting a budget, e.g. `?id=3`.
#[derive(Debug, Default, Deserialize)]
pub struct BudgetIdQuery {
    /// The ID of the budget to delete.
    pub id: Option<String>,
}

/// A route handler for deleting the budget named by the `id` query parameter.
///
/// Responds with 204 on success.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    query: Result<Query<BudgetIdQuery>, QueryRejection>,
) -> Result<StatusCode, Error> {
    let query = query_params(query)?;
    let id = match query.id.as_deref().map(str::trim) {
        None | Some("") => return Err(Error::BudgetIdRequired),
        Some(id) => parse_id(id)?,
    };

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_budget(id, &connection)?;

    tracing::info!("Deleted budget {id}");

    Ok(StatusCode::NO_CONTENT)
}

fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}
