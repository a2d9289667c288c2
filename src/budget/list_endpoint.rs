//! The endpoint for listing budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{Budget, get_budgets},
    payload::{MonthQuery, query_params},
};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct ListBudgetsState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListBudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that responds with the budgets ordered by category.
///
/// If the query string contains `month=YYYY-MM`, only the budgets for that
/// month are returned.
pub async fn list_budgets_endpoint(
    State(state): State<ListBudgetsState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Vec<Budget>>, Error> {
    let month = query_params(query)?.parse()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budgets = get_budgets(month, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;

    Ok(Json(budgets))
}
