//! The endpoint for creating budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{Budget, BudgetForm, create_budget},
    payload::json_body,
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for creating a new budget.
///
/// Responds with 201 and the saved budget, or 400 if the request body is
/// invalid or a budget already exists for the category and month.
pub async fn create_budget_endpoint(
    State(state): State<CreateBudgetState>,
    payload: Result<Json<BudgetForm>, JsonRejection>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let new_budget = json_body(payload)?.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = create_budget(new_budget, &connection)?;

    tracing::info!(
        "Created budget {} for {} in {}",
        budget.id,
        budget.category,
        budget.month
    );

    Ok((StatusCode::CREATED, Json(budget)))
}
