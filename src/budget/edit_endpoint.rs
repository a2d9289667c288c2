//! The endpoint for replacing the details of a budget.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, BudgetId, Error,
    budget::{
        Budget, BudgetForm, NewBudget,
        core::{BUDGET_COLUMNS, map_budget_row, map_unique_violation},
    },
    payload::json_body,
};

/// The state needed to replace a budget.
#[derive(Debug, Clone)]
pub struct EditBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for replacing the details of a budget.
///
/// The ID of the budget is taken from the `id` field of the request body.
pub async fn edit_budget_endpoint(
    State(state): State<EditBudgetState>,
    payload: Result<Json<BudgetForm>, JsonRejection>,
) -> Result<Json<Budget>, Error> {
    let (id, budget) = json_body(payload)?.validate_with_id()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = update_budget(id, budget, &connection)?;

    tracing::info!("Updated budget {id}");

    Ok(Json(budget))
}

/// Replace the category, month and amount of the budget `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingBudget] if `id` does not refer to a budget,
/// - [Error::DuplicateBudget] if another budget has the same category and month,
/// - or [Error::SqlError] if there is some other SQL error.
fn update_budget(
    id: BudgetId,
    budget: NewBudget,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "UPDATE budget
             SET category = ?1, month = ?2, amount = ?3, updated_at = ?4
             WHERE id = ?5
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                budget.category(),
                budget.month(),
                budget.amount(),
                OffsetDateTime::now_utc(),
                id,
            ),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingBudget,
            error => map_unique_violation(error),
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State};

    use crate::{
        Category, Error,
        budget::{BudgetForm, NewBudget, create_budget, get_budget},
        payload::NumberOrString,
        test_utils::get_test_connection,
    };

    use super::{EditBudgetState, edit_budget_endpoint};

    fn form(id: i64, category: &str, month: &str, amount: f64) -> BudgetForm {
        BudgetForm {
            id: Some(NumberOrString::Number(id as f64)),
            category: Some(category.to_owned()),
            amount: Some(NumberOrString::Number(amount)),
            month: Some(month.to_owned()),
        }
    }

    fn state_with_budgets(budgets: &[(Category, &str)]) -> (EditBudgetState, Vec<i64>) {
        let connection = get_test_connection();
        let ids = budgets
            .iter()
            .map(|(category, month)| {
                create_budget(
                    NewBudget::new(*category, month.parse().unwrap(), 100.0).unwrap(),
                    &connection,
                )
                .expect("Could not create budget")
                .id
            })
            .collect();

        let state = EditBudgetState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, ids)
    }

    #[tokio::test]
    async fn replaces_budget() {
        let (state, ids) = state_with_budgets(&[(Category::Food, "2024-01")]);

        let budget = edit_budget_endpoint(
            State(state.clone()),
            Ok(Json(form(ids[0], "Health", "2024-02", 55.5))),
        )
        .await
        .expect("Could not update budget")
        .0;

        assert_eq!(budget.id, ids[0]);
        assert_eq!(budget.category, Category::Health);
        assert_eq!(budget.month.to_string(), "2024-02");
        assert_eq!(budget.amount, 55.5);
        assert!(budget.updated_at >= budget.created_at);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_budget(ids[0], &connection), Ok(budget));
    }

    #[tokio::test]
    async fn missing_budget_is_not_found() {
        let (state, _) = state_with_budgets(&[]);

        let result =
            edit_budget_endpoint(State(state), Ok(Json(form(99, "Food", "2024-01", 10.0)))).await;

        assert_eq!(result.err(), Some(Error::UpdateMissingBudget));
    }

    #[tokio::test]
    async fn missing_id_is_rejected() {
        let (state, _) = state_with_budgets(&[]);
        let form = BudgetForm {
            id: None,
            ..form(1, "Food", "2024-01", 10.0)
        };

        let result = edit_budget_endpoint(State(state), Ok(Json(form))).await;

        assert_eq!(result.err(), Some(Error::MissingFields("id".to_owned())));
    }

    #[tokio::test]
    async fn collision_with_other_budget_is_duplicate() {
        let (state, ids) =
            state_with_budgets(&[(Category::Food, "2024-01"), (Category::Transport, "2024-01")]);

        let result = edit_budget_endpoint(
            State(state),
            Ok(Json(form(ids[1], "Food", "2024-01", 10.0))),
        )
        .await;

        assert_eq!(result.err(), Some(Error::DuplicateBudget));
    }
}
