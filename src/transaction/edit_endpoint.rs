//! The endpoint for replacing the details of a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
};
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    database_id::TransactionId,
    payload::{json_body, parse_id},
    transaction::{NewTransaction, Transaction, TransactionForm, core::map_transaction_row},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler that replaces every field of a transaction.
///
/// Responds with the updated transaction, 400 if the request is invalid or
/// 404 if the transaction does not exist.
pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let transaction_id = parse_id(&transaction_id)?;
    let details = json_body(payload)?.validate()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("Could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = update_transaction(transaction_id, details, &connection)?;

    tracing::info!("Updated transaction {transaction_id}");

    Ok(Json(transaction))
}

/// Replace the details of the transaction `id` and refresh its update timestamp.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a transaction,
/// - or [Error::SqlError] if there is some other SQL error.
fn update_transaction(
    id: TransactionId,
    details: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "UPDATE \"transaction\"
            SET amount = ?1, description = ?2, category = ?3, date = ?4, updated_at = ?5
            WHERE id = ?6
            RETURNING id, amount, description, category, date, created_at, updated_at",
        )?
        .query_row(
            (
                details.amount(),
                details.description(),
                details.category(),
                details.date(),
                OffsetDateTime::now_utc(),
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => {
                tracing::error!("Could not update transaction {id}: {error}");
                error.into()
            }
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::date;

    use crate::{
        Category, Error,
        payload::NumberOrString,
        test_utils::{get_test_connection, parse_json_body},
        transaction::{NewTransaction, Transaction, TransactionForm, create_transaction},
    };

    use super::{EditTransactionState, edit_transaction_endpoint, update_transaction};

    fn get_state_with_transaction() -> (EditTransactionState, Transaction) {
        let connection = get_test_connection();
        let transaction = create_transaction(
            NewTransaction::new(10.0, "Original", Category::Food, date!(2024 - 01 - 01)).unwrap(),
            &connection,
        )
        .expect("Could not create transaction");

        let state = EditTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        (state, transaction)
    }

    fn replacement_form() -> TransactionForm {
        TransactionForm {
            amount: Some(NumberOrString::Number(25.0)),
            description: Some("Replaced".to_owned()),
            date: Some("2024-02-14".to_owned()),
            category: Some("Shopping".to_owned()),
        }
    }

    #[tokio::test]
    async fn replaces_every_field() {
        let (state, original) = get_state_with_transaction();

        let response = edit_transaction_endpoint(
            State(state),
            Path(original.id.to_string()),
            Ok(Json(replacement_form())),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let updated: Transaction = parse_json_body(response).await;
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.amount, 25.0);
        assert_eq!(updated.description, "Replaced");
        assert_eq!(updated.category, Category::Shopping);
        assert_eq!(updated.date, date!(2024 - 02 - 14));
        assert_eq!(updated.created_at, original.created_at);
        assert!(updated.updated_at >= original.updated_at);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let (state, original) = get_state_with_transaction();

        let result = edit_transaction_endpoint(
            State(state),
            Path((original.id + 1).to_string()),
            Ok(Json(replacement_form())),
        )
        .await;

        assert_eq!(result.err(), Some(Error::UpdateMissingTransaction));
    }

    #[tokio::test]
    async fn invalid_form_does_not_modify_transaction() {
        let (state, original) = get_state_with_transaction();
        let form = TransactionForm {
            amount: Some(NumberOrString::Number(-1.0)),
            ..replacement_form()
        };

        let result =
            edit_transaction_endpoint(State(state.clone()), Path(original.id.to_string()), Ok(Json(form)))
                .await;

        assert_eq!(result.err(), Some(Error::NonPositiveAmount));
        let unchanged =
            crate::transaction::get_transaction(original.id, &state.db_connection.lock().unwrap());
        assert_eq!(unchanged, Ok(original));
    }

    #[test]
    fn update_missing_id_returns_error() {
        let connection = get_test_connection();
        let details =
            NewTransaction::new(1.0, "Nothing", Category::Other, date!(2024 - 01 - 01)).unwrap();

        let result = update_transaction(999, details, &connection);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }
}
