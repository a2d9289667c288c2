//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `NewTransaction` details
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction REST endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;

pub use self::core::{
    MAX_AMOUNT, MAX_DESCRIPTION_LENGTH, NewTransaction, Transaction, create_transaction,
    create_transaction_table, get_all_transactions, get_transaction, get_transactions_in_months,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::TransactionForm;
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
