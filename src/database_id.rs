//! Database ID type definitions.

/// Alias for the integer type used for mapping to transaction IDs.
pub type TransactionId = i64;

/// Alias for the integer type used for mapping to budget IDs.
pub type BudgetId = i64;
