//! Monthly spending limits per category.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod list_endpoint;

pub use self::core::{
    Budget, NewBudget, create_budget, create_budget_table, get_budget, get_budgets,
};
pub use create_endpoint::create_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;
pub use edit_endpoint::edit_budget_endpoint;
pub use form::BudgetForm;
pub use list_endpoint::list_budgets_endpoint;
