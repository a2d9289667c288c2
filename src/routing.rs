//! Application router configuration.

use axum::{Json, Router, routing::get};

use crate::{
    AppState, Category, Error,
    budget::{
        create_budget_endpoint, delete_budget_endpoint, edit_budget_endpoint,
        list_budgets_endpoint,
    },
    dashboard::{
        budget_vs_actual_endpoint, category_chart_endpoint, dashboard_summary_endpoint,
        insights_endpoint, monthly_chart_endpoint,
    },
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint)
                .post(create_budget_endpoint)
                .put(edit_budget_endpoint)
                .delete(delete_budget_endpoint),
        )
        .route(endpoints::CATEGORIES, get(get_categories))
        .route(endpoints::BUDGET_VS_ACTUAL, get(budget_vs_actual_endpoint))
        .route(endpoints::INSIGHTS, get(insights_endpoint))
        .route(endpoints::DASHBOARD, get(dashboard_summary_endpoint))
        .route(endpoints::CATEGORY_CHART, get(category_chart_endpoint))
        .route(endpoints::MONTHLY_CHART, get(monthly_chart_endpoint))
        .fallback(get_404_not_found)
        .method_not_allowed_fallback(get_405_method_not_allowed)
        .with_state(state)
}

/// The spending categories in display order.
async fn get_categories() -> Json<[Category; 6]> {
    Json(Category::ALL)
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}

async fn get_405_method_not_allowed() -> Error {
    Error::MethodNotAllowed
}
