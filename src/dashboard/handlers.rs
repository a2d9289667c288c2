//! Route handlers for the dashboard, insight and chart endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State, rejection::QueryRejection},
};
use rusqlite::Connection;

use crate::{
    AppState, Error, MonthKey,
    budget::get_budgets,
    dashboard::{
        aggregation::{BudgetVsActual, budget_vs_actual},
        charts::{MONTHLY_CHART_MONTHS, MonthlyExpense, category_breakdown, monthly_expenses},
        insights::{InsightsReport, generate_insights},
        summary::{CategoryTotal, DashboardSummary, dashboard_summary},
    },
    payload::{MonthQuery, query_params},
    timezone::get_local_date,
    transaction::{get_all_transactions, get_transactions_in_months},
};

/// The state needed for the dashboard endpoints.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The current month in the local timezone.
fn current_month(local_timezone: &str) -> Result<MonthKey, Error> {
    get_local_date(local_timezone).map(MonthKey::from_date)
}

/// The month from the query string, or the current month if it was omitted.
fn requested_month(
    query: Result<Query<MonthQuery>, QueryRejection>,
    local_timezone: &str,
) -> Result<MonthKey, Error> {
    match query_params(query)?.parse()? {
        Some(month) => Ok(month),
        None => current_month(local_timezone),
    }
}

/// A route handler that compares each category's budget with its spending.
pub async fn budget_vs_actual_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<Vec<BudgetVsActual>>, Error> {
    let month = requested_month(query, &state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_in_months(month..=month, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions for {month}: {error}"))?;
    let budgets = get_budgets(Some(month), &connection)
        .inspect_err(|error| tracing::error!("could not get budgets for {month}: {error}"))?;

    Ok(Json(budget_vs_actual(&transactions, &budgets, month)))
}

/// A route handler for the spending insights of a month.
pub async fn insights_endpoint(
    State(state): State<DashboardState>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Result<Json<InsightsReport>, Error> {
    let month = requested_month(query, &state.local_timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_in_months(month..=month, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions for {month}: {error}"))?;
    let budgets = get_budgets(Some(month), &connection)
        .inspect_err(|error| tracing::error!("could not get budgets for {month}: {error}"))?;

    Ok(Json(generate_insights(&transactions, &budgets, month)))
}

/// A route handler for the dashboard overview of all transactions.
pub async fn dashboard_summary_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<DashboardSummary>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(dashboard_summary(&transactions)))
}

/// A route handler for the spending per category pie chart.
pub async fn category_chart_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<Vec<CategoryTotal>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(category_breakdown(&transactions)))
}

/// A route handler for the monthly spending bar chart covering the last six months.
pub async fn monthly_chart_endpoint(
    State(state): State<DashboardState>,
) -> Result<Json<Vec<MonthlyExpense>>, Error> {
    let current = current_month(&state.local_timezone)?;
    let first = (1..MONTHLY_CHART_MONTHS).fold(current, |month, _| month.previous());

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = get_transactions_in_months(first..=current, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;

    Ok(Json(monthly_expenses(
        &transactions,
        current,
        MONTHLY_CHART_MONTHS,
    )))
}
