//! Derived views over transactions and budgets.
//!
//! Everything here is computed on request from the stored records: the
//! budget vs actual comparison and insights for a month, the dashboard
//! overview and the chart series.

mod aggregation;
mod charts;
mod handlers;
mod insights;
mod summary;

pub use aggregation::{BudgetVsActual, actual_spending, budget_vs_actual};
pub use charts::{MonthlyExpense, category_breakdown, monthly_expenses};
pub use handlers::{
    budget_vs_actual_endpoint, category_chart_endpoint, dashboard_summary_endpoint,
    insights_endpoint, monthly_chart_endpoint,
};
pub use insights::{Insight, InsightKind, InsightsReport, SpendingSummary, generate_insights};
pub use summary::{CategoryTotal, DashboardSummary, dashboard_summary};
