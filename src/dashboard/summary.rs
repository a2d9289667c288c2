//! The headline numbers shown on the dashboard.

use serde::{Deserialize, Serialize};

use crate::{Category, Transaction, dashboard::aggregation::category_totals};

/// The number of transactions listed as recent activity.
pub const RECENT_TRANSACTION_COUNT: usize = 5;

/// The total spent in a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The spending category.
    pub category: Category,
    /// The sum of the transaction amounts in the category.
    pub total: f64,
}

/// An overview of all recorded spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The sum of all transaction amounts.
    pub total_expenses: f64,
    /// The total for every category, including those with no spending.
    pub by_category: Vec<CategoryTotal>,
    /// The most recent transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
}

/// Summarise all of the given transactions.
pub fn dashboard_summary(transactions: &[Transaction]) -> DashboardSummary {
    let totals = category_totals(transactions);

    let by_category = Category::ALL
        .into_iter()
        .map(|category| CategoryTotal {
            category,
            total: totals.get(&category).copied().unwrap_or(0.0),
        })
        .collect();

    let mut recent_transactions = transactions.to_vec();
    recent_transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    recent_transactions.truncate(RECENT_TRANSACTION_COUNT);

    DashboardSummary {
        total_expenses: transactions.iter().map(|transaction| transaction.amount).sum(),
        by_category,
        recent_transactions,
    }
}
