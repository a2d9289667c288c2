//! Data series for the dashboard charts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    MonthKey, Transaction,
    dashboard::{aggregation::category_totals, summary::CategoryTotal},
};

/// The number of months shown in the monthly expenses chart.
pub const MONTHLY_CHART_MONTHS: usize = 6;

/// The total spent in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExpense {
    /// The month, e.g. "2024-01".
    pub month: MonthKey,
    /// The chart label, e.g. "Jan 2024".
    pub label: String,
    /// The sum of the transaction amounts dated in the month.
    pub total: f64,
}

/// Per-category totals over all transactions for the category pie chart.
///
/// Categories with nothing spent are left out.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    category_totals(transactions)
        .into_iter()
        .filter(|(_, total)| *total > 0.0)
        .map(|(category, total)| CategoryTotal { category, total })
        .collect()
}

/// The `months` consecutive months ending with `current`, oldest first.
pub(super) fn month_window(current: MonthKey, months: usize) -> Vec<MonthKey> {
    let mut window: Vec<MonthKey> = std::iter::successors(Some(current), |month| Some(month.previous()))
        .take(months)
        .collect();
    window.reverse();
    window
}

/// Monthly spending totals for the `months` months ending with `current`.
///
/// Months without transactions are reported with a total of zero.
pub fn monthly_expenses(
    transactions: &[Transaction],
    current: MonthKey,
    months: usize,
) -> Vec<MonthlyExpense> {
    let mut totals: BTreeMap<MonthKey, f64> = BTreeMap::new();

    for transaction in transactions {
        *totals
            .entry(MonthKey::from_date(transaction.date))
            .or_insert(0.0) += transaction.amount;
    }

    month_window(current, months)
        .into_iter()
        .map(|month| MonthlyExpense {
            month,
            label: month.label(),
            total: totals.get(&month).copied().unwrap_or(0.0),
        })
        .collect()
}
