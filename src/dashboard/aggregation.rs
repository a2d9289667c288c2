//! Joins the budgets of a month with the spending in the same month.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{Budget, Category, MonthKey, Transaction};

/// A category's budget compared with what was actually spent in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetVsActual {
    /// The spending category.
    pub category: Category,
    /// The budgeted amount, or zero if the category has no budget.
    pub budget: f64,
    /// The total spent in the category.
    pub actual: f64,
    /// How much of the budget is left, never less than zero.
    pub remaining: f64,
}

/// Sums the amounts of the transactions in `month` per category.
pub fn actual_spending(transactions: &[Transaction], month: MonthKey) -> BTreeMap<Category, f64> {
    category_totals(
        transactions
            .iter()
            .filter(|transaction| month.contains(transaction.date)),
    )
}

/// Sums transaction amounts per category.
///
/// The map is ordered by category declaration order.
pub(super) fn category_totals<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();

    for transaction in transactions {
        *totals.entry(transaction.category).or_insert(0.0) += transaction.amount;
    }

    totals
}

/// The budget amount for each category in `month`.
///
/// If a category somehow has more than one budget in the month, the first one wins.
pub(super) fn budgets_by_category(budgets: &[Budget], month: MonthKey) -> BTreeMap<Category, f64> {
    let mut amounts = BTreeMap::new();

    for budget in budgets.iter().filter(|budget| budget.month == month) {
        amounts.entry(budget.category).or_insert(budget.amount);
    }

    amounts
}

/// Compares the budgets for `month` with the spending in `month`.
///
/// Every category that has a budget or spending in the month gets one entry,
/// in category declaration order. Budgets and transactions outside the month
/// are ignored.
pub fn budget_vs_actual(
    transactions: &[Transaction],
    budgets: &[Budget],
    month: MonthKey,
) -> Vec<BudgetVsActual> {
    let spending = actual_spending(transactions, month);
    let budgeted = budgets_by_category(budgets, month);

    let categories: BTreeSet<Category> = budgeted.keys().chain(spending.keys()).copied().collect();

    categories
        .into_iter()
        .map(|category| {
            let budget = budgeted.get(&category).copied().unwrap_or(0.0);
            let actual = spending.get(&category).copied().unwrap_or(0.0);

            BudgetVsActual {
                category,
                budget,
                actual,
                remaining: (budget - actual).max(0.0),
            }
        })
        .collect()
}
