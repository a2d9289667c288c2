//! Turns a month's budgets and spending into short messages for the user.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    Budget, Category, MonthKey, Transaction,
    dashboard::aggregation::{actual_spending, budgets_by_category},
};

/// How an insight should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    /// Spending is over budget.
    Danger,
    /// Spending is close to the budget.
    Warning,
    /// Spending is well under budget.
    Good,
    /// A suggestion, e.g. to set a budget.
    Info,
}

/// A message about the spending in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    /// How the insight should be presented.
    #[serde(rename = "type")]
    pub kind: InsightKind,
    /// The category the insight is about.
    pub category: Category,
    /// The message to show the user.
    pub message: String,
}

/// The overall spending against the budgets for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    /// The sum of the month's budgets.
    pub total_budget: f64,
    /// The sum of the month's spending across all categories.
    pub total_actual: f64,
    /// The share of the total budget that has been spent, capped at 100.
    ///
    /// Absent when there is no budget for the month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_used: Option<f64>,
    /// Whether more was spent than budgeted.
    pub over_budget: bool,
}

/// The insights and summary for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    /// The month the report is about.
    pub month: MonthKey,
    /// Budget insights in budget order, then suggestions in category order.
    pub insights: Vec<Insight>,
    /// The overall totals.
    pub summary: SpendingSummary,
}

/// Round a money amount to cents, with ties rounded away from zero.
///
/// `format!("{:.2}")` alone rounds ties to even, e.g. 0.125 to "0.12".
fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Classify the spending in a budgeted category.
///
/// Returns `None` when spending is between 50% and 90% of the budget.
fn classify(category: Category, budget: f64, actual: f64) -> Option<Insight> {
    // A zero budget gives an infinite percentage if anything was spent and NaN
    // otherwise. NaN matches none of the rules.
    let percentage = actual / budget * 100.0;

    let (kind, message) = if percentage > 100.0 {
        (
            InsightKind::Danger,
            format!(
                "You've exceeded your {category} budget by ₹{:.2}",
                round_to_cents(actual - budget)
            ),
        )
    } else if percentage > 90.0 {
        (
            InsightKind::Warning,
            format!("You've spent {percentage:.1}% of your {category} budget"),
        )
    } else if percentage < 50.0 {
        (
            InsightKind::Good,
            format!("Great job! You're well under budget for {category}"),
        )
    } else {
        return None;
    };

    Some(Insight {
        kind,
        category,
        message,
    })
}

/// Generate the insights and spending summary for `month`.
///
/// Only budgets for `month` and transactions dated in `month` are considered.
pub fn generate_insights(
    transactions: &[Transaction],
    budgets: &[Budget],
    month: MonthKey,
) -> InsightsReport {
    let spending = actual_spending(transactions, month);
    let budgeted = budgets_by_category(budgets, month);

    let mut seen = BTreeSet::new();
    let mut insights: Vec<Insight> = budgets
        .iter()
        .filter(|budget| budget.month == month && seen.insert(budget.category))
        .filter_map(|budget| {
            let actual = spending.get(&budget.category).copied().unwrap_or(0.0);
            classify(budget.category, budget.amount, actual)
        })
        .collect();

    insights.extend(
        spending
            .iter()
            .filter(|(category, _)| !budgeted.contains_key(category))
            .map(|(&category, &spent)| Insight {
                kind: InsightKind::Info,
                category,
                message: format!(
                    "Consider setting a budget for {category} (spent ₹{:.2})",
                    round_to_cents(spent)
                ),
            }),
    );

    let total_budget: f64 = budgeted.values().sum();
    let total_actual: f64 = spending.values().sum();
    let percent_used =
        (total_budget > 0.0).then(|| (total_actual / total_budget * 100.0).min(100.0));

    InsightsReport {
        month,
        insights,
        summary: SpendingSummary {
            total_budget,
            total_actual,
            percent_used,
            over_budget: total_actual > total_budget,
        },
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Category,
        test_utils::{budget, transaction},
    };

    use super::{Insight, InsightKind, generate_insights};

    fn insights_for(actual: f64, budget_amount: f64) -> Vec<Insight> {
        let transactions = vec![transaction(actual, Category::Food, date!(2024 - 01 - 15))];
        let budgets = vec![budget(Category::Food, "2024-01", budget_amount)];

        generate_insights(&transactions, &budgets, "2024-01".parse().unwrap()).insights
    }

    #[test]
    fn near_limit_is_warning() {
        let insights = insights_for(95.0, 100.0);

        assert_eq!(
            insights,
            vec![Insight {
                kind: InsightKind::Warning,
                category: Category::Food,
                message: "You've spent 95.0% of your Food budget".to_owned(),
            }]
        );
    }

    #[test]
    fn over_limit_is_danger() {
        let insights = insights_for(120.0, 100.0);

        assert_eq!(
            insights,
            vec![Insight {
                kind: InsightKind::Danger,
                category: Category::Food,
                message: "You've exceeded your Food budget by ₹20.00".to_owned(),
            }]
        );
    }

    #[test]
    fn overspend_rounds_half_cent_up() {
        let insights = insights_for(100.125, 100.0);

        assert_eq!(
            insights[0].message,
            "You've exceeded your Food budget by ₹0.13"
        );
    }

    #[test]
    fn well_under_limit_is_good() {
        let insights = insights_for(30.0, 100.0);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Good);
        assert_eq!(
            insights[0].message,
            "Great job! You're well under budget for Food"
        );
    }

    #[test]
    fn exactly_at_limit_is_warning() {
        let insights = insights_for(100.0, 100.0);

        assert_eq!(insights[0].kind, InsightKind::Warning);
    }

    #[test]
    fn middle_range_has_no_insight() {
        assert!(insights_for(50.0, 100.0).is_empty());
        assert!(insights_for(90.0, 100.0).is_empty());
    }

    #[test]
    fn unbudgeted_spending_suggests_budget() {
        let transactions = vec![transaction(45.5, Category::Shopping, date!(2024 - 01 - 02))];

        let report = generate_insights(&transactions, &[], "2024-01".parse().unwrap());

        assert_eq!(
            report.insights,
            vec![Insight {
                kind: InsightKind::Info,
                category: Category::Shopping,
                message: "Consider setting a budget for Shopping (spent ₹45.50)".to_owned(),
            }]
        );
    }

    #[test]
    fn zero_budget_with_spending_is_danger() {
        let insights = insights_for(10.0, 0.0);

        assert_eq!(insights[0].kind, InsightKind::Danger);
    }

    #[test]
    fn zero_budget_without_spending_has_no_insight() {
        let budgets = vec![budget(Category::Food, "2024-01", 0.0)];

        let report = generate_insights(&[], &budgets, "2024-01".parse().unwrap());

        assert!(report.insights.is_empty());
    }

    #[test]
    fn budget_insights_come_before_suggestions() {
        let transactions = vec![
            transaction(5.0, Category::Food, date!(2024 - 01 - 02)),
            transaction(99.0, Category::Utilities, date!(2024 - 01 - 03)),
        ];
        let budgets = vec![budget(Category::Utilities, "2024-01", 100.0)];

        let report = generate_insights(&transactions, &budgets, "2024-01".parse().unwrap());

        let kinds: Vec<InsightKind> = report.insights.iter().map(|insight| insight.kind).collect();
        assert_eq!(kinds, vec![InsightKind::Warning, InsightKind::Info]);
        assert_eq!(report.insights[1].category, Category::Food);
    }

    #[test]
    fn summary_totals_and_caps_percentage() {
        let transactions = vec![
            transaction(150.0, Category::Food, date!(2024 - 01 - 02)),
            transaction(50.0, Category::Other, date!(2024 - 01 - 03)),
        ];
        let budgets = vec![
            budget(Category::Food, "2024-01", 100.0),
            budget(Category::Food, "2024-02", 999.0),
        ];

        let summary = generate_insights(&transactions, &budgets, "2024-01".parse().unwrap()).summary;

        assert_eq!(summary.total_budget, 100.0);
        assert_eq!(summary.total_actual, 200.0);
        assert_eq!(summary.percent_used, Some(100.0));
        assert!(summary.over_budget);
    }

    #[test]
    fn summary_without_budget_has_no_percentage() {
        let report = generate_insights(&[], &[], "2024-01".parse().unwrap());

        assert_eq!(report.summary.total_budget, 0.0);
        assert_eq!(report.summary.percent_used, None);
        assert!(!report.summary.over_budget);
    }

    #[test]
    fn serializes_kind_as_type() {
        let report = generate_insights(
            &[transaction(1.0, Category::Health, date!(2024 - 01 - 02))],
            &[],
            "2024-01".parse().unwrap(),
        );

        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["insights"][0]["type"], "info");
        assert_eq!(json["month"], "2024-01");
        assert!(json["summary"].get("percentUsed").is_none());
    }
}
