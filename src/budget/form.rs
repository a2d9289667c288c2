//! The JSON payload for creating and replacing budgets.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    budget::NewBudget,
    category::Category,
    database_id::BudgetId,
    month::MonthKey,
    payload::{NumberOrString, is_blank_number, is_blank_text, require_fields},
};

/// The request body for creating or replacing a budget.
///
/// The `id` is only used when replacing a budget.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct BudgetForm {
    /// The ID of the budget to replace.
    pub id: Option<NumberOrString>,
    /// The category name, e.g. "Food".
    pub category: Option<String>,
    /// The spending limit, as a number or numeric string.
    pub amount: Option<NumberOrString>,
    /// The month, `YYYY-MM`.
    pub month: Option<String>,
}

impl BudgetForm {
    /// Validate the form into a [NewBudget], ignoring `id`.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if any field is missing or blank, or the
    /// validation error of the first invalid field.
    pub fn validate(&self) -> Result<NewBudget, Error> {
        require_fields(&[
            ("category", is_blank_text(&self.category)),
            ("amount", is_blank_number(&self.amount)),
            ("month", is_blank_text(&self.month)),
        ])?;

        self.parse_fields()
    }

    /// Validate the form into the ID of the budget to replace and its new details.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if any field including `id` is missing or
    /// blank, or the validation error of the first invalid field.
    pub fn validate_with_id(&self) -> Result<(BudgetId, NewBudget), Error> {
        require_fields(&[
            ("id", is_blank_number(&self.id)),
            ("category", is_blank_text(&self.category)),
            ("amount", is_blank_number(&self.amount)),
            ("month", is_blank_text(&self.month)),
        ])?;

        let id = self
            .id
            .as_ref()
            .ok_or(Error::BudgetIdRequired)?
            .to_id()?;

        Ok((id, self.parse_fields()?))
    }

    fn parse_fields(&self) -> Result<NewBudget, Error> {
        let category: Category = self.category.as_deref().unwrap_or_default().parse()?;
        let month: MonthKey = self.month.as_deref().unwrap_or_default().parse()?;
        let amount = self
            .amount
            .as_ref()
            .map_or(Ok(0.0), NumberOrString::to_amount)?;

        NewBudget::new(category, month, amount)
    }
}
