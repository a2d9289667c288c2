//! The JSON payload for creating and replacing transactions.

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    category::Category,
    payload::{NumberOrString, is_blank_number, is_blank_text, parse_date, require_fields},
    transaction::NewTransaction,
};

/// The request body for creating or replacing a transaction.
///
/// All fields are optional so that missing fields can be reported together
/// in a single error message.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TransactionForm {
    /// The amount spent, as a number or numeric string.
    pub amount: Option<NumberOrString>,
    /// What the money was spent on.
    pub description: Option<String>,
    /// The date of the transaction, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// The category name, e.g. "Food".
    pub category: Option<String>,
}

impl TransactionForm {
    /// Validate the form into a [NewTransaction].
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if any field is missing or blank, or the
    /// validation error of the first invalid field.
    pub fn validate(&self) -> Result<NewTransaction, Error> {
        require_fields(&[
            ("amount", is_blank_number(&self.amount)),
            ("description", is_blank_text(&self.description)),
            ("date", is_blank_text(&self.date)),
            ("category", is_blank_text(&self.category)),
        ])?;

        let amount = self
            .amount
            .as_ref()
            .map_or(Ok(0.0), NumberOrString::to_amount)?;
        let category: Category = self.category.as_deref().unwrap_or_default().parse()?;
        let date = parse_date(self.date.as_deref().unwrap_or_default())?;
        let description = self.description.as_deref().unwrap_or_default();

        NewTransaction::new(amount, description, category, date)
    }
}
