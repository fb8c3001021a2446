// 🧾 Expense Entity - one expenditure line of a household on a product

use crate::error::{Result, SurveyError, Table};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Owning household (foreign key into households)
    #[serde(rename = "hh_id")]
    pub household_id: String,

    /// Purchased product (foreign key into products)
    pub product_id: String,

    /// Annual expenditure in survey currency units
    #[serde(rename = "annual_expenditure", alias = "amount")]
    pub amount: f64,
}

impl Expense {
    pub fn new(household_id: &str, product_id: &str, amount: f64) -> Self {
        Expense {
            household_id: household_id.to_string(),
            product_id: product_id.to_string(),
            amount,
        }
    }

    pub fn validate(&self, record: usize) -> Result<()> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(SurveyError::malformed(
                Table::Expenses,
                record,
                format!(
                    "expense of household '{}' on product '{}' has invalid amount {}",
                    self.household_id, self.product_id, self.amount
                ),
            ));
        }

        Ok(())
    }
}
