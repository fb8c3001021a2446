// 🏷️ Product Entity - survey product and its COICOP Level 1 category

use crate::error::{Result, SurveyError, Table};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "product_id")]
    pub id: String,

    /// COICOP Level 1 code, kept as text ("1" ... "12")
    #[serde(rename = "coicop_survey_1", alias = "category_code")]
    pub category_code: String,

    /// Descriptive label (optional in some extracts)
    #[serde(alias = "label", alias = "product_name", default)]
    pub description: String,
}

impl Product {
    pub fn new(id: &str, category_code: &str, description: &str) -> Self {
        Product {
            id: id.to_string(),
            category_code: category_code.to_string(),
            description: description.to_string(),
        }
    }

    pub fn validate(&self, record: usize) -> Result<()> {
        if self.category_code.trim().is_empty() {
            return Err(SurveyError::malformed(
                Table::Products,
                record,
                format!("product '{}' has no COICOP category", self.id),
            ));
        }

        Ok(())
    }
}
