// ❗ Error taxonomy for the survey analysis
//
// Every failure aborts the run. Variants carry enough context (table,
// record number, identifier) to locate the offending row in the input.

use thiserror::Error;

/// Table a record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Households,
    Expenses,
    Products,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Households => "households",
            Table::Expenses => "expenses",
            Table::Products => "products",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum SurveyError {
    /// A foreign key is missing from its reference table, or a primary key repeats
    #[error("data integrity error in {table} (record {record}, key '{key}'): {message}")]
    DataIntegrity {
        table: Table,
        record: usize,
        key: String,
        message: String,
    },

    /// Totals are zero, so shares and Lorenz fractions are undefined
    #[error("empty dataset: {context}")]
    EmptyDataset { context: String },

    /// Field missing or unusable value at the loading boundary
    #[error("malformed input in {table} (record {record}): {message}")]
    MalformedInput {
        table: Table,
        record: usize,
        message: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("plot rendering failed: {0}")]
    Plot(String),
}

impl SurveyError {
    pub fn missing_key(table: Table, record: usize, key: &str) -> Self {
        SurveyError::DataIntegrity {
            table,
            record,
            key: key.to_string(),
            message: format!("expense references an identifier absent from {}", table),
        }
    }

    pub fn duplicate_key(table: Table, record: usize, key: &str) -> Self {
        SurveyError::DataIntegrity {
            table,
            record,
            key: key.to_string(),
            message: "identifier appears more than once".to_string(),
        }
    }

    pub fn empty(context: impl Into<String>) -> Self {
        SurveyError::EmptyDataset {
            context: context.into(),
        }
    }

    pub fn malformed(table: Table, record: usize, message: impl Into<String>) -> Self {
        SurveyError::MalformedInput {
            table,
            record,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SurveyError>;
