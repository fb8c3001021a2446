// Survey Inequality - Core Library
// Category expenditure shares, Lorenz curve and Gini coefficient from a
// weighted household expenditure survey. Used by the CLI and by tests.

pub mod error;
pub mod entities;
pub mod coicop;
pub mod loader;
pub mod join;           // Dataset Joiner
pub mod aggregate;      // Weighted Aggregator
pub mod inequality;     // Inequality Engine
pub mod data_quality;   // Sanity check of the input tables
pub mod config;
pub mod report;         // CSV / JSON sink
pub mod plot;           // PNG sink
pub mod pipeline;

// Re-export commonly used types
pub use error::{Result, SurveyError, Table};
pub use entities::{Expense, Household, Locale, Product};
pub use loader::{
    InputFingerprint, SurveyTables, TablePaths,
    load_survey, load_households, load_expenses, load_products,
};
pub use join::{DatasetJoiner, EnrichedExpense, HouseholdTotal, JoinedSurvey, join_survey};
pub use aggregate::{CategoryShare, aggregate};
pub use inequality::{
    InequalityEngine, InequalityResult, LorenzConvention, LorenzPoint,
    gini_from_curve, bottom_share,
};
pub use data_quality::{DataQualityEngine, QualityIssue, QualityReport, Severity};
pub use config::AnalysisConfig;
pub use report::RunSummary;
pub use pipeline::{Analysis, AnalysisOutcome, analyze_tables, run_analysis, run_check};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
