// ✅ Data Quality Engine - sanity check of the three survey tables
//
// Runs before the join and reports everything it finds at once:
// coverage (households without expenses), dangling foreign keys,
// duplicate identifiers and unknown COICOP codes. Critical issues are
// the ones the joiner would abort on; warnings never stop a run.

use crate::coicop;
use crate::entities::Locale;
use crate::error::Table;
use crate::loader::SurveyTables;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::warn;

// ============================================================================
// QUALITY ISSUE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // The analysis cannot run on this data
    Warning,  // The analysis runs but the data looks incomplete
    Info,     // Worth knowing
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub table: String,
    pub issue: String,
    /// A few offending identifiers
    pub examples: Vec<String>,
    pub count: usize,
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub households: usize,
    pub expenses: usize,
    pub products: usize,
    pub households_with_expenses: usize,
    /// Household count per locale class ("unknown" when absent)
    pub locale_counts: BTreeMap<String, usize>,
    pub issues: Vec<QualityIssue>,
}

impl QualityReport {
    /// Every household has at least one expense record
    pub fn full_coverage(&self) -> bool {
        self.households_with_expenses == self.households
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    pub fn issues_with(&self, severity: Severity) -> impl Iterator<Item = &QualityIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn summary(&self) -> String {
        format!(
            "{} households ({} with expenses), {} expenses, {} products | {} issues ({} critical)",
            self.households,
            self.households_with_expenses,
            self.expenses,
            self.products,
            self.issues.len(),
            self.issues_with(Severity::Critical).count()
        )
    }
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

pub struct DataQualityEngine {
    /// Maximum identifiers listed per issue
    pub example_limit: usize,
}

impl DataQualityEngine {
    pub fn new() -> Self {
        DataQualityEngine { example_limit: 5 }
    }

    pub fn with_example_limit(example_limit: usize) -> Self {
        DataQualityEngine { example_limit }
    }

    pub fn check(&self, tables: &SurveyTables) -> QualityReport {
        let mut issues = Vec::new();

        let household_ids: HashSet<&str> =
            tables.households.iter().map(|h| h.id.as_str()).collect();
        let product_ids: HashSet<&str> = tables.products.iter().map(|p| p.id.as_str()).collect();

        // Duplicate primary keys
        self.push_issue(
            &mut issues,
            Severity::Critical,
            Table::Households,
            "duplicate household identifiers",
            duplicates(tables.households.iter().map(|h| h.id.as_str())),
        );
        self.push_issue(
            &mut issues,
            Severity::Critical,
            Table::Products,
            "duplicate product identifiers",
            duplicates(tables.products.iter().map(|p| p.id.as_str())),
        );

        // Dangling foreign keys
        let unknown_households: BTreeSet<&str> = tables
            .expenses
            .iter()
            .map(|e| e.household_id.as_str())
            .filter(|id| !household_ids.contains(id))
            .collect();
        self.push_issue(
            &mut issues,
            Severity::Critical,
            Table::Expenses,
            "expenses reference unknown households",
            unknown_households.into_iter().map(str::to_string).collect(),
        );

        let unknown_products: BTreeSet<&str> = tables
            .expenses
            .iter()
            .map(|e| e.product_id.as_str())
            .filter(|id| !product_ids.contains(id))
            .collect();
        self.push_issue(
            &mut issues,
            Severity::Critical,
            Table::Expenses,
            "expenses reference unknown products",
            unknown_products.into_iter().map(str::to_string).collect(),
        );

        // Coverage
        let spending: HashSet<&str> = tables
            .expenses
            .iter()
            .map(|e| e.household_id.as_str())
            .collect();
        let silent: Vec<String> = tables
            .households
            .iter()
            .filter(|h| !spending.contains(h.id.as_str()))
            .map(|h| h.id.clone())
            .collect();
        let households_with_expenses = tables.households.len() - silent.len();
        self.push_issue(
            &mut issues,
            Severity::Warning,
            Table::Households,
            "households without any expense record",
            silent,
        );

        // Category catalogue
        let unknown_codes: BTreeSet<String> = tables
            .products
            .iter()
            .filter(|p| !coicop::is_known(&p.category_code))
            .map(|p| p.category_code.trim().to_string())
            .collect();
        self.push_issue(
            &mut issues,
            Severity::Warning,
            Table::Products,
            "products with a code outside COICOP Level 1",
            unknown_codes.into_iter().collect(),
        );

        // Locale classes outside urban/rural
        let other_locales: BTreeSet<String> = tables
            .households
            .iter()
            .filter_map(|h| h.locale.as_ref())
            .filter(|l| !l.is_recognized())
            .map(|l| l.as_str().to_string())
            .collect();
        self.push_issue(
            &mut issues,
            Severity::Warning,
            Table::Households,
            "locale classes other than urban/rural",
            other_locales.into_iter().collect(),
        );

        let zero_lines = tables.expenses.iter().filter(|e| e.amount == 0.0).count();
        if zero_lines > 0 {
            issues.push(QualityIssue {
                severity: Severity::Info,
                table: Table::Expenses.as_str().to_string(),
                issue: "expense lines with zero amount".to_string(),
                examples: Vec::new(),
                count: zero_lines,
            });
        }

        let mut locale_counts = BTreeMap::new();
        for hh in &tables.households {
            let key = hh.locale.as_ref().map(Locale::as_str).unwrap_or("unknown");
            *locale_counts.entry(key.to_string()).or_insert(0) += 1;
        }

        for issue in issues.iter().filter(|i| i.severity != Severity::Info) {
            warn!(
                table = %issue.table,
                count = issue.count,
                examples = ?issue.examples,
                "{}",
                issue.issue
            );
        }

        QualityReport {
            households: tables.households.len(),
            expenses: tables.expenses.len(),
            products: tables.products.len(),
            households_with_expenses,
            locale_counts,
            issues,
        }
    }

    fn push_issue(
        &self,
        issues: &mut Vec<QualityIssue>,
        severity: Severity,
        table: Table,
        issue: &str,
        offenders: Vec<String>,
    ) {
        if offenders.is_empty() {
            return;
        }

        issues.push(QualityIssue {
            severity,
            table: table.as_str().to_string(),
            issue: issue.to_string(),
            count: offenders.len(),
            examples: offenders.into_iter().take(self.example_limit).collect(),
        });
    }
}

impl Default for DataQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn duplicates<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut repeated = BTreeSet::new();

    for id in ids {
        if !seen.insert(id) {
            repeated.insert(id);
        }
    }

    repeated.into_iter().map(str::to_string).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Expense, Household, Product};

    fn create_valid_tables() -> SurveyTables {
        SurveyTables::new(
            vec![
                Household::new("H1", 10.0, 3).with_locale(Locale::Urban),
                Household::new("H2", 20.0, 2).with_locale(Locale::Rural),
                Household::new("H3", 5.0, 1).with_locale(Locale::Rural),
            ],
            vec![
                Expense::new("H1", "P1", 100.0),
                Expense::new("H2", "P2", 50.0),
                Expense::new("H3", "P1", 10.0),
            ],
            vec![Product::new("P1", "1", "Maize"), Product::new("P2", "4", "Rent")],
        )
    }

    #[test]
    fn test_clean_tables() {
        let report = DataQualityEngine::new().check(&create_valid_tables());

        assert!(report.issues.is_empty());
        assert!(report.full_coverage());
        assert!(!report.has_critical_issues());
        assert_eq!(report.locale_counts.get("rural"), Some(&2));
        assert_eq!(report.locale_counts.get("urban"), Some(&1));
        assert!(!report.summary().is_empty());
    }

    #[test]
    fn test_household_without_expenses_is_warning() {
        let mut tables = create_valid_tables();
        tables.households.push(Household::new("H4", 1.0, 1));

        let report = DataQualityEngine::new().check(&tables);

        assert!(!report.full_coverage());
        assert_eq!(report.households_with_expenses, 3);
        assert!(!report.has_critical_issues());

        let warning = report.issues_with(Severity::Warning).next().unwrap();
        assert_eq!(warning.examples, vec!["H4".to_string()]);
        assert_eq!(report.locale_counts.get("unknown"), Some(&1));
    }

    #[test]
    fn test_dangling_keys_are_critical() {
        let mut tables = create_valid_tables();
        tables.expenses.push(Expense::new("H9", "P1", 1.0));
        tables.expenses.push(Expense::new("H9", "P7", 1.0));

        let report = DataQualityEngine::new().check(&tables);

        assert!(report.has_critical_issues());
        assert_eq!(report.issues_with(Severity::Critical).count(), 2);
    }

    #[test]
    fn test_duplicates_and_unknown_codes() {
        let mut tables = create_valid_tables();
        tables.products.push(Product::new("P1", "1", "Maize again"));
        tables.products.push(Product::new("P3", "15", "Lottery"));
        tables.expenses.push(Expense::new("H1", "P3", 0.0));

        let report = DataQualityEngine::new().check(&tables);

        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Critical && i.examples == vec!["P1".to_string()]));
        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Warning && i.examples == vec!["15".to_string()]));
        assert!(report.issues_with(Severity::Info).any(|i| i.count == 1));
    }

    #[test]
    fn test_unrecognized_locale_is_warning() {
        let mut tables = create_valid_tables();
        tables
            .households
            .push(Household::new("H4", 2.0, 2).with_locale(Locale::parse("peri-urban")));
        tables.expenses.push(Expense::new("H4", "P2", 12.0));

        let report = DataQualityEngine::new().check(&tables);

        assert!(!report.has_critical_issues());
        let warning = report.issues_with(Severity::Warning).next().unwrap();
        assert_eq!(warning.examples, vec!["peri-urban".to_string()]);
        assert_eq!(report.locale_counts.get("peri-urban"), Some(&1));
    }

    #[test]
    fn test_example_limit() {
        let mut tables = create_valid_tables();
        for i in 0..10 {
            tables.households.push(Household::new(&format!("X{}", i), 1.0, 1));
        }

        let report = DataQualityEngine::with_example_limit(3).check(&tables);
        let warning = report.issues_with(Severity::Warning).next().unwrap();

        assert_eq!(warning.count, 10);
        assert_eq!(warning.examples.len(), 3);
    }
}
