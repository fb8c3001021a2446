// 📂 Table Loader - CSV → in-memory relations
//
// Thin collaborator: reads the three survey tables, validates each record at
// the boundary (MalformedInput) and fingerprints the source files so the
// summary can be traced back to the exact inputs.

use crate::entities::{Expense, Household, Product};
use crate::error::{Result, SurveyError, Table};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ============================================================================
// SURVEY TABLES
// ============================================================================

/// The three relations, fully loaded
#[derive(Debug, Clone, Default)]
pub struct SurveyTables {
    pub households: Vec<Household>,
    pub expenses: Vec<Expense>,
    pub products: Vec<Product>,
}

impl SurveyTables {
    pub fn new(
        households: Vec<Household>,
        expenses: Vec<Expense>,
        products: Vec<Product>,
    ) -> Self {
        SurveyTables {
            households,
            expenses,
            products,
        }
    }
}

/// Where the tables come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePaths {
    pub households: PathBuf,
    pub expenses: PathBuf,
    pub products: PathBuf,
}

impl TablePaths {
    /// Standard file names inside one directory
    pub fn in_dir(dir: &Path) -> Self {
        TablePaths {
            households: dir.join("households.csv"),
            expenses: dir.join("expenses.csv"),
            products: dir.join("products.csv"),
        }
    }
}

/// SHA-256 of an input file, recorded in the run summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFingerprint {
    pub table: String,
    pub path: String,
    pub sha256: String,
    pub records: usize,
}

// ============================================================================
// LOADING
// ============================================================================

/// Deserialize and validate every record of one table
///
/// Records are numbered from 1 (first data row after the header).
pub fn read_table<T, R, F>(reader: R, table: Table, validate: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
    F: Fn(&T, usize) -> Result<()>,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        let record_no = index + 1;
        let record: T =
            result.map_err(|e| SurveyError::malformed(table, record_no, e.to_string()))?;

        validate(&record, record_no)?;
        records.push(record);
    }

    debug!(table = %table, records = records.len(), "table loaded");

    Ok(records)
}

pub fn load_households(path: &Path) -> Result<Vec<Household>> {
    let file = fs::File::open(path)?;
    read_table(file, Table::Households, |hh: &Household, n| hh.validate(n))
}

pub fn load_expenses(path: &Path) -> Result<Vec<Expense>> {
    let file = fs::File::open(path)?;
    read_table(file, Table::Expenses, |e: &Expense, n| e.validate(n))
}

pub fn load_products(path: &Path) -> Result<Vec<Product>> {
    let file = fs::File::open(path)?;
    read_table(file, Table::Products, |p: &Product, n| p.validate(n))
}

/// Load all three tables
pub fn load_survey(paths: &TablePaths) -> Result<SurveyTables> {
    let households = load_households(&paths.households)?;
    let expenses = load_expenses(&paths.expenses)?;
    let products = load_products(&paths.products)?;

    info!(
        households = households.len(),
        expenses = expenses.len(),
        products = products.len(),
        "survey tables loaded"
    );

    Ok(SurveyTables::new(households, expenses, products))
}

// ============================================================================
// FINGERPRINTS
// ============================================================================

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn fingerprint(table: Table, path: &Path, records: usize) -> Result<InputFingerprint> {
    let bytes = fs::read(path)?;

    Ok(InputFingerprint {
        table: table.as_str().to_string(),
        path: path.display().to_string(),
        sha256: sha256_hex(&bytes),
        records,
    })
}

pub fn fingerprint_all(
    paths: &TablePaths,
    tables: &SurveyTables,
) -> Result<Vec<InputFingerprint>> {
    Ok(vec![
        fingerprint(Table::Households, &paths.households, tables.households.len())?,
        fingerprint(Table::Expenses, &paths.expenses, tables.expenses.len())?,
        fingerprint(Table::Products, &paths.products, tables.products.len())?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Locale;

    #[test]
    fn test_read_households() {
        let data = "hh_id,weight,urban_rural,hh_size\nH1,100.5,urban,3\nH2,80,rural,5\nH3,10,,1\n";
        let households = read_table(data.as_bytes(), Table::Households, |hh: &Household, n| {
            hh.validate(n)
        })
        .unwrap();

        assert_eq!(households.len(), 3);
        assert_eq!(households[0].id, "H1");
        assert_eq!(households[0].locale, Some(Locale::Urban));
        assert_eq!(households[1].size, 5);
        assert_eq!(households[2].locale, None);
    }

    #[test]
    fn test_unrecognized_locale_does_not_abort_load() {
        let data = "hh_id,weight,urban_rural,hh_size\nH1,1,semi-urban,2\nH2,1,2,1\n";
        let households = read_table(data.as_bytes(), Table::Households, |hh: &Household, n| {
            hh.validate(n)
        })
        .unwrap();

        assert_eq!(
            households[0].locale,
            Some(Locale::Other("semi-urban".to_string()))
        );
        assert_eq!(households[1].locale, Some(Locale::Rural));
    }

    #[test]
    fn test_numeric_ids_read_as_text() {
        let data = "hh_id,product_id,annual_expenditure\n101,2001,45.5\n";
        let expenses =
            read_table(data.as_bytes(), Table::Expenses, |e: &Expense, n| e.validate(n)).unwrap();

        assert_eq!(expenses[0].household_id, "101");
        assert_eq!(expenses[0].product_id, "2001");
        assert_eq!(expenses[0].amount, 45.5);
    }

    #[test]
    fn test_non_numeric_amount_is_malformed() {
        let data = "hh_id,product_id,annual_expenditure\nH1,P1,12\nH1,P2,abc\n";
        let err = read_table(data.as_bytes(), Table::Expenses, |e: &Expense, n| {
            e.validate(n)
        })
        .unwrap_err();

        assert!(matches!(
            err,
            SurveyError::MalformedInput {
                table: Table::Expenses,
                record: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_column_is_malformed() {
        let data = "hh_id,hh_size\nH1,3\n";
        let err = read_table(data.as_bytes(), Table::Households, |hh: &Household, n| {
            hh.validate(n)
        })
        .unwrap_err();

        assert!(matches!(err, SurveyError::MalformedInput { .. }));
    }

    #[test]
    fn test_product_label_is_optional() {
        let data = "product_id,coicop_survey_1\nP1,1\n";
        let products =
            read_table(data.as_bytes(), Table::Products, |p: &Product, n| p.validate(n)).unwrap();

        assert_eq!(products[0].category_code, "1");
        assert!(products[0].description.is_empty());
    }

    #[test]
    fn test_sha256_is_stable() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
