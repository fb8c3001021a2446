// 🔗 Dataset Joiner - expenses ⋈ households ⋈ products
//
// Each reference table is indexed once (identifier → position in the table),
// then every expense is resolved with two O(1) lookups. A miss is a
// DataIntegrity error: dropping the row would bias the weighted totals.

use crate::coicop;
use crate::entities::{Expense, Household, Product};
use crate::error::{Result, SurveyError, Table};
use crate::loader::SurveyTables;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

// ============================================================================
// DERIVED RECORDS
// ============================================================================

/// One expense line with the fields the aggregator needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedExpense {
    pub category_code: String,
    pub amount: f64,
    pub weight: f64,
}

impl EnrichedExpense {
    pub fn weighted_amount(&self) -> f64 {
        self.amount * self.weight
    }
}

/// Unweighted expenditure of one household, the unit of the inequality measure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdTotal {
    pub household_id: String,
    pub weight: f64,
    pub size: u32,
    pub total: f64,
}

impl HouseholdTotal {
    pub fn new(household_id: &str, weight: f64, total: f64) -> Self {
        HouseholdTotal {
            household_id: household_id.to_string(),
            weight,
            size: 1,
            total,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn per_capita(&self) -> f64 {
        self.total / f64::from(self.size)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JoinedSurvey {
    pub records: Vec<EnrichedExpense>,
    pub household_totals: Vec<HouseholdTotal>,
}

// ============================================================================
// DATASET JOINER
// ============================================================================

pub struct DatasetJoiner<'a> {
    households: &'a [Household],
    products: &'a [Product],
    household_index: HashMap<&'a str, usize>,
    product_index: HashMap<&'a str, usize>,
}

impl<'a> DatasetJoiner<'a> {
    /// Index both reference tables; repeated identifiers are rejected
    pub fn new(households: &'a [Household], products: &'a [Product]) -> Result<Self> {
        let household_index =
            build_index(households.iter().map(|h| h.id.as_str()), Table::Households)?;
        let product_index = build_index(products.iter().map(|p| p.id.as_str()), Table::Products)?;

        Ok(DatasetJoiner {
            households,
            products,
            household_index,
            product_index,
        })
    }

    pub fn from_tables(tables: &'a SurveyTables) -> Result<Self> {
        Self::new(&tables.households, &tables.products)
    }

    pub fn product(&self, id: &str) -> Option<&'a Product> {
        self.product_index.get(id).map(|&i| &self.products[i])
    }

    /// Resolve every expense and reduce per household
    ///
    /// Household totals follow the order of the households table and only
    /// include households with at least one expense record.
    pub fn join(&self, expenses: &[Expense]) -> Result<JoinedSurvey> {
        let mut records = Vec::with_capacity(expenses.len());
        let mut totals: Vec<Option<f64>> = vec![None; self.households.len()];

        for (index, expense) in expenses.iter().enumerate() {
            let record_no = index + 1;

            let hh_pos = *self
                .household_index
                .get(expense.household_id.as_str())
                .ok_or_else(|| {
                    SurveyError::missing_key(
                        Table::Households,
                        record_no,
                        &expense.household_id,
                    )
                })?;

            let product = self.product(&expense.product_id).ok_or_else(|| {
                SurveyError::missing_key(Table::Products, record_no, &expense.product_id)
            })?;

            let household = &self.households[hh_pos];

            records.push(EnrichedExpense {
                category_code: coicop::normalize_code(&product.category_code),
                amount: expense.amount,
                weight: household.weight,
            });

            *totals[hh_pos].get_or_insert(0.0) += expense.amount;
        }

        let household_totals: Vec<HouseholdTotal> = self
            .households
            .iter()
            .zip(totals)
            .filter_map(|(hh, total)| {
                total.map(|total| HouseholdTotal {
                    household_id: hh.id.clone(),
                    weight: hh.weight,
                    size: hh.size,
                    total,
                })
            })
            .collect();

        debug!(
            records = records.len(),
            households = household_totals.len(),
            "expenses joined"
        );

        Ok(JoinedSurvey {
            records,
            household_totals,
        })
    }
}

fn build_index<'a>(
    ids: impl Iterator<Item = &'a str>,
    table: Table,
) -> Result<HashMap<&'a str, usize>> {
    let mut index = HashMap::new();

    for (pos, id) in ids.enumerate() {
        if index.insert(id, pos).is_some() {
            return Err(SurveyError::duplicate_key(table, pos + 1, id));
        }
    }

    Ok(index)
}

/// Convenience: index and join in one call
pub fn join_survey(tables: &SurveyTables) -> Result<JoinedSurvey> {
    DatasetJoiner::from_tables(tables)?.join(&tables.expenses)
}

// ============================================================================
// TESTS
// ============================================================================
