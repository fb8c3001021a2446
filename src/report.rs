// 📝 Output Sink - share table, Lorenz points and run summary on disk
//
// Files written to the output directory:
//   national_share.csv  coicop_code,category,weighted_total,share_pct
//   lorenz_curve.csv    population_share,expenditure_share
//   summary.json        RunSummary (see below)

use crate::aggregate::CategoryShare;
use crate::data_quality::QualityReport;
use crate::error::Result;
use crate::inequality::{InequalityResult, LorenzConvention, LorenzPoint};
use crate::loader::InputFingerprint;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SHARE_TABLE_FILE: &str = "national_share.csv";
pub const LORENZ_TABLE_FILE: &str = "lorenz_curve.csv";
pub const LORENZ_PLOT_FILE: &str = "lorenz_curve.png";
pub const SUMMARY_FILE: &str = "summary.json";

// ============================================================================
// ROWS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRow {
    pub coicop_code: String,
    pub category: String,
    pub weighted_total: f64,
    pub share_pct: f64,
}

impl ShareRow {
    pub fn from_share(share: &CategoryShare, decimals: u32) -> Self {
        ShareRow {
            coicop_code: share.category_code.clone(),
            category: share.label.clone(),
            weighted_total: share.weighted_total,
            share_pct: share.rounded_share(decimals),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LorenzRow {
    pub population_share: f64,
    pub expenditure_share: f64,
}

impl From<&LorenzPoint> for LorenzRow {
    fn from(p: &LorenzPoint) -> Self {
        LorenzRow {
            population_share: p.population,
            expenditure_share: p.expenditure,
        }
    }
}

// ============================================================================
// RUN SUMMARY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub convention: LorenzConvention,
    pub gini: f64,
    pub bottom_share_fraction: f64,
    /// Percent of weighted expenditure held by the bottom fraction
    pub bottom_share_pct: f64,
    pub households_analyzed: usize,
    pub categories: usize,
    pub grand_total_weighted: f64,
    pub quality: QualityReport,
    pub inputs: Vec<InputFingerprint>,
}

impl RunSummary {
    pub fn new(
        shares: &[CategoryShare],
        inequality: &InequalityResult,
        bottom_share_fraction: f64,
        quality: QualityReport,
        inputs: Vec<InputFingerprint>,
    ) -> Self {
        RunSummary {
            generated_at: Utc::now(),
            convention: inequality.convention,
            gini: inequality.gini,
            bottom_share_fraction,
            bottom_share_pct: inequality.bottom_share(bottom_share_fraction),
            households_analyzed: inequality.households,
            categories: shares.len(),
            grand_total_weighted: crate::aggregate::grand_total(shares),
            quality,
            inputs,
        }
    }
}

// ============================================================================
// WRITERS
// ============================================================================

fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::Writer::from_path(path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    Ok(())
}

pub fn write_share_table(path: &Path, shares: &[CategoryShare], decimals: u32) -> Result<()> {
    write_rows(path, shares.iter().map(|s| ShareRow::from_share(s, decimals)))
}

pub fn write_lorenz_table(path: &Path, points: &[LorenzPoint]) -> Result<()> {
    write_rows(path, points.iter().map(LorenzRow::from))
}

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)?;

    Ok(())
}

/// Share table as aligned text for the terminal
pub fn format_share_table(shares: &[CategoryShare], decimals: u32) -> String {
    let width = shares
        .iter()
        .map(|s| s.label.len())
        .max()
        .unwrap_or(0)
        .max("Category".len());

    let mut out = format!("{:<width$}  {:>9}\n", "Category", "Share (%)", width = width);
    for share in shares {
        out.push_str(&format!(
            "{:<width$}  {:>9.prec$}\n",
            share.label,
            share.rounded_share(decimals),
            width = width,
            prec = decimals as usize
        ));
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
