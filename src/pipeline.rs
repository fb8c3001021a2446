// 🧮 Analysis pipeline
//
// Loader → Quality check → Joiner → { Aggregator, Inequality Engine } → Sink
//
// `analyze_tables` is the pure core; `run_analysis` adds file I/O around it.

use crate::aggregate::{self, CategoryShare};
use crate::config::AnalysisConfig;
use crate::data_quality::{DataQualityEngine, QualityReport};
use crate::error::Result;
use crate::inequality::{InequalityEngine, InequalityResult, LorenzConvention};
use crate::join::join_survey;
use crate::loader::{self, SurveyTables};
use crate::plot;
use crate::report::{self, RunSummary};
use std::path::PathBuf;
use tracing::info;

/// Shares and inequality for in-memory tables
#[derive(Debug, Clone)]
pub struct Analysis {
    pub shares: Vec<CategoryShare>,
    pub inequality: InequalityResult,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub analysis: Analysis,
    pub summary: RunSummary,
    pub written: Vec<PathBuf>,
}

pub fn analyze_tables(tables: &SurveyTables, convention: LorenzConvention) -> Result<Analysis> {
    let joined = join_survey(tables)?;
    let shares = aggregate::aggregate(&joined.records)?;
    let inequality =
        InequalityEngine::with_convention(convention).analyze(&joined.household_totals)?;

    Ok(Analysis { shares, inequality })
}

/// Load and sanity-check the tables without computing anything
pub fn run_check(config: &AnalysisConfig) -> Result<QualityReport> {
    let tables = loader::load_survey(&config.table_paths())?;
    Ok(DataQualityEngine::new().check(&tables))
}

pub fn run_analysis(config: &AnalysisConfig) -> Result<AnalysisOutcome> {
    let paths = config.table_paths();
    let tables = loader::load_survey(&paths)?;
    let inputs = loader::fingerprint_all(&paths, &tables)?;

    let quality = DataQualityEngine::new().check(&tables);
    info!("{}", quality.summary());

    let analysis = analyze_tables(&tables, config.convention)?;
    info!("{}", analysis.inequality.summary());

    let summary = RunSummary::new(
        &analysis.shares,
        &analysis.inequality,
        config.bottom_share_fraction,
        quality,
        inputs,
    );

    let mut written = Vec::new();

    let share_path = config.output_path(report::SHARE_TABLE_FILE);
    report::write_share_table(&share_path, &analysis.shares, config.share_decimals)?;
    written.push(share_path);

    let lorenz_path = config.output_path(report::LORENZ_TABLE_FILE);
    report::write_lorenz_table(&lorenz_path, &analysis.inequality.points)?;
    written.push(lorenz_path);

    if config.render_plot {
        let plot_path = config.output_path(report::LORENZ_PLOT_FILE);
        plot::render_lorenz_curve(
            &analysis.inequality.points,
            analysis.inequality.gini,
            &plot_path,
        )?;
        written.push(plot_path);
    }

    let summary_path = config.output_path(report::SUMMARY_FILE);
    report::write_summary(&summary_path, &summary)?;
    written.push(summary_path);

    info!(files = written.len(), dir = %config.output_dir.display(), "outputs written");

    Ok(AnalysisOutcome {
        analysis,
        summary,
        written,
    })
}

// ============================================================================
// TESTS
// ============================================================================
