// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use survey_inequality::{
    report, run_analysis, run_check, AnalysisConfig, LorenzConvention, Severity,
};

#[derive(Parser)]
#[command(
    name = "survey-inequality",
    version,
    about = "Expenditure shares and Gini coefficient from a household survey"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Compute shares, Lorenz curve and Gini, and write the outputs
    Analyze(AnalyzeArgs),

    /// Load the tables and report data quality issues only
    Check(DataArgs),

    /// Compute the analysis and browse it in the terminal
    View(AnalyzeArgs),
}

#[derive(Args, Clone)]
struct DataArgs {
    /// Directory containing households.csv, expenses.csv and products.csv
    #[arg(long, default_value = "data_package")]
    data_dir: PathBuf,
}

#[derive(Args, Clone)]
struct AnalyzeArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Directory the outputs are written to
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Population convention for the Lorenz curve: household, person or unweighted
    #[arg(long, default_value = "household")]
    convention: LorenzConvention,

    /// Skip rendering lorenz_curve.png
    #[arg(long)]
    no_plot: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        AnalyzeArgs {
            data: DataArgs {
                data_dir: PathBuf::from("data_package"),
            },
            output_dir: PathBuf::from("output"),
            convention: LorenzConvention::default(),
            no_plot: false,
        }
    }
}

impl AnalyzeArgs {
    fn to_config(&self) -> AnalysisConfig {
        let config = AnalysisConfig::new(&self.data.data_dir, &self.output_dir)
            .with_convention(self.convention);
        if self.no_plot {
            config.without_plot()
        } else {
            config
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();

    debug!("survey-inequality started with verbosity level: {}", verbose);
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Command::Analyze(args)) => run_analyze(&args),
        Some(Command::Check(args)) => run_sanity_check(&args),
        Some(Command::View(args)) => run_view(&args),
        // Analysis mode (default)
        None => run_analyze(&AnalyzeArgs::default()),
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = args.to_config();

    println!("📊 Household Expenditure Inequality");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let outcome = run_analysis(&config).with_context(|| {
        format!("analysis of {} failed", config.data_dir.display())
    })?;

    let quality = &outcome.summary.quality;
    if quality.full_coverage() {
        println!("\n✓ Every household ({}) has expenses recorded", quality.households);
    } else {
        println!(
            "\n⚠️  {} of {} households have no recorded expenses",
            quality.households - quality.households_with_expenses,
            quality.households
        );
    }

    println!("\nNational Share of Spending by COICOP Level 1:");
    print!("{}", report::format_share_table(&outcome.analysis.shares, config.share_decimals));

    println!(
        "\nThe bottom {:.0}% of the population accounts for {:.2}% of total expenditure",
        config.bottom_share_fraction * 100.0,
        outcome.summary.bottom_share_pct
    );
    println!(
        "Gini Coefficient: {:.4} ({} convention)",
        outcome.summary.gini, outcome.summary.convention
    );

    println!("\n💾 Outputs:");
    for path in &outcome.written {
        println!("   {}", path.display());
    }

    Ok(())
}

fn run_sanity_check(args: &DataArgs) -> Result<()> {
    let config = AnalysisConfig::new(&args.data_dir, "output");

    println!("🔍 Sanity check: {}", args.data_dir.display());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let report = run_check(&config).context("failed to load survey tables")?;

    println!("{}", report.summary());
    for (locale, count) in &report.locale_counts {
        println!("   {}: {} households", locale, count);
    }

    for issue in &report.issues {
        let marker = match issue.severity {
            Severity::Critical => "❌",
            Severity::Warning => "⚠️ ",
            Severity::Info => "ℹ️ ",
        };
        println!(
            "{} [{}] {} ({}){}",
            marker,
            issue.table,
            issue.issue,
            issue.count,
            if issue.examples.is_empty() {
                String::new()
            } else {
                format!(": {}", issue.examples.join(", "))
            }
        );
    }

    if report.has_critical_issues() {
        anyhow::bail!("critical data quality issues found; the analysis would abort");
    }

    println!("\n✅ Tables are consistent");
    Ok(())
}

#[cfg(feature = "tui")]
fn run_view(args: &AnalyzeArgs) -> Result<()> {
    let config = args.to_config();

    let outcome = run_analysis(&config).with_context(|| {
        format!("analysis of {} failed", config.data_dir.display())
    })?;

    let mut app = ui::App::new(outcome.analysis, outcome.summary);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_view(_args: &AnalyzeArgs) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or run: survey-inequality analyze");
    std::process::exit(1);
}
