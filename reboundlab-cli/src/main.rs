//! ReboundLab CLI — drawdown and recovery analysis commands.
//!
//! Commands:
//! - `analyze` — rank the candidate universe by size, analyze the top N
//! - `scan` — analyze a single series from a CSV file
//! - `universe` — print the candidate universe as TOML
//!
//! Exit status is 1 only when nothing could be analyzed.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use reboundlab_core::data::{
    load_series_csv, CircuitBreaker, DataProvider, FetchOutcome, LogProgress, SyntheticProvider,
    Universe, YahooProvider,
};
use reboundlab_runner::{
    analyze_outcome, recovery_records, render_report, save_artifacts, select_top_instruments,
    AnalysisConfig, BatchReport, BatchRunner, BatchVerdict, RecoveryRecord,
};

#[derive(Parser)]
#[command(
    name = "reboundlab",
    about = "ReboundLab CLI — drawdown and recovery analysis over daily price series"
)]
struct Cli {
    /// Log level when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the universe by size, then analyze the top N instruments.
    Analyze {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Universe TOML file (overrides the config file).
        #[arg(long)]
        universe: Option<PathBuf>,

        /// Explicit candidates instead of the universe (e.g. --symbols SPY,QQQ).
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Number of instruments to analyze after ranking.
        #[arg(long)]
        top_n: Option<usize>,

        /// Calendar days of history to request.
        #[arg(long)]
        history_days: Option<u32>,

        /// Last day of history (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        #[command(flatten)]
        params: ParamArgs,

        /// Use deterministic synthetic data instead of Yahoo Finance.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Analyze instruments one at a time.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Directory for exported artifacts. Nothing is written without it.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Analyze a single price series from a CSV file (date,close).
    Scan {
        /// CSV file with a header row.
        csv: PathBuf,

        /// Instrument symbol. Defaults to the file stem.
        #[arg(long)]
        symbol: Option<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        params: ParamArgs,

        /// Directory for exported artifacts.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the candidate universe as TOML.
    Universe {
        /// Universe TOML file. Defaults to the built-in ETF list.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Analysis parameter overrides; each wins over the config file.
#[derive(Args)]
struct ParamArgs {
    /// Drop threshold as a negative fraction (e.g. -0.10).
    #[arg(long, allow_hyphen_values = true)]
    drop_threshold: Option<f64>,

    /// Recovery threshold as a positive fraction (e.g. 0.15).
    #[arg(long)]
    recovery_threshold: Option<f64>,

    /// Earliest recovery, in trading days after the bottom.
    #[arg(long)]
    min_offset: Option<usize>,

    /// Latest recovery, in trading days after the bottom.
    #[arg(long)]
    max_offset: Option<usize>,

    /// Maximum trading days between a drawdown's start and its bottom.
    #[arg(long)]
    lookback_window: Option<usize>,
}

impl ParamArgs {
    fn apply(&self, config: &mut AnalysisConfig) {
        let p = &mut config.analysis;
        if let Some(v) = self.drop_threshold {
            p.drop_threshold = v;
        }
        if let Some(v) = self.recovery_threshold {
            p.recovery_threshold = v;
        }
        if let Some(v) = self.min_offset {
            p.min_offset = v;
        }
        if let Some(v) = self.max_offset {
            p.max_offset = v;
        }
        if let Some(v) = self.lookback_window {
            p.lookback_window = v;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let verdict = match cli.command {
        Commands::Analyze {
            config,
            universe,
            symbols,
            top_n,
            history_days,
            end,
            params,
            synthetic,
            sequential,
            output_dir,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            params.apply(&mut cfg);
            if let Some(n) = top_n {
                cfg.universe.top_n = n;
            }
            if let Some(days) = history_days {
                cfg.universe.history_days = days;
            }
            if universe.is_some() {
                cfg.universe.file = universe;
            }
            cfg.validate()?;

            let end = match end.as_deref() {
                Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .with_context(|| format!("invalid --end date '{s}'"))?,
                None => chrono::Local::now().date_naive(),
            };
            run_analyze(&cfg, symbols, end, synthetic, !sequential, output_dir.as_deref())?
        }
        Commands::Scan {
            csv,
            symbol,
            config,
            params,
            output_dir,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            params.apply(&mut cfg);
            cfg.analysis.validate()?;
            run_scan(&cfg, &csv, symbol, output_dir.as_deref())?
        }
        Commands::Universe { file } => {
            let universe = match file {
                Some(path) => Universe::from_file(&path)?,
                None => Universe::default_etfs(),
            };
            print!("{}", universe.to_toml()?);
            return Ok(());
        }
    };

    if verdict == BatchVerdict::Failed {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::from_file(p)
            .with_context(|| format!("failed to load config {}", p.display())),
        None => Ok(AnalysisConfig::default()),
    }
}

fn run_analyze(
    cfg: &AnalysisConfig,
    symbols: Vec<String>,
    end: NaiveDate,
    synthetic: bool,
    parallel: bool,
    output_dir: Option<&Path>,
) -> Result<BatchVerdict> {
    let provider: Box<dyn DataProvider> = if synthetic {
        tracing::warn!("using synthetic data; results do not describe real instruments");
        Box::new(SyntheticProvider::default())
    } else {
        let circuit_breaker = Arc::new(CircuitBreaker::default_provider());
        Box::new(YahooProvider::new(circuit_breaker)?)
    };

    let candidates: Vec<String> = if symbols.is_empty() {
        let universe = cfg.load_universe()?;
        universe.all_tickers().into_iter().map(String::from).collect()
    } else {
        symbols
    };
    let candidate_refs: Vec<&str> = candidates.iter().map(|s| s.as_str()).collect();

    println!(
        "Ranking {} candidates by size with {}...",
        candidate_refs.len(),
        provider.name()
    );
    let selected =
        select_top_instruments(provider.as_ref(), &candidate_refs, cfg.universe.top_n);
    if selected.is_empty() {
        eprintln!("No candidate reported a usable size metric.");
    }

    let (start, end) = cfg.history_range(end);
    let progress = LogProgress;
    let runner = BatchRunner::new(provider.as_ref(), cfg.analysis)?
        .with_parallelism(parallel)
        .with_progress(&progress);
    let report = runner.run(&selected, start, end);

    present(&report, Some(cfg.universe.top_n), output_dir)
}

fn run_scan(
    cfg: &AnalysisConfig,
    csv: &Path,
    symbol: Option<String>,
    output_dir: Option<&Path>,
) -> Result<BatchVerdict> {
    let symbol = match symbol {
        Some(s) => s,
        None => match csv.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => stem.to_uppercase(),
            None => bail!("cannot derive a symbol from {}; pass --symbol", csv.display()),
        },
    };

    let outcome = match load_series_csv(csv, &symbol) {
        Ok(series) if series.is_empty() => FetchOutcome::Empty,
        Ok(series) => FetchOutcome::Series(series),
        Err(e) => FetchOutcome::Failed(e),
    };
    let result = analyze_outcome(&symbol, None, outcome, &cfg.analysis);
    let report = BatchReport::new(cfg.analysis, vec![result]);

    present(&report, None, output_dir)
}

/// Print the table and report, export when asked, and return the verdict.
fn present(
    report: &BatchReport,
    top_n: Option<usize>,
    output_dir: Option<&Path>,
) -> Result<BatchVerdict> {
    let records = recovery_records(report);
    let generated_at = chrono::Local::now().naive_local();

    print_table(&records);
    let text = render_report(report, &records, top_n, generated_at);
    println!();
    print!("{text}");

    if let Some(dir) = output_dir {
        let run_dir = save_artifacts(report, &records, &text, dir, generated_at)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    let verdict = report.verdict();
    if verdict == BatchVerdict::Failed {
        eprintln!(
            "Batch failed: none of {} instruments could be analyzed.",
            report.instruments.len()
        );
    }
    Ok(verdict)
}

fn print_table(records: &[RecoveryRecord]) {
    if records.is_empty() {
        return;
    }
    println!(
        "{:<8} {:>12} {:>12} {:>12} {:>9} {:>10} {:>6} {:>7}",
        "Symbol", "Start", "Bottom", "Recovery", "Drop %", "Recov %", "Days", "Trading"
    );
    println!("{}", "-".repeat(83));
    for r in records {
        println!(
            "{:<8} {:>12} {:>12} {:>12} {:>9.2} {:>10.2} {:>6} {:>7}",
            r.symbol,
            r.drawdown_start_date.to_string(),
            r.drop_date.to_string(),
            r.recovery_date.to_string(),
            r.original_drop_percentage,
            r.recovery_percentage,
            r.days_to_recover,
            r.trading_days_to_recover
        );
    }
}
