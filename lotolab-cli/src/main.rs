//! LotoLab CLI — backtest, predict, and inspect commands.
//!
//! Commands:
//! - `backtest` — replay the archive with adaptive weights, save result JSON
//! - `predict` — one forward prediction from the full archive
//! - `inspect` — per-indicator breakdown of the current ranking

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lotolab_core::candidates::{all_strategies, dedup_candidates};
use lotolab_core::domain::{DrawRecord, WeightVector};
use lotolab_core::indicators::indicator_names;
use lotolab_core::rng::RngHierarchy;
use lotolab_core::scoring::score;
use lotolab_core::simulate::refine;
use lotolab_core::synthetic::consecutive_history;
use lotolab_runner::{run_backtest, select_seed, BacktestOutcome, EngineConfig};

#[derive(Parser)]
#[command(
    name = "lotolab",
    about = "LotoLab CLI — adaptive lottery backtesting engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the draw archive with adaptive ensemble weights.
    Backtest {
        /// CSV archive: period,date,n1,n2,n3,n4,n5,n6.
        #[arg(long)]
        draws: Option<PathBuf>,

        /// Path to a TOML engine config. Defaults apply without it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Generate a synthetic archive of this many draws instead of
        /// reading one. Mutually exclusive with --draws.
        #[arg(long)]
        synthetic: Option<usize>,

        /// Output directory for result JSON.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Suppress per-stage progress lines.
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Produce one forward prediction from the full archive.
    Predict {
        /// CSV archive: period,date,n1,n2,n3,n4,n5,n6.
        #[arg(long, required = true)]
        draws: PathBuf,

        /// Path to a TOML engine config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Survivor candidates to print.
        #[arg(long, default_value_t = 3)]
        count: usize,
    },
    /// Show the per-indicator breakdown behind the current ranking.
    Inspect {
        /// CSV archive: period,date,n1,n2,n3,n4,n5,n6.
        #[arg(long, required = true)]
        draws: PathBuf,

        /// Numbers to show, best first.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Backtest {
            draws,
            config,
            synthetic,
            output_dir,
            quiet,
        } => run_backtest_cmd(draws, config, synthetic, output_dir, quiet),
        Commands::Predict {
            draws,
            config,
            count,
        } => run_predict(&draws, config, count),
        Commands::Inspect { draws, top } => run_inspect(&draws, top),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(p) => EngineConfig::from_toml_file(&p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(EngineConfig::default()),
    }
}

/// Read the archive CSV and order it most-recent-first.
///
/// Expected header: `period,date,n1,n2,n3,n4,n5,n6`. Rows may arrive in any
/// order; duplicated period identifiers are rejected.
fn load_draws(path: &Path) -> Result<Vec<DrawRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut draws = Vec::new();
    for (i, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("reading row {}", i + 2))?;
        if row.len() != 8 {
            bail!("row {}: expected 8 columns, got {}", i + 2, row.len());
        }
        let period = row[0].trim().to_string();
        let date = NaiveDate::parse_from_str(row[1].trim(), "%Y-%m-%d")
            .with_context(|| format!("row {}: bad date '{}'", i + 2, &row[1]))?;
        let mut numbers = [0u8; 6];
        for (j, slot) in numbers.iter_mut().enumerate() {
            *slot = row[j + 2]
                .trim()
                .parse()
                .with_context(|| format!("row {}: bad number '{}'", i + 2, &row[j + 2]))?;
        }
        let draw = DrawRecord::new(&period, date, numbers)
            .with_context(|| format!("row {}: invalid draw", i + 2))?;
        draws.push(draw);
    }
    if draws.is_empty() {
        bail!("archive {} holds no draws", path.display());
    }

    let mut seen = std::collections::BTreeSet::new();
    for d in &draws {
        if !seen.insert(d.period.clone()) {
            bail!("duplicate period {}", d.period);
        }
    }

    // Most recent first, matching the engine's convention.
    let mut keyed: Vec<(u32, u32, DrawRecord)> = draws
        .into_iter()
        .map(|d| {
            let key = d.key().with_context(|| format!("period {}", d.period))?;
            Ok((key.year, key.seq, d))
        })
        .collect::<Result<_>>()?;
    keyed.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    Ok(keyed.into_iter().map(|(_, _, d)| d).collect())
}

fn run_backtest_cmd(
    draws: Option<PathBuf>,
    config: Option<PathBuf>,
    synthetic: Option<usize>,
    output_dir: PathBuf,
    quiet: bool,
) -> Result<()> {
    if draws.is_some() && synthetic.is_some() {
        bail!("--draws and --synthetic are mutually exclusive");
    }
    let history = match (&draws, synthetic) {
        (Some(path), None) => load_draws(path)?,
        (None, Some(n)) => consecutive_history(n),
        (None, None) => bail!("one of --draws or --synthetic is required"),
        _ => unreachable!(),
    };

    let cfg = load_config(config)?;

    let mut last_stage = String::new();
    let mut progress = |fraction: f64, stage: &str| {
        if stage != last_stage {
            println!("[{stage}]");
            last_stage = stage.to_string();
        }
        if fraction >= 1.0 {
            println!("[{stage}] done");
        }
    };
    let progress_ref: Option<&mut dyn FnMut(f64, &str)> =
        if quiet { None } else { Some(&mut progress) };

    let outcome = run_backtest(&history, &cfg, progress_ref)?;

    print_summary(&outcome, synthetic.is_some());

    let path = save_outcome(&outcome, &output_dir)?;
    println!("Result saved to: {}", path.display());
    Ok(())
}

fn save_outcome(outcome: &BacktestOutcome, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;
    let short = &outcome.fingerprint[..12.min(outcome.fingerprint.len())];
    let path = output_dir.join(format!("backtest-{short}.json"));
    let json = serde_json::to_string_pretty(outcome)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

fn run_predict(draws: &Path, config: Option<PathBuf>, count: usize) -> Result<()> {
    let history = load_draws(draws)?;
    let cfg = load_config(config)?;
    cfg.validate()?;

    let hierarchy = RngHierarchy::new(cfg.master_seed);
    let fingerprint = cfg.fingerprint(&history);

    let seeds = select_seed(&history, &cfg, &hierarchy, &fingerprint);
    let weights = &seeds[0].weights;

    let window_end = cfg.lookback_periods.min(history.len());
    let window = &history[..window_end];
    let ranking = score(window, weights, &Default::default(), &cfg.scoring)?;

    let raw: Vec<_> = all_strategies()
        .iter()
        .map(|s| s.select(&ranking, window))
        .filter(|c| !c.is_short())
        .collect();
    let candidates = dedup_candidates(raw);
    let mut rng = hierarchy.rng_for(&fingerprint, "live", 0);
    let scored = refine(&candidates, &ranking, &BTreeMap::new(), &cfg.simulation, &mut rng);

    println!();
    println!("=== Prediction ===");
    println!("Archive:     {} draws, newest {}", history.len(), history[0].period);
    println!("Seed weights: {}", seeds[0].name);
    println!();
    for (i, sc) in scored.iter().take(count.max(1)).enumerate() {
        let nums: Vec<String> = sc.candidate.numbers.iter().map(|n| n.to_string()).collect();
        println!(
            "{:>2}. [{}]  strategy {:<14} sim avg hits {:.3}",
            i + 1,
            nums.join(", "),
            sc.candidate.strategy,
            sc.sim_avg_hits
        );
    }
    Ok(())
}

fn run_inspect(draws: &Path, top: usize) -> Result<()> {
    let history = load_draws(draws)?;
    let cfg = EngineConfig::default();
    let weights = WeightVector::uniform(indicator_names());

    let window_end = cfg.lookback_periods.min(history.len());
    let ranking = score(
        &history[..window_end],
        &weights,
        &Default::default(),
        &cfg.scoring,
    )?;

    let diag = &ranking.diagnostics;
    println!("Window: {} draws, newest {}", diag.window_len, history[0].period);
    if !diag.silent_indicators.is_empty() {
        println!("Silent indicators: {}", diag.silent_indicators.join(", "));
    }
    println!();
    println!("{:>4} {:>6} {:>10}  {}", "Rank", "Number", "Composite", "Top indicators");
    println!("{}", "-".repeat(64));
    for (i, r) in ranking.ranked.iter().take(top.max(1)).enumerate() {
        let mut contribs: Vec<(&String, f64)> =
            r.normalized.iter().map(|(k, v)| (k, *v)).collect();
        contribs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        let leading: Vec<String> = contribs
            .iter()
            .take(3)
            .map(|(name, v)| format!("{name}={v:.1}"))
            .collect();
        println!(
            "{:>4} {:>6} {:>10.3}  {}",
            i + 1,
            r.number,
            r.composite,
            leading.join("  ")
        );
    }
    Ok(())
}

fn print_summary(outcome: &BacktestOutcome, synthetic: bool) {
    let stats = &outcome.run.statistics;
    println!();
    println!("=== Backtest Result ===");
    println!("Steps:          {}", stats.steps);
    println!("Skipped gaps:   {}", outcome.run.skipped_non_consecutive);
    println!("Attempts:       {}", outcome.attempts);
    println!("Seed profile:   {}", outcome.seed_name);
    println!("Fingerprint:    {}", &outcome.fingerprint[..12.min(outcome.fingerprint.len())]);
    println!();
    println!("--- Performance ---");
    println!("Total hits:     {}", stats.total_hits);
    println!("Avg hits:       {:.3}", stats.avg_hits);
    println!("Avg accuracy:   {:.1}%", stats.avg_accuracy * 100.0);
    println!(
        "Hit histogram:  {}",
        stats
            .hit_histogram
            .iter()
            .enumerate()
            .map(|(k, c)| format!("{k}:{c}"))
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("Meets target:   {}", if stats.meets_target { "yes" } else { "no" });
    println!();
    println!("--- Prediction ---");
    let nums: Vec<String> = outcome
        .prediction
        .numbers
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!("Numbers:        [{}]", nums.join(", "));
    println!("Strategy:       {}", outcome.prediction.strategy);
    println!("Sim avg hits:   {:.3}", outcome.prediction.sim_avg_hits);
    if synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}
