//! `anneal` binary: runs a multi-start simulated annealing session.
//!
//! # Usage
//!
//! ```bash
//! cargo run --features cli --bin anneal -- --runs 6 --seed 2025
//! cargo run --features cli --bin anneal -- --config session.json --out-dir results
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use u_anneal::multi::MultiRunConfig;
use u_anneal::objective::Variant1;
use u_anneal::report::export_all;
use u_anneal::session::{Session, SessionEvent};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "anneal",
    version,
    about = "Multi-start simulated annealing for the log-quartic test function",
    long_about = None
)]
struct Args {
    /// JSON session configuration. Flags below override its fields.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of independent runs.
    #[arg(long)]
    runs: Option<usize>,

    /// Master seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Initial temperature.
    #[arg(long = "t0")]
    initial_temperature: Option<f64>,

    /// Minimum temperature.
    #[arg(long = "tmin")]
    min_temperature: Option<f64>,

    /// Geometric cooling factor in (0, 1).
    #[arg(long)]
    alpha: Option<f64>,

    /// Attempts per temperature level.
    #[arg(long)]
    attempts: Option<usize>,

    /// Standard deviation of the Gaussian step.
    #[arg(long)]
    step_scale: Option<f64>,

    /// Iteration cap per run.
    #[arg(long)]
    max_iter: Option<usize>,

    /// Lower bound for random starting points.
    #[arg(long, allow_hyphen_values = true)]
    low: Option<f64>,

    /// Upper bound for random starting points.
    #[arg(long, allow_hyphen_values = true)]
    high: Option<f64>,

    /// Directory for CSV and PNG output.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Skip writing result files.
    #[arg(long, default_value_t = false)]
    no_export: bool,

    /// Log filter (e.g. `info`, `u_anneal=debug`). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn session_config(&self) -> Result<MultiRunConfig> {
        let mut config = match self.config.as_deref() {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => MultiRunConfig::default(),
        };

        if let Some(v) = self.runs {
            config.runs = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.low {
            config.bounds.0 = v;
        }
        if let Some(v) = self.high {
            config.bounds.1 = v;
        }
        let sa = &mut config.sa;
        if let Some(v) = self.initial_temperature {
            sa.initial_temperature = v;
        }
        if let Some(v) = self.min_temperature {
            sa.min_temperature = v;
        }
        if let Some(v) = self.alpha {
            sa.alpha = v;
        }
        if let Some(v) = self.attempts {
            sa.attempts_per_temperature = v;
        }
        if let Some(v) = self.step_scale {
            sa.step_scale = v;
        }
        if let Some(v) = self.max_iter {
            sa.max_iterations = v;
        }
        Ok(config)
    }
}

/// Filter from `--log-level`, falling back to `info` if it does not parse.
fn flag_filter(level: &str) -> EnvFilter {
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| flag_filter(&args.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = args.session_config()?;
    config.validate().context("invalid parameters")?;

    info!("runs         : {}", config.runs);
    info!("seed         : {}", config.seed);
    info!("T0 / Tmin    : {} / {}", config.sa.initial_temperature, config.sa.min_temperature);
    info!("alpha        : {}", config.sa.alpha);
    info!("attempts / T : {}", config.sa.attempts_per_temperature);
    info!("step scale   : {}", config.sa.step_scale);
    info!("max iter     : {}", config.sa.max_iterations);

    let session = Session::spawn(Variant1, config.clone())?;

    let pb = ProgressBar::new(config.total_planned_iterations() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    for event in session.events().iter() {
        match event {
            SessionEvent::Progress { current, total } => {
                pb.set_length(total as u64);
                pb.set_position(current as u64);
            }
            SessionEvent::Log(line) => pb.suspend(|| info!("{line}")),
            SessionEvent::Finished => break,
        }
    }
    pb.finish_and_clear();

    let result = session.join().context("annealing session failed")?;
    if result.cancelled {
        warn!("session cancelled after {} runs", result.runs.len());
    }

    let best = result.best();
    info!("best run     : {}", best.run);
    info!("x1           : {:.9}", best.x[0]);
    info!("x2           : {:.9}", best.x[1]);
    info!("x3           : {:.9}", best.x[2]);
    info!("f            : {:.9}", best.value);

    if args.no_export {
        return Ok(());
    }

    match export_all(&result, &config, &args.out_dir) {
        Ok(paths) => {
            info!("trace   : {}", paths.best_trace.display());
            info!("summary : {}", paths.summary.display());
            info!("params  : {}", paths.params.display());
            if let Some(plot) = paths.plot {
                info!("plot    : {}", plot.display());
            }
        }
        Err(e) => error!("failed to export results: {e}"),
    }

    Ok(())
}
