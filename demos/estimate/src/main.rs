//! `estimate` — market share of every configured competitor dataset.
//!
//! Loads the YAML run configuration, the road network and the customer
//! dataset, estimates each competitor dataset in parallel (served from the
//! cache directory when possible) and prints a per-dataset summary.
//!
//! Run with:
//!   RUST_LOG=info cargo run -p estimate --release -- demos/estimate/data/init.yaml
//!
//! Options:
//!   --no-cache       recompute every dataset and refresh the cache
//!   --export <dir>   also write `<dir>/<key>.csv` for each dataset

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};

use gc_core::AggregateRecord;
use gc_estimate::{EstimateConfig, Estimator, load_demand};

// ── Command line ──────────────────────────────────────────────────────────────

struct Args {
    config:    PathBuf,
    use_cache: bool,
    export:    Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config: PathBuf::from("init.yaml"), use_cache: true, export: None };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--no-cache" => args.use_cache = false,
            "--export" => {
                let dir = it.next().context("--export needs a directory")?;
                args.export = Some(PathBuf::from(dir));
            }
            flag if flag.starts_with("--") => bail!("unknown option {flag}"),
            path => args.config = PathBuf::from(path),
        }
    }
    Ok(args)
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = parse_args()?;

    let cfg = EstimateConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    println!("=== geocompetition: {} ===", if cfg.area.is_empty() { "(unnamed area)" } else { cfg.area.as_str() });

    let t0 = Instant::now();
    let network = gc_io::load_network_csv(&cfg.network.nodes, &cfg.network.edges)
        .context("loading road network")?;
    let demand = load_demand(&cfg)?;
    println!(
        "Network: {} nodes, {} edges | customers: {} points | loaded in {:.2?}",
        network.node_count(),
        network.edge_count(),
        demand.len(),
        t0.elapsed()
    );

    let estimator = Estimator::from_config(&network, &cfg)?;
    log::info!(
        "cache {} ({})",
        estimator.cache().dir().display(),
        if args.use_cache { "enabled" } else { "refresh only" }
    );
    let t1 = Instant::now();
    let outcomes = estimator.estimate_all(&cfg.competitors, &demand, args.use_cache);
    println!("Estimated {} datasets in {:.2?}\n", outcomes.len(), t1.elapsed());

    if let Some(dir) = &args.export {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    println!("{:<16} {:>8} {:>10} {:>10}  source", "dataset", "records", "max p", "sum p");
    let mut failed = 0;
    for outcome in &outcomes {
        let estimate = match &outcome.result {
            Ok(estimate) => estimate,
            Err(e) => {
                failed += 1;
                println!("{:<16} failed: {e}", outcome.key);
                continue;
            }
        };

        let (max, sum) = summary(&estimate.records);
        let source = match &estimate.stats {
            None => "cache".to_owned(),
            Some(s) => format!(
                "{} groups, {} competitors, {} unreachable pairs",
                s.demand_groups, s.competitors, s.unreachable_pairs
            ),
        };
        println!("{:<16} {:>8} {:>10.4} {:>10.4}  {source}", outcome.key, estimate.records.len(), max, sum);

        if let Some(dir) = &args.export {
            let path = dir.join(format!("{}.csv", outcome.key));
            gc_io::write_records_csv(&path, &estimate.records)
                .with_context(|| format!("writing {}", path.display()))?;
        }
    }

    if failed > 0 {
        bail!("{failed} of {} datasets failed", outcomes.len());
    }
    Ok(())
}

fn summary(records: &[AggregateRecord]) -> (f64, f64) {
    records
        .iter()
        .fold((0.0_f64, 0.0), |(max, sum), r| (max.max(r.probability), sum + r.probability))
}
