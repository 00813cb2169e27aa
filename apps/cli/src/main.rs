#![deny(warnings)]

//! Headless driver for the InvenSync warehouse simulation.
//!
//! Fast-forward mode advances virtual time without sleeping; real-time mode
//! lets a tokio interval feed elapsed wall time into the engine clock.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use invensync_core::{AlertFilter, ForecastUrgency, SimConfig};
use invensync_runtime::{age_label, WarehouseEngine, WarehouseSnapshot};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: invensync [--minutes N | --realtime --seconds N] [--seed N] [--config PATH] [--json]";

#[derive(Debug, Default)]
struct Args {
    minutes: Option<u64>,
    realtime: bool,
    seconds: Option<u64>,
    seed: Option<u64>,
    config: Option<String>,
    json: bool,
}

fn number(flag: &str, value: Option<String>) -> Result<u64> {
    let v = value.with_context(|| format!("{flag} needs a value"))?;
    v.parse()
        .with_context(|| format!("{flag}: not a number: {v}"))
}

fn parse_args(argv: impl IntoIterator<Item = String>) -> Result<Option<Args>> {
    let mut args = Args::default();
    let mut it = argv.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--minutes" => args.minutes = Some(number("--minutes", it.next())?),
            "--seconds" => args.seconds = Some(number("--seconds", it.next())?),
            "--seed" => args.seed = Some(number("--seed", it.next())?),
            "--config" => args.config = it.next(),
            "--realtime" => args.realtime = true,
            "--json" => args.json = true,
            "--version" => {
                println!("invensync {} ({})", env!("CARGO_PKG_VERSION"), env!("GIT_SHA"));
                return Ok(None);
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                return Ok(None);
            }
            other => bail!("unknown argument {other}\n{USAGE}"),
        }
    }
    Ok(Some(args))
}

/// Flags that have no effect in the selected mode.
fn ignored_flags(args: &Args) -> Vec<&'static str> {
    let mut ignored = Vec::new();
    if args.realtime && args.minutes.is_some() {
        ignored.push("--minutes");
    }
    if !args.realtime && args.seconds.is_some() {
        ignored.push("--seconds");
    }
    ignored
}

/// `RUST_LOG` directives, falling back to `info` when unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {path}"))?;
            serde_yaml::from_str::<SimConfig>(&text)
                .with_context(|| format!("parsing config {path}"))?
        }
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.rng_seed = seed;
    }
    Ok(cfg)
}

fn print_kpis(snap: &WarehouseSnapshot, elapsed_ms: u64) {
    let d = &snap.dashboard;
    let online = snap.zones.iter().map(|z| z.online).sum::<usize>();
    let urgent = snap
        .forecasts
        .iter()
        .filter(|f| f.urgency() == ForecastUrgency::Critical)
        .count();
    println!(
        "KPI | t: {}s | stock: {} | critical: {} | low: {} | sensors online: {}/{} | movers: {} | alerts: {} (badge {}) | urgent forecasts: {} | PO pending: {}",
        elapsed_ms / 1_000,
        d.total_stock,
        d.critical_items,
        d.low_items,
        online,
        snap.sensors.len(),
        snap.moving.len(),
        snap.alerts.len(),
        snap.alert_badge,
        urgent,
        snap.replenishment_summary.pending,
    );
}

fn print_report(engine: &WarehouseEngine, json: bool) -> Result<()> {
    let snap = engine.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }
    print_kpis(&snap, engine.elapsed_ms());
    for z in &snap.zones {
        println!(
            "Zone | {} | online: {} | warning: {} | offline: {}",
            z.zone, z.online, z.warning, z.offline
        );
    }
    for line in engine.activity_feed() {
        println!("Activity | {line}");
    }
    for a in engine.list_alerts(AlertFilter::Critical).iter().take(3) {
        println!(
            "Alert | {} | {} | {}",
            a.product,
            a.message,
            age_label(a.timestamp, snap.at)
        );
    }
    Ok(())
}

fn fast_forward(engine: &mut WarehouseEngine, minutes: u64) {
    engine.start();
    let ticks = engine.advance(minutes.saturating_mul(60_000));
    engine.stop();
    info!(minutes, ticks, "fast-forward complete");
}

async fn realtime(engine: &mut WarehouseEngine, seconds: u64) {
    let step = Duration::from_millis(engine.config().cadence.movement_ms);
    let mut ticker = interval(step);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    engine.start();
    let started = Instant::now();
    let deadline = Duration::from_secs(seconds);
    let mut fed = Duration::ZERO;
    let mut last_report = 0;
    while fed < deadline {
        ticker.tick().await;
        let real = started.elapsed().min(deadline);
        let delta = real.saturating_sub(fed);
        fed = real;
        let delta_ms = u64::try_from(delta.as_millis()).unwrap_or(u64::MAX);
        engine.advance(delta_ms);

        let secs = fed.as_secs();
        if secs >= last_report + 5 {
            last_report = secs;
            print_kpis(&engine.snapshot(), engine.elapsed_ms());
        }
    }
    engine.stop();
    info!(seconds, "real-time run complete");
}

#[tokio::main]
async fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let Some(args) = parse_args(std::env::args().skip(1))? else {
        return Ok(());
    };
    let cfg = load_config(&args)?;
    info!(seed = cfg.rng_seed, realtime = args.realtime, "starting simulation");
    for flag in ignored_flags(&args) {
        let mode = if args.realtime { "real-time" } else { "fast-forward" };
        warn!("{flag} is ignored in {mode} mode");
    }

    let mut engine = WarehouseEngine::new(cfg).context("invalid simulation config")?;
    if args.realtime {
        realtime(&mut engine, args.seconds.unwrap_or(30)).await;
    } else {
        fast_forward(&mut engine, args.minutes.unwrap_or(10));
    }

    print_report(&engine, args.json)
}
