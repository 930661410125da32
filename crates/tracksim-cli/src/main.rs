//! Vehicle tracking simulator.
//!
//! Replays a polyline route as a simulated vehicle on a fixed tick
//! interval, announcing hazard alerts and turn-by-turn guidance to the
//! terminal. Runs a built-in demo scenario when no files are given.

mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracksim_core::{
    GeoPoint, HazardZone, LaneStatusProvider, NavigationStep, Route, RoutingStepsProvider,
    Session, SimConfig, TickReport,
};

/// Replay a route as a simulated vehicle with alerts and guidance
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Route file: JSON array of {"latitude", "longitude"} points
    #[arg(long)]
    route: Option<PathBuf>,

    /// Hazard zones file: JSON array of {"start_index", "end_index", "message"}
    #[arg(long)]
    hazards: Option<PathBuf>,

    /// Navigation steps file: JSON array of step objects
    #[arg(long)]
    steps: Option<PathBuf>,

    /// Progress advanced per tick, in route units
    #[arg(long, default_value_t = 0.000_03)]
    speed: f64,

    /// Tick interval in milliseconds
    #[arg(long, default_value_t = 33)]
    tick_ms: u64,

    /// Lane status poll interval in milliseconds
    #[arg(long, default_value_t = 1000)]
    lanes_ms: u64,

    /// Report the position to the telemetry sink every N ticks (0 = only
    /// on step advancement)
    #[arg(long, default_value_t = 0)]
    report_every: u32,

    /// Restart from the route start instead of stopping at the end
    #[arg(long)]
    loop_at_end: bool,

    /// Print a status line every N ticks (0 = silent)
    #[arg(long, default_value_t = 30)]
    status_every: u64,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tracksim=info".parse()?)
                .add_directive("tracksim_core=info".parse()?),
        )
        .init();

    let args = Args::parse();

    let points: Vec<GeoPoint> = match &args.route {
        Some(path) => load_json(path)?,
        None => demo::demo_route(),
    };
    let hazard_zones: Vec<HazardZone> = match &args.hazards {
        Some(path) => load_json(path)?,
        None => demo::demo_zones(),
    };
    let steps: Vec<NavigationStep> = match &args.steps {
        Some(path) => load_json(path)?,
        None => demo::demo_steps(),
    };

    let route = Arc::new(Route::build(points)?);
    let config = SimConfig {
        speed: args.speed,
        max_speed: args.speed,
        loop_at_end: args.loop_at_end,
        report_every_ticks: args.report_every,
        hazard_zones,
        ..SimConfig::default()
    };

    println!(
        "Route: {} points, total length {:.6} route units",
        route.len(),
        route.total_length()
    );
    println!(
        "Hazard zones: {}, navigation steps: {}",
        config.hazard_zones.len(),
        steps.len()
    );
    println!();

    let mut session = Session::new(
        route,
        &config,
        Box::new(demo::ConsoleAnnouncer),
        Box::new(demo::LogTelemetrySink),
    );
    let mut steps_provider = demo::StaticStepsProvider::new(steps);
    let mut lanes_provider = demo::StaticLaneStatusProvider::default();

    session.start();

    let mut ticker = time::interval(Duration::from_millis(args.tick_ms.max(1)));
    let mut lane_ticker = time::interval(Duration::from_millis(args.lanes_ms.max(1)));
    let mut tick_count: u64 = 0;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!();
                println!("Interrupted, stopping simulation");
                break;
            }
            _ = lane_ticker.tick() => {
                if let Some(levels) = lanes_provider.poll_lanes() {
                    session.update_lanes(levels);
                }
            }
            _ = ticker.tick() => {
                if let Some(new_steps) = steps_provider.poll_steps() {
                    session.update_steps(new_steps);
                }

                let Some(report) = session.tick(1.0) else {
                    if !session.is_running() {
                        println!("Route complete");
                        break;
                    }
                    continue;
                };

                tick_count += 1;
                if args.status_every > 0 && tick_count % args.status_every == 0 {
                    print_status(&session, &report);
                }
            }
        }
    }

    Ok(())
}

fn print_status(session: &Session, report: &TickReport) {
    let vehicle = &report.vehicle;

    let step_part = match (&report.step, session.active_step()) {
        (Some(status), Some(step)) => format!(
            "  step {} ({}) {}",
            status.step_index,
            status.remaining,
            step.instruction.as_deref().unwrap_or("-"),
        ),
        _ => String::new(),
    };
    let lane_part = if session.lane_levels().is_empty() {
        String::new()
    } else {
        format!("  lanes {:?}", session.lane_levels())
    };

    println!(
        "pos ({:.6}, {:.6})  hdg {:3.0}  seg {:3}{}{}",
        vehicle.position.latitude,
        vehicle.position.longitude,
        vehicle.heading_deg,
        vehicle.segment_index,
        step_part,
        lane_part
    );
}
