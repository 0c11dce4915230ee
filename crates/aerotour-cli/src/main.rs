use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use aerotour_lib::{
    natural, solve_with_progress, Instance, SolveOptions, SolveReport, Station, StationId,
};

mod catalog;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Aerodrome tour planning utilities",
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
struct Cli {
    /// Select the output format for CLI responses.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute a tour satisfying the challenge rules.
    Solve(SolveArgs),
    /// Summarise the aerodrome catalogue.
    Stations(StationsArgs),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    /// The label-setting solver (best results).
    Label,
    /// The greedy heuristic alone (fast, rough).
    Natural,
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Path to the catalogue (semicolon-separated CSV).
    #[arg(long)]
    catalog: PathBuf,

    /// Name of the departure aerodrome.
    #[arg(long)]
    departure: String,

    /// Name of the aerodrome the tour must end at.
    #[arg(long)]
    target: Option<String>,

    #[arg(long, value_enum, default_value_t = Algorithm::Label)]
    algorithm: Algorithm,

    /// Cruise speed in knots.
    #[arg(long, default_value_t = 119.87)]
    speed: f64,

    /// Fuel tank capacity (litres).
    #[arg(long, default_value_t = 190.0)]
    fuel_capacity: f64,

    /// Fuel burn in litres per hour.
    #[arg(long, default_value_t = 38.0)]
    fuel_burn: f64,

    /// Ground time of a refuel stop, in hours.
    #[arg(long, default_value_t = 0.0)]
    refuel_time: f32,

    /// Sunrise on the 24-hour clock.
    #[arg(long, default_value_t = 8.0)]
    day_start: f32,

    /// Sunset on the 24-hour clock.
    #[arg(long, default_value_t = 20.0)]
    night_start: f32,

    /// Take-off time on the 24-hour clock.
    #[arg(long, default_value_t = 8.0)]
    departure_time: f32,

    /// Minimum number of distinct aerodromes in the tour.
    #[arg(long, default_value_t = 100)]
    min_stations: u8,

    /// Seed of the score jitter, for reproducible runs.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Search budget in seconds; unlimited when omitted.
    #[arg(long)]
    budget: Option<f64>,

    /// Skip the greedy warm start of the upper bound.
    #[arg(long, action = ArgAction::SetTrue)]
    no_seed_heuristic: bool,
}

#[derive(Args, Debug)]
struct StationsArgs {
    /// Path to the catalogue (semicolon-separated CSV).
    #[arg(long)]
    catalog: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Solve(args) => run_solve(cli.format, &args),
        Command::Stations(args) => run_stations(cli.format, &args),
    }
}

fn resolve_station(stations: &[Station], name: &str) -> Result<StationId> {
    stations
        .iter()
        .position(|station| station.name.eq_ignore_ascii_case(name))
        .map(|index| index as StationId)
        .ok_or_else(|| anyhow!("no aerodrome named '{name}' in the catalogue"))
}

fn build_instance(stations: &[Station], args: &SolveArgs) -> Result<Instance> {
    let mut instance = Instance::new(resolve_station(stations, &args.departure)?);
    if let Some(target) = &args.target {
        instance.target = Some(resolve_station(stations, target)?);
    }
    instance.cruise_speed = args.speed;
    instance.fuel_capacity = args.fuel_capacity;
    instance.fuel_burn_rate = args.fuel_burn;
    instance.refuel_time = args.refuel_time;
    instance.day_start = args.day_start;
    instance.night_start = args.night_start;
    instance.departure_time = args.departure_time;
    instance.rules.min_stations = args.min_stations;
    Ok(instance)
}

fn run_solve(format: OutputFormat, args: &SolveArgs) -> Result<()> {
    let stations = catalog::load_catalog(&args.catalog)?;
    let instance = build_instance(&stations, args)?;

    let report = match args.algorithm {
        Algorithm::Label => {
            let options = SolveOptions {
                seed: args.seed,
                use_natural_seed: !args.no_seed_heuristic,
                time_budget: args.budget.map(Duration::from_secs_f64),
                ..SolveOptions::default()
            };
            solve_with_progress(&stations, &instance, &options, |total, elapsed| {
                tracing::info!(
                    total_hours = total,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "improved tour"
                );
            })
            .context("solver failed")?
        }
        Algorithm::Natural => {
            let started = std::time::Instant::now();
            let path = natural::solve(&stations, &instance).context("greedy heuristic failed")?;
            let total_time = tour_time(&stations, &instance, &path);
            SolveReport {
                path,
                total_time: Some(total_time),
                seeded: false,
                iterations: 0,
                elapsed: started.elapsed(),
            }
        }
    };

    render_report(format, &stations, &instance, &report);
    Ok(())
}

fn tour_time(stations: &[Station], instance: &Instance, path: &[StationId]) -> f32 {
    path.windows(2)
        .map(|pair| {
            instance.time_distance(
                &stations[pair[0] as usize].location,
                &stations[pair[1] as usize].location,
            )
        })
        .sum()
}

#[derive(Serialize)]
struct LegView {
    index: usize,
    name: String,
    bearing_deg: Option<f64>,
    leg_nm: Option<f64>,
    cumulative_nm: f64,
}

#[derive(Serialize)]
struct SolveView {
    found: bool,
    stations: Vec<LegView>,
    total_time_hours: Option<f32>,
    total_distance_nm: Option<f64>,
    seeded: bool,
    iterations: u64,
    elapsed_ms: u64,
}

fn solve_view(stations: &[Station], report: &SolveReport) -> SolveView {
    let mut legs = Vec::with_capacity(report.path.len());
    let mut cumulative = 0.0;
    for (index, pair) in report.path.iter().enumerate() {
        let station = &stations[*pair as usize];
        let (bearing, leg) = if index > 0 {
            let previous = &stations[report.path[index - 1] as usize];
            (
                Some(previous.location.bearing_to(&station.location)),
                Some(previous.location.distance_nm(&station.location)),
            )
        } else {
            (None, None)
        };
        cumulative += leg.unwrap_or(0.0);
        legs.push(LegView {
            index: index + 1,
            name: station.name.clone(),
            bearing_deg: bearing,
            leg_nm: leg,
            cumulative_nm: cumulative,
        });
    }
    SolveView {
        found: !report.path.is_empty(),
        total_distance_nm: (!report.path.is_empty()).then_some(cumulative),
        stations: legs,
        total_time_hours: report.total_time,
        seeded: report.seeded,
        iterations: report.iterations,
        elapsed_ms: report.elapsed.as_millis() as u64,
    }
}

fn render_report(
    format: OutputFormat,
    stations: &[Station],
    instance: &Instance,
    report: &SolveReport,
) {
    let view = solve_view(stations, report);
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&view).expect("view serialises")
            );
        }
        OutputFormat::Text => {
            if !view.found {
                println!(
                    "no feasible tour found ({} labels explored in {} ms)",
                    view.iterations, view.elapsed_ms
                );
                return;
            }
            println!("{:>4}  {:<28} {:>7}  {:>9}  {:>10}", "#", "aerodrome", "brg", "leg nm", "total nm");
            for leg in &view.stations {
                match (leg.bearing_deg, leg.leg_nm) {
                    (Some(bearing), Some(distance)) => println!(
                        "{:>4}  {:<28} {:>6.0}°  {:>9.1}  {:>10.1}",
                        leg.index, leg.name, bearing, distance, leg.cumulative_nm
                    ),
                    _ => println!("{:>4}  {:<28} {:>7}  {:>9}  {:>10}", leg.index, leg.name, "-", "-", "-"),
                }
            }
            println!(
                "{} aerodromes, {:.1} nm, {:.2} h at {:.0} kn{} ({} labels, {} ms)",
                view.stations.len(),
                view.total_distance_nm.unwrap_or(0.0),
                view.total_time_hours.unwrap_or(0.0),
                instance.cruise_speed,
                if view.seeded { ", seeded" } else { "" },
                view.iterations,
                view.elapsed_ms
            );
        }
    }
}

fn run_stations(format: OutputFormat, args: &StationsArgs) -> Result<()> {
    let stations = catalog::load_catalog(&args.catalog)?;
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&stations).expect("stations serialise")
            );
        }
        OutputFormat::Text => {
            let fuel = stations.iter().filter(|s| s.fuel_capable).count();
            let night = stations.iter().filter(|s| s.night_accessible).count();
            for station in &stations {
                println!(
                    "{:<28} {:>8.3} {:>8.3}  fuel:{}  night:{}",
                    station.name,
                    station.location.lon,
                    station.location.lat,
                    if station.fuel_capable { "yes" } else { "no " },
                    if station.night_accessible { "yes" } else { "no " },
                );
            }
            println!(
                "{} aerodromes ({} with fuel, {} night-accessible)",
                stations.len(),
                fuel,
                night
            );
        }
    }
    Ok(())
}
