//! Label-setting flight-plan solver.
//!
//! This is the core of the library: an anytime heuristic search over
//! dynamic-programming labels. It keeps improving its best tour until the
//! label pool drains, the time budget elapses or the caller raises the
//! stop flag, then returns the best tour found so far (possibly none).
//!
//! The solver is warm-started by the [`crate::natural`] greedy unless
//! disabled: the greedy's tour time becomes the initial upper bound,
//! which lets the search prune from the first iteration.
//!
//! # Example
//!
//! ```no_run
//! use aerotour_lib::{solve, Instance, SolveOptions, Station};
//!
//! # fn main() -> aerotour_lib::Result<()> {
//! # let stations: Vec<Station> = Vec::new();
//! let instance = Instance::new(0);
//! let report = solve(&stations, &instance, &SolveOptions::default())?;
//! if report.path.is_empty() {
//!     println!("no feasible tour found");
//! } else {
//!     println!("tour of {} stations", report.path.len());
//! }
//! # Ok(())
//! # }
//! ```

mod adjacency;
mod arena;
mod bounds;
mod driver;
mod kbest;
mod label;
mod queue;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::Result;
use crate::instance::Instance;
use crate::natural;
use crate::station::{Station, StationId};

use driver::LabelSetting;

/// Knobs of one solver run.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Seed of the score-jitter generator; equal seeds give equal runs.
    pub seed: u64,
    /// Warm-start the upper bound with the greedy seed solver.
    pub use_natural_seed: bool,
    /// Capacity of the best-labels cache. Labels evicted from the cache
    /// stay in memory for domination checks and can be recovered later.
    pub max_live_labels: usize,
    /// Wall-clock budget; checked between iterations.
    pub time_budget: Option<Duration>,
    /// Hard cap on explored labels; mostly useful for tests and benches.
    pub max_iterations: Option<u64>,
    /// Cooperative cancellation flag; checked between iterations.
    pub stop: Option<Arc<AtomicBool>>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            use_natural_seed: true,
            max_live_labels: 10_000,
            time_budget: None,
            max_iterations: None,
            stop: None,
        }
    }
}

/// Result of one solver run.
#[derive(Debug, Clone, Serialize)]
pub struct SolveReport {
    /// The best tour found, in flight order; empty when no feasible tour
    /// was found within the budget.
    pub path: Vec<StationId>,
    /// Total flight time of `path` in hours, when one was found.
    pub total_time: Option<f32>,
    /// Whether the greedy seed provided the initial upper bound.
    pub seeded: bool,
    /// Labels explored.
    pub iterations: u64,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
}

/// Compute the best tour the budget allows. See [`solve_with_progress`]
/// for upper-bound notifications.
pub fn solve(
    stations: &[Station],
    instance: &Instance,
    options: &SolveOptions,
) -> Result<SolveReport> {
    solve_with_progress(stations, instance, options, |_, _| {})
}

/// Like [`solve`], invoking `on_improvement(total_hours, elapsed)` every
/// time the upper bound tightens.
pub fn solve_with_progress(
    stations: &[Station],
    instance: &Instance,
    options: &SolveOptions,
    mut on_improvement: impl FnMut(f32, Duration),
) -> Result<SolveReport> {
    let started = Instant::now();
    let mut driver = LabelSetting::new(stations, instance, options)?;

    let mut seeded = false;
    if options.use_natural_seed {
        match natural::solve(stations, instance) {
            Ok(seed_path) => {
                let bound = seed_bound(stations, instance, &seed_path);
                tracing::debug!(bound, "upper bound from the greedy seed");
                driver.set_initial_bound(bound);
                seeded = true;
            }
            Err(error) => {
                tracing::debug!(%error, "greedy seed failed, searching without an upper bound");
            }
        }
    }

    let iterations = driver.search(options, &mut on_improvement);
    let total_time = driver.best_total_time();
    let path = driver.take_path()?;

    Ok(SolveReport {
        path,
        total_time,
        seeded,
        iterations,
        elapsed: started.elapsed(),
    })
}

/// Completion time of the seed tour as the label solver would fly it:
/// departure offset, every leg at cruise speed, one refuel stop at every
/// fuel-capable station along the way.
fn seed_bound(stations: &[Station], instance: &Instance, path: &[StationId]) -> f32 {
    let mut time = instance.departure_time;
    for pair in path.windows(2) {
        time += instance.time_distance(
            &stations[pair[0] as usize].location,
            &stations[pair[1] as usize].location,
        );
        if stations[pair[1] as usize].fuel_capable {
            time += instance.refuel_time;
        }
    }
    time
}
