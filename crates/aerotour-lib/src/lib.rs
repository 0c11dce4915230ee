//! Aerotour library entry points.
//!
//! This crate plans near-optimal tours for a light aircraft under the
//! coupled constraints of a long-distance aerodrome challenge: a closed
//! time budget, a minimum number of distinct aerodromes, mandatory
//! geographic regions, fuel management and night-VFR restrictions.
//! Higher-level consumers (the CLI in particular) should only depend on
//! the functions exported here.
//!
//! # Quick Start
//!
//! 1. **Build the catalogue** as a `Vec<Station>` (the CLI loads it from
//!    CSV; any collaborator producing stations works).
//! 2. **Describe the problem** with an [`Instance`]: aircraft profile,
//!    day window, departure and optional target, and the [`Rules`] of
//!    the challenge.
//! 3. **Run the solver** with [`solve`] or [`solve_with_progress`].
//! 4. **Check the outcome**: an empty path means no feasible tour was
//!    found within the budget, which is a normal result, not an error.
//!
//! # Example
//!
//! ```no_run
//! use aerotour_lib::{solve, Instance, SolveOptions, Station};
//!
//! # fn main() -> aerotour_lib::Result<()> {
//! # let stations: Vec<Station> = Vec::new();
//! let mut instance = Instance::new(0);
//! instance.target = Some(1);
//!
//! let report = solve(&stations, &instance, &SolveOptions::default())?;
//! println!(
//!     "{} stations in {:.2} h",
//!     report.path.len(),
//!     report.total_time.unwrap_or(f32::NAN)
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, Error>`](Result). Bad
//! configuration (too many stations, an empty mandatory region, an
//! out-of-range index, a broken day window) surfaces before the search
//! starts; an exhausted or cancelled search is reported through an empty
//! path, not an error.

#![deny(warnings)]

pub mod error;
pub mod geometry;
pub mod instance;
pub mod natural;
pub mod region;
pub mod solver;
pub mod station;
pub mod validate;

pub use error::{Error, Result};
pub use geometry::{Location, EARTH_RADIUS_NM};
pub use instance::{Instance, Rules, MAX_MIN_STATIONS};
pub use region::{challenge_regions, RegionMap, RegionSet, RegionSpec, MAX_REGIONS};
pub use solver::{solve, solve_with_progress, SolveOptions, SolveReport};
pub use station::{Station, StationId, MAX_STATIONS};
pub use validate::{
    is_path_valid, satisfies_duration, satisfies_endpoints, satisfies_fuel, satisfies_regions,
    satisfies_station_count,
};
