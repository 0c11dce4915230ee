//! Independent validity checks for solved paths.
//!
//! Each rule of the challenge is checkable on its own; [`is_path_valid`]
//! combines them. Callers that want to explain *why* a path fails can run
//! the individual checks.

use std::collections::HashSet;

use crate::instance::Instance;
use crate::region::RegionMap;
use crate::station::{Station, StationId};

/// The path starts at the departure station and, when one is set, ends at
/// the target station.
pub fn satisfies_endpoints(instance: &Instance, path: &[StationId]) -> bool {
    match (path.first(), path.last()) {
        (Some(&first), Some(&last)) => {
            first == instance.departure && instance.target.map_or(true, |target| last == target)
        }
        _ => false,
    }
}

/// The path touches at least the required number of distinct stations.
pub fn satisfies_station_count(instance: &Instance, path: &[StationId]) -> bool {
    let distinct: HashSet<StationId> = path.iter().copied().collect();
    distinct.len() >= instance.rules.min_stations as usize
}

/// The path touches at least one station in every mandatory region.
pub fn satisfies_regions(regions: &RegionMap, path: &[StationId]) -> bool {
    let mut visited = crate::region::RegionSet::EMPTY;
    for &station in path {
        visited = visited.union(regions.primary(station));
        if visited == regions.full_set() {
            return true;
        }
    }
    visited == regions.full_set()
}

/// The plane never runs out of fuel, assuming it refuels at every
/// fuel-capable station it lands at.
pub fn satisfies_fuel(stations: &[Station], instance: &Instance, path: &[StationId]) -> bool {
    let mut distance_since_refuel = 0.0f64;
    for pair in path.windows(2) {
        let from = &stations[pair[0] as usize];
        let to = &stations[pair[1] as usize];
        distance_since_refuel += from.location.distance_nm(&to.location);
        if to.fuel_capable {
            distance_since_refuel = 0.0;
        } else {
            let remaining = instance.fuel_capacity
                - distance_since_refuel / instance.cruise_speed * instance.fuel_burn_rate;
            if remaining < 0.0 {
                return false;
            }
        }
    }
    true
}

/// The whole flight fits in the allowed duration.
pub fn satisfies_duration(stations: &[Station], instance: &Instance, path: &[StationId]) -> bool {
    let length = crate::geometry::polyline_length_nm(
        path.iter().map(|&id| stations[id as usize].location),
    );
    (length / instance.cruise_speed) < instance.rules.max_duration as f64
}

/// All checks at once. Callers may want to check the duration separately:
/// a slow aircraft simply cannot touch the required number of stations in
/// time, whatever the route.
pub fn is_path_valid(
    stations: &[Station],
    instance: &Instance,
    regions: &RegionMap,
    path: &[StationId],
) -> bool {
    satisfies_endpoints(instance, path)
        && satisfies_station_count(instance, path)
        && satisfies_regions(regions, path)
        && satisfies_fuel(stations, instance, path)
        && satisfies_duration(stations, instance, path)
}
