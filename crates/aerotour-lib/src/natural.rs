//! Greedy seed solver, the "natural" strategy.
//!
//! Flies the tour the way a pilot would sketch it: head for each
//! mandatory region in nearest-first order, then for the target. At
//! every step the plane aims at an interpolated "ideal next position"
//! along the line to the current regional objective and lands at the
//! nearest admissible aerodrome. A region objective is considered
//! reached once the plane is provably inside the region (within a
//! radius around the region's centroid that no outside station
//! penetrates).
//!
//! The result is rarely great and sometimes the greedy dead-ends, in
//! which case it fails hard; the label-setting solver only uses it to
//! warm-start its upper bound.

use crate::error::{Error, Result};
use crate::geometry::Location;
use crate::instance::Instance;
use crate::region::RegionMap;
use crate::station::{Station, StationId};

/// Shrink factor applied to region capture radii; half the provable
/// radius keeps the plane well inside the region before moving on.
const REGION_CAPTURE_THRESHOLD: f64 = 0.5;

struct PathTarget {
    location: Location,
    radius: f64,
    expected_steps_to_reach: usize,
}

/// Compute a feasible-looking tour greedily. Fails with
/// [`Error::SeedStuck`] when no admissible station is left at some step;
/// callers fall back to running the main solver without a seed.
pub fn solve(stations: &[Station], instance: &Instance) -> Result<Vec<StationId>> {
    instance.validate(stations.len())?;
    let regions = RegionMap::build(stations, &instance.rules.regions)?;
    let min_stations = usize::from(instance.rules.min_stations);
    let departure = instance.departure;

    // nearest fuel-capable station per station, for the stranding check
    let mut nearest_refuel = vec![f32::MAX; stations.len()];
    for (from, station) in stations.iter().enumerate() {
        for (to, other) in stations.iter().enumerate() {
            if from != to && other.fuel_capable {
                let distance = instance.time_distance(&station.location, &other.location);
                if distance < nearest_refuel[from] {
                    nearest_refuel[from] = distance;
                }
            }
        }
    }

    let mut targets = generate_targets(stations, instance, &regions);

    let mut path = vec![departure];
    let mut visited = vec![false; stations.len()];
    visited[departure as usize] = true;
    let mut current = stations[departure as usize].location;
    let mut fuel = instance.plane_fuel_time();

    let interior_steps = min_stations - 1 - usize::from(instance.target.is_some());
    for step in 0..interior_steps {
        let ideal = match targets.first() {
            Some(target) => {
                let fraction =
                    1.0 / target.expected_steps_to_reach.saturating_sub(step).max(1) as f64;
                current.lerp(&target.location, fraction)
            }
            None => current,
        };

        let mut nearest: Option<(f64, StationId)> = None;
        for (index, station) in stations.iter().enumerate() {
            let index = index as StationId;
            if visited[index as usize] || Some(index) == instance.target {
                continue;
            }
            let hop = instance.time_distance(&current, &station.location);
            if hop > fuel {
                continue;
            }
            if !station.fuel_capable && fuel - hop < nearest_refuel[index as usize] {
                continue;
            }
            let pull = ideal.distance_nm(&station.location);
            if nearest.map_or(true, |(best, _)| pull < best) {
                nearest = Some((pull, index));
            }
        }
        let Some((_, next)) = nearest else {
            return Err(Error::SeedStuck { step });
        };

        let hop = instance.time_distance(&current, &stations[next as usize].location);
        fuel = if stations[next as usize].fuel_capable {
            instance.plane_fuel_time()
        } else {
            fuel - hop
        };
        visited[next as usize] = true;
        current = stations[next as usize].location;
        path.push(next);

        if let Some(target) = targets.first() {
            if target.location.distance_nm(&current) < target.radius {
                targets.remove(0);
            }
        }
    }

    if let Some(target) = instance.target {
        let hop = instance.time_distance(&current, &stations[target as usize].location);
        if hop > fuel {
            return Err(Error::SeedStuck {
                step: interior_steps,
            });
        }
        path.push(target);
    }

    Ok(path)
}

/// One objective per region, ordered nearest-next from the departure,
/// followed by the target station when there is one.
fn generate_targets(
    stations: &[Station],
    instance: &Instance,
    regions: &RegionMap,
) -> Vec<PathTarget> {
    let mut order: Vec<usize> = (0..regions.region_count()).collect();
    let mut current = stations[instance.departure as usize].location;
    for i in 0..order.len() {
        for j in (i + 1)..order.len() {
            if current.distance_nm(&regions.centroid(order[j]))
                < current.distance_nm(&regions.centroid(order[i]))
            {
                order.swap(i, j);
            }
        }
        current = regions.centroid(order[i]);
    }

    let mut targets = Vec::with_capacity(order.len() + 1);
    for &region in &order {
        let centroid = regions.centroid(region);
        // any point closer to the centroid than every outside station is
        // provably inside the region
        let mut min_outside = f64::MAX;
        for (index, station) in stations.iter().enumerate() {
            if regions.primary(index as StationId) != crate::region::RegionSet::single(region) {
                min_outside = min_outside.min(centroid.distance_nm(&station.location));
            }
        }
        targets.push(PathTarget {
            location: centroid,
            radius: min_outside * REGION_CAPTURE_THRESHOLD,
            expected_steps_to_reach: 0,
        });
    }
    if let Some(target) = instance.target {
        targets.push(PathTarget {
            location: stations[target as usize].location,
            radius: 0.0,
            expected_steps_to_reach: 0,
        });
    }

    // spread the step budget along the route in proportion to distance
    let mut current = stations[instance.departure as usize].location;
    let mut total = 0.0;
    for target in &targets {
        total += current.distance_nm(&target.location);
        current = target.location;
    }
    let mut current = stations[instance.departure as usize].location;
    let mut accumulated = 0.0;
    for target in &mut targets {
        accumulated += current.distance_nm(&target.location);
        current = target.location;
        target.expected_steps_to_reach = if total > 0.0 {
            (accumulated / total * instance.rules.min_stations as f64).round() as usize
        } else {
            0
        };
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionSpec;

    fn station(lon: f64, lat: f64, fuel: bool) -> Station {
        Station::new(Location::new(lon, lat), format!("S{lon}/{lat}"), fuel, true)
    }

    fn quadrant_regions() -> Vec<RegionSpec> {
        vec![
            RegionSpec {
                name: "ne".into(),
                min_lon: Some(0.0),
                min_lat: Some(0.0),
                ..RegionSpec::default()
            },
            RegionSpec {
                name: "nw".into(),
                max_lon: Some(0.0),
                min_lat: Some(0.0),
                ..RegionSpec::default()
            },
            RegionSpec {
                name: "sw".into(),
                max_lon: Some(0.0),
                max_lat: Some(0.0),
                ..RegionSpec::default()
            },
            RegionSpec {
                name: "se".into(),
                min_lon: Some(0.0),
                max_lat: Some(0.0),
                ..RegionSpec::default()
            },
        ]
    }

    fn ring_map() -> Vec<Station> {
        // three stations in each quadrant, all fuel-capable
        let mut stations = Vec::new();
        for (qx, qy) in [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)] {
            for i in 0..3 {
                stations.push(station(
                    qx * (1.0 + i as f64 * 0.3),
                    qy * (1.0 + i as f64 * 0.2),
                    true,
                ));
            }
        }
        stations
    }

    #[test]
    fn greedy_reaches_the_required_length_and_endpoints() {
        let stations = ring_map();
        let mut instance = Instance::new(0);
        instance.rules.min_stations = 8;
        instance.rules.regions = quadrant_regions();
        instance.target = Some(11);

        let path = solve(&stations, &instance).unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path[0], 0);
        assert_eq!(*path.last().unwrap(), 11);

        let mut seen = std::collections::HashSet::new();
        for &station in &path {
            assert!(seen.insert(station), "station visited twice");
        }
    }

    #[test]
    fn greedy_works_without_a_target() {
        let stations = ring_map();
        let mut instance = Instance::new(0);
        instance.rules.min_stations = 6;
        instance.rules.regions = quadrant_regions();

        let path = solve(&stations, &instance).unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path[0], 0);
    }

    #[test]
    fn greedy_fails_hard_when_fuel_cannot_reach_anything() {
        let stations = vec![station(0.0, 0.0, true), station(40.0, 0.0, true)];
        let mut instance = Instance::new(0);
        instance.rules.min_stations = 2;
        instance.rules.regions = vec![RegionSpec {
            name: "everywhere".into(),
            ..RegionSpec::default()
        }];

        let err = solve(&stations, &instance).unwrap_err();
        assert!(matches!(err, Error::SeedStuck { step: 0 }));
    }
}
