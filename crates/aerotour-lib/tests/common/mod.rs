// Shared helpers for integration tests
#![allow(dead_code)]

use aerotour_lib::{Instance, Location, RegionSpec, Station};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn station(lon: f64, lat: f64, fuel: bool, night: bool) -> Station {
    Station::new(Location::new(lon, lat), format!("S{lon}/{lat}"), fuel, night)
}

/// A single region containing every station.
pub fn everywhere() -> Vec<RegionSpec> {
    vec![RegionSpec {
        name: "everywhere".into(),
        ..RegionSpec::default()
    }]
}

/// Four quadrant regions around the origin.
pub fn quadrants() -> Vec<RegionSpec> {
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

/// Make the whole day flyable so tests can ignore the night rule.
pub fn disable_night(instance: &mut Instance) {
    instance.day_start = 0.0;
    instance.night_start = 24.0;
}

/// Pseudo-random scatter of stations around the origin; reproducible for
/// a given seed.
pub fn random_map(seed: u64, count: usize, extent: f64) -> Vec<Station> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let lon = rng.gen_range(-extent..extent);
            let lat = rng.gen_range(-extent..extent);
            let fuel = rng.gen_bool(0.7);
            let night = rng.gen_bool(0.8);
            Station::new(Location::new(lon, lat), format!("R{i}"), fuel, night)
        })
        .collect()
}

/// Total flight time of a path in hours, recomputed from the catalogue.
pub fn path_time(stations: &[Station], instance: &Instance, path: &[u16]) -> f32 {
    path.windows(2)
        .map(|pair| {
            instance.time_distance(
                &stations[pair[0] as usize].location,
                &stations[pair[1] as usize].location,
            )
        })
        .sum()
}
