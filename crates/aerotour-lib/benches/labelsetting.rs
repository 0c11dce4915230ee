use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use aerotour_lib::{solve, Instance, Location, RegionSpec, SolveOptions, Station};

/// Deterministic scatter of stations; a bench must not depend on an RNG
/// crate, a multiplicative hash gives enough spread.
fn synthetic_map(count: usize) -> Vec<Station> {
    (0..count)
        .map(|i| {
            let a = ((i as u64).wrapping_mul(0x9e3779b97f4a7c15) >> 11) as f64;
            let b = ((i as u64).wrapping_mul(0xd1b54a32d192ed03) >> 11) as f64;
            let lon = (a / (1u64 << 53) as f64) * 6.0 - 3.0;
            let lat = (b / (1u64 << 53) as f64) * 6.0 - 3.0;
            Station::new(Location::new(lon, lat), format!("B{i}"), i % 3 != 0, i % 5 != 0)
        })
        .collect()
}

fn quadrants() -> Vec<RegionSpec> {
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

fn benchmark_labelsetting(c: &mut Criterion) {
    let stations = synthetic_map(150);
    let mut instance = Instance::new(0);
    instance.cruise_speed = 120.0;
    instance.fuel_capacity = 400.0;
    instance.fuel_burn_rate = 40.0;
    instance.day_start = 0.0;
    instance.night_start = 24.0;
    instance.rules.min_stations = 30;
    instance.rules.regions = quadrants();

    c.bench_function("labelsetting_150_stations_10k_iterations", |b| {
        let options = SolveOptions {
            max_iterations: Some(10_000),
            ..SolveOptions::default()
        };
        b.iter(|| {
            let report = solve(&stations, &instance, &options).expect("instance is valid");
            black_box(report.iterations)
        });
    });

    c.bench_function("natural_seed_150_stations", |b| {
        b.iter(|| {
            let path = aerotour_lib::natural::solve(&stations, &instance);
            black_box(path.ok().map(|p| p.len()))
        });
    });
}

criterion_group!(benches, benchmark_labelsetting);
criterion_main!(benches);
