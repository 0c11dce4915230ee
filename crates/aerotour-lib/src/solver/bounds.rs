//! Precomputed lower bounds on the time a label still has to fly.
//!
//! Two monotone tables are built once per solve. `by_remaining_regions[k]`
//! is the sum of the k smallest inter-region station-pair time-distances
//! (one minimum per unordered pair of distinct primary regions): a label
//! with k regions still to visit must fly at least that much.
//! `by_remaining_stations[k]` is the sum of the k smallest station-pair
//! time-distances overall: a label with k stations still to visit must
//! fly at least that much. The driver takes the max of the applicable
//! entries and the direct distance to the target; each term is a provable
//! lower bound, so their max is one too.

use crate::instance::Instance;
use crate::region::RegionMap;
use crate::solver::kbest::KSmallest;
use crate::solver::label::Hours;
use crate::station::Station;

/// Dense storage for the strictly-upper-triangular part of a symmetric
/// matrix without its diagonal.
pub(crate) struct TriangularMatrix<T> {
    size: usize,
    data: Vec<T>,
}

impl<T: Clone> TriangularMatrix<T> {
    pub fn new(size: usize, fill: T) -> Self {
        Self {
            size,
            data: vec![fill; size * size.saturating_sub(1) / 2],
        }
    }

    fn index(&self, mut i: usize, mut j: usize) -> usize {
        debug_assert!(i != j && i < self.size && j < self.size);
        if i > j {
            std::mem::swap(&mut i, &mut j);
        }
        self.size * (self.size - 1) / 2 - (self.size - i) * (self.size - i - 1) / 2 + j - i - 1
    }

    pub fn at(&self, i: usize, j: usize) -> &T {
        &self.data[self.index(i, j)]
    }

    pub fn at_mut(&mut self, i: usize, j: usize) -> &mut T {
        let index = self.index(i, j);
        &mut self.data[index]
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

pub(crate) struct LowerBounds {
    by_remaining_regions: Vec<Hours>,
    by_remaining_stations: Vec<Hours>,
}

impl LowerBounds {
    pub fn build(stations: &[Station], instance: &Instance, regions: &RegionMap) -> Self {
        let region_count = regions.region_count();
        let min_stations = instance.rules.min_stations as usize;

        // smallest distance between every pair of distinct primary regions
        let mut region_pairs = TriangularMatrix::new(region_count.max(2), Hours::MAX);
        for i in 0..stations.len() {
            let region_i = regions.primary(i as u16);
            if region_i.is_empty() {
                continue;
            }
            for j in (i + 1)..stations.len() {
                let region_j = regions.primary(j as u16);
                if region_j.is_empty() || region_i == region_j {
                    continue;
                }
                // the partial adjacency cannot be used here, it may not
                // hold the i-j distance
                let distance =
                    instance.time_distance(&stations[i].location, &stations[j].location);
                let index_i = region_i.bits().trailing_zeros() as usize;
                let index_j = region_j.bits().trailing_zeros() as usize;
                if distance < *region_pairs.at(index_i, index_j) {
                    *region_pairs.at_mut(index_i, index_j) = distance;
                }
            }
        }

        let mut smallest_region_links = KSmallest::new(region_count);
        for &distance in region_pairs.values() {
            if distance < Hours::MAX {
                smallest_region_links.insert(distance, ());
            }
        }
        let by_remaining_regions =
            accumulate(smallest_region_links.into_entries(), region_count);

        let mut smallest_station_links = KSmallest::new(min_stations);
        for i in 0..stations.len() {
            for j in (i + 1)..stations.len() {
                let distance =
                    instance.time_distance(&stations[i].location, &stations[j].location);
                smallest_station_links.insert(distance, ());
            }
        }
        let by_remaining_stations =
            accumulate(smallest_station_links.into_entries(), min_stations);

        Self {
            by_remaining_regions,
            by_remaining_stations,
        }
    }

    /// Lower bound on the time left with `remaining` regions to visit.
    pub fn remaining_regions(&self, remaining: usize) -> Hours {
        self.by_remaining_regions[remaining]
    }

    /// Lower bound on the time left with `remaining` stations to visit.
    pub fn remaining_stations(&self, remaining: usize) -> Hours {
        self.by_remaining_stations[remaining]
    }
}

/// Prefix sums of the sorted distances, padded by repeating the last sum
/// when fewer distances exist than table entries. Repeating keeps the
/// table monotone without ever overestimating.
fn accumulate(sorted: Vec<(f32, ())>, entries: usize) -> Vec<Hours> {
    let mut table = Vec::with_capacity(entries + 1);
    let mut sum = 0.0;
    table.push(sum);
    for k in 0..entries {
        if let Some((distance, ())) = sorted.get(k) {
            sum += distance;
        }
        table.push(sum);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Location;
    use crate::region::RegionSpec;

    fn station(lon: f64, lat: f64) -> Station {
        Station::new(Location::new(lon, lat), format!("S{lon}"), true, true)
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

    #[test]
    fn triangular_matrix_addresses_every_unordered_pair() {
        let mut matrix = TriangularMatrix::new(4, 0usize);
        let mut value = 1;
        for i in 0..4 {
            for j in (i + 1)..4 {
                *matrix.at_mut(i, j) = value;
                value += 1;
            }
        }
        assert_eq!(*matrix.at(0, 1), 1);
        assert_eq!(*matrix.at(1, 0), 1);
        assert_eq!(*matrix.at(2, 3), 6);
        assert_eq!(matrix.values().count(), 6);
    }

    #[test]
    fn tables_are_monotone_and_start_at_zero() {
        let stations = vec![
            station(1.0, 1.0),
            station(2.0, 2.0),
            station(-1.0, 1.0),
            station(-1.0, -1.0),
            station(1.0, -1.0),
            station(3.0, 1.5),
        ];
        let mut instance = Instance::new(0);
        instance.rules.min_stations = 5;
        instance.rules.regions = quadrant_regions();
        let regions = RegionMap::build(&stations, &instance.rules.regions).unwrap();
        let bounds = LowerBounds::build(&stations, &instance, &regions);

        assert_eq!(bounds.remaining_regions(0), 0.0);
        assert_eq!(bounds.remaining_stations(0), 0.0);
        for k in 0..4 {
            assert!(bounds.remaining_regions(k) <= bounds.remaining_regions(k + 1));
        }
        for k in 0..5 {
            assert!(bounds.remaining_stations(k) <= bounds.remaining_stations(k + 1));
        }
        assert!(bounds.remaining_regions(4) > 0.0);
        assert!(bounds.remaining_stations(5) > 0.0);
    }

    #[test]
    fn single_region_tables_stay_at_zero() {
        let stations = vec![station(0.0, 0.0), station(1.0, 0.0)];
        let mut instance = Instance::new(0);
        instance.rules.min_stations = 2;
        instance.rules.regions = vec![RegionSpec {
            name: "everywhere".into(),
            ..RegionSpec::default()
        }];
        let regions = RegionMap::build(&stations, &instance.rules.regions).unwrap();
        let bounds = LowerBounds::build(&stations, &instance, &regions);
        // no inter-region pairs exist, the padded table never overestimates
        assert_eq!(bounds.remaining_regions(0), 0.0);
        assert_eq!(bounds.remaining_regions(1), 0.0);
    }
}
