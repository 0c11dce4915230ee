//! Region model: the mandatory geographic zones of the challenge and the
//! coarser "extended region" partition used by the regional pruning rule.
//!
//! A station's *primary* region is the first declared region whose bounds
//! it satisfies; stations outside every region have none. Every station
//! additionally gets exactly one *extended* region, the region whose
//! centroid (mean position of its primary members) is nearest. The
//! extended partition is total, which is what the pruning rule needs.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::Location;
use crate::station::{Station, StationId};

/// Maximum number of mandatory regions; the visited-regions label field
/// is a bit mask of this width.
pub const MAX_REGIONS: usize = 4;

/// Bit set over at most [`MAX_REGIONS`] regions.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionSet(u8);

impl RegionSet {
    pub const EMPTY: RegionSet = RegionSet(0);

    /// Set holding the single region at `index`.
    pub fn single(index: usize) -> Self {
        debug_assert!(index < MAX_REGIONS);
        RegionSet(1 << index)
    }

    /// Set holding the first `count` regions.
    pub fn all(count: usize) -> Self {
        debug_assert!(count <= MAX_REGIONS);
        RegionSet(((1u16 << count) - 1) as u8)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        debug_assert!(bits < 1 << MAX_REGIONS);
        RegionSet(bits)
    }

    pub fn union(self, other: RegionSet) -> RegionSet {
        RegionSet(self.0 | other.0)
    }

    /// True when every region of `other` is also in `self`.
    pub fn contains_all(self, other: RegionSet) -> bool {
        other.0 & !self.0 == 0
    }

    pub fn intersects(self, other: RegionSet) -> bool {
        self.0 & other.0 != 0
    }

    /// Number of regions in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Debug for RegionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegionSet({:#06b})", self.0)
    }
}

/// One mandatory zone, delimited by optional longitude/latitude
/// half-planes. A bound left at `None` does not constrain.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RegionSpec {
    pub name: String,
    pub min_lon: Option<f64>,
    pub max_lon: Option<f64>,
    pub min_lat: Option<f64>,
    pub max_lat: Option<f64>,
}

impl RegionSpec {
    pub fn contains(&self, location: &Location) -> bool {
        self.min_lon.map_or(true, |v| location.lon > v)
            && self.max_lon.map_or(true, |v| location.lon < v)
            && self.min_lat.map_or(true, |v| location.lat > v)
            && self.max_lat.map_or(true, |v| location.lat < v)
    }
}

/// The four zones of the original challenge area, counter-clockwise
/// starting from the west.
pub fn challenge_regions() -> Vec<RegionSpec> {
    vec![
        RegionSpec {
            name: "west".into(),
            max_lon: Some(-1.66),
            ..RegionSpec::default()
        },
        RegionSpec {
            name: "south".into(),
            max_lon: Some(2.0),
            max_lat: Some(44.5),
            ..RegionSpec::default()
        },
        RegionSpec {
            name: "south-east".into(),
            min_lon: Some(5.0),
            max_lat: Some(44.5),
            ..RegionSpec::default()
        },
        RegionSpec {
            name: "north-east".into(),
            min_lon: Some(6.0),
            min_lat: Some(46.5),
            ..RegionSpec::default()
        },
    ]
}

/// Per-station region assignment, computed once per solve.
#[derive(Debug, Clone)]
pub struct RegionMap {
    region_count: usize,
    primary: Vec<RegionSet>,
    extended: Vec<RegionSet>,
    centroids: Vec<Location>,
}

impl RegionMap {
    /// Assign primary and extended regions to every station.
    ///
    /// Fails with [`Error::EmptyRegion`] when a declared region has no
    /// primary member, since the challenge would then be unsatisfiable.
    pub fn build(stations: &[Station], specs: &[RegionSpec]) -> Result<RegionMap> {
        if specs.is_empty() || specs.len() > MAX_REGIONS {
            return Err(Error::InvalidRegionCount {
                count: specs.len(),
                max: MAX_REGIONS,
            });
        }

        let mut primary = vec![RegionSet::EMPTY; stations.len()];
        let mut acc = vec![(0.0f64, 0.0f64, 0usize); specs.len()];
        for (station_idx, station) in stations.iter().enumerate() {
            for (region_idx, spec) in specs.iter().enumerate() {
                if spec.contains(&station.location) {
                    primary[station_idx] = RegionSet::single(region_idx);
                    let (lon, lat, count) = &mut acc[region_idx];
                    *lon += station.location.lon;
                    *lat += station.location.lat;
                    *count += 1;
                    break;
                }
            }
        }

        let mut centroids = Vec::with_capacity(specs.len());
        for (region_idx, (lon, lat, count)) in acc.into_iter().enumerate() {
            if count == 0 {
                return Err(Error::EmptyRegion {
                    name: specs[region_idx].name.clone(),
                });
            }
            centroids.push(Location::new(lon / count as f64, lat / count as f64));
        }

        // Nearest-centroid assignment gives a total partition even for
        // stations that sit outside every declared zone.
        let mut extended = vec![RegionSet::EMPTY; stations.len()];
        for (station_idx, station) in stations.iter().enumerate() {
            let mut best = 0;
            let mut best_distance = f64::MAX;
            for (region_idx, centroid) in centroids.iter().enumerate() {
                let distance = centroid.distance_nm(&station.location);
                if distance < best_distance {
                    best_distance = distance;
                    best = region_idx;
                }
            }
            extended[station_idx] = RegionSet::single(best);
        }

        Ok(RegionMap {
            region_count: specs.len(),
            primary,
            extended,
            centroids,
        })
    }

    pub fn region_count(&self) -> usize {
        self.region_count
    }

    /// Primary region of a station; empty when it lies outside every zone.
    pub fn primary(&self, station: StationId) -> RegionSet {
        self.primary[station as usize]
    }

    /// Extended region of a station; always a single region.
    pub fn extended(&self, station: StationId) -> RegionSet {
        self.extended[station as usize]
    }

    pub fn centroid(&self, region: usize) -> Location {
        self.centroids[region]
    }

    /// Set of every declared region.
    pub fn full_set(&self) -> RegionSet {
        RegionSet::all(self.region_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_at(lon: f64, lat: f64) -> Station {
        Station::new(Location::new(lon, lat), format!("S{lon}/{lat}"), true, true)
    }

    #[test]
    fn region_set_operations() {
        let a = RegionSet::single(0).union(RegionSet::single(2));
        assert_eq!(a.bits(), 0b101);
        assert_eq!(a.len(), 2);
        assert!(a.contains_all(RegionSet::single(2)));
        assert!(!a.contains_all(RegionSet::single(1)));
        assert!(a.intersects(RegionSet::single(0)));
        assert!(!a.intersects(RegionSet::single(3)));
        assert!(RegionSet::all(4).contains_all(a));
        assert!(RegionSet::EMPTY.is_empty());
    }

    #[test]
    fn challenge_regions_match_original_inequalities() {
        let regions = challenge_regions();
        // Brittany belongs to the west zone
        assert!(regions[0].contains(&Location::new(-4.0, 48.0)));
        // Toulouse area belongs to the south zone
        assert!(!regions[0].contains(&Location::new(1.3, 43.6)));
        assert!(regions[1].contains(&Location::new(1.3, 43.6)));
        // Nice area belongs to the south-east zone
        assert!(regions[2].contains(&Location::new(7.2, 43.7)));
        // Strasbourg area belongs to the north-east zone
        assert!(regions[3].contains(&Location::new(7.7, 48.5)));
        // Paris belongs to none
        assert!(!regions.iter().any(|r| r.contains(&Location::new(2.35, 48.85))));
    }

    #[test]
    fn primary_uses_first_match_and_extended_is_total() {
        let stations = vec![
            station_at(-4.0, 48.0),
            station_at(1.3, 43.6),
            station_at(7.2, 43.7),
            station_at(7.7, 48.5),
            // outside every zone but still gets an extended region
            station_at(2.35, 48.85),
        ];
        let map = RegionMap::build(&stations, &challenge_regions()).unwrap();
        assert_eq!(map.primary(0), RegionSet::single(0));
        assert_eq!(map.primary(1), RegionSet::single(1));
        assert_eq!(map.primary(2), RegionSet::single(2));
        assert_eq!(map.primary(3), RegionSet::single(3));
        assert!(map.primary(4).is_empty());
        for station in 0..stations.len() {
            assert_eq!(map.extended(station as StationId).len(), 1);
        }
    }

    #[test]
    fn empty_region_is_a_config_error() {
        let stations = vec![station_at(-4.0, 48.0)];
        let err = RegionMap::build(&stations, &challenge_regions()).unwrap_err();
        assert!(matches!(err, Error::EmptyRegion { name } if name == "south"));
    }

    #[test]
    fn single_unbounded_region_covers_everything() {
        let stations = vec![station_at(100.0, -60.0), station_at(-120.0, 80.0)];
        let specs = vec![RegionSpec {
            name: "everywhere".into(),
            ..RegionSpec::default()
        }];
        let map = RegionMap::build(&stations, &specs).unwrap();
        assert_eq!(map.primary(0), RegionSet::single(0));
        assert_eq!(map.primary(1), RegionSet::single(0));
        assert_eq!(map.full_set(), RegionSet::single(0));
    }
}
