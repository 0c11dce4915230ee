//! Partial adjacency index with fuel-accessibility fallback.
//!
//! Propagating a label to every other station would make the fan-out
//! O(N); instead each station precomputes its K nearest neighbours in
//! time-distance. K ≪ N keeps exploration bounded while the heuristic
//! stays good on maps of this density. Two extra tables ride along: the
//! distance to the designated target (the target is never used as a
//! transit neighbour, it is reached through a dedicated last-hop rule)
//! and the distance to the nearest fuel-capable station, which the
//! exploration uses to refuse hops that would strand the plane.
//!
//! Neighbour lists are guaranteed to contain at least one fuel-capable
//! station: when the K nearest carry no fuel, the nearest fuel-capable
//! one is appended. That can still be insufficient late in a path (the
//! appended station may already have been visited), which the fuel
//! look-ahead check covers.

use crate::instance::Instance;
use crate::solver::kbest::KSmallest;
use crate::solver::label::Hours;
use crate::station::{Station, StationId};

/// Neighbours kept per station.
pub(crate) const NEIGHBOURS_PER_STATION: usize = 20;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Neighbour {
    pub distance: Hours,
    pub station: StationId,
}

pub(crate) struct PartialAdjacency {
    neighbours: Vec<Vec<Neighbour>>,
    /// Time-distance from every station to the target, when one is set.
    to_target: Option<Vec<Hours>>,
    nearest_refuel: Vec<Hours>,
}

impl PartialAdjacency {
    pub fn build(stations: &[Station], instance: &Instance) -> Self {
        let station_count = stations.len();
        let mut neighbours = Vec::with_capacity(station_count);
        let mut to_target = instance.target.map(|_| vec![0.0; station_count]);
        let mut nearest_refuel = vec![Hours::MAX; station_count];

        for from in 0..station_count {
            let mut selection = KSmallest::new(NEIGHBOURS_PER_STATION);
            let mut nearest_fuel: Option<(Hours, StationId)> = None;
            for to in 0..station_count {
                if from == to {
                    continue;
                }
                let distance =
                    instance.time_distance(&stations[from].location, &stations[to].location);
                if Some(to as StationId) == instance.target {
                    // the target is reached through the last-hop rule
                    // only, never as a transit neighbour or a fuel stop
                    if let Some(table) = to_target.as_mut() {
                        table[from] = distance;
                    }
                    continue;
                }
                selection.insert(distance, to as StationId);
                if stations[to].fuel_capable
                    && nearest_fuel.map_or(true, |(best, _)| distance < best)
                {
                    nearest_fuel = Some((distance, to as StationId));
                }
            }

            let mut list: Vec<Neighbour> = selection
                .into_entries()
                .into_iter()
                .map(|(distance, station)| Neighbour { distance, station })
                .collect();

            if let Some((distance, station)) = nearest_fuel {
                nearest_refuel[from] = distance;
                // keep at least one station with fuel reachable
                if !list
                    .iter()
                    .any(|n| stations[n.station as usize].fuel_capable)
                    && !list.iter().any(|n| n.station == station)
                {
                    list.push(Neighbour { distance, station });
                }
            }
            neighbours.push(list);
        }

        Self {
            neighbours,
            to_target,
            nearest_refuel,
        }
    }

    pub fn neighbour_count(&self, station: StationId) -> usize {
        self.neighbours[station as usize].len()
    }

    pub fn neighbour(&self, station: StationId, index: usize) -> Neighbour {
        self.neighbours[station as usize][index]
    }

    /// Time-distance to the target station; `None` when the instance has
    /// no fixed target.
    pub fn target_distance(&self, from: StationId) -> Option<Hours> {
        self.to_target.as_ref().map(|table| table[from as usize])
    }

    /// Time-distance to the globally nearest fuel-capable station,
    /// whether or not it made the neighbour list. `Hours::MAX` when the
    /// catalogue has no fuel at all.
    pub fn nearest_refuel_distance(&self, from: StationId) -> Hours {
        self.nearest_refuel[from as usize]
    }
}
