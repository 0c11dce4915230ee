//! The label-setting search loop.
//!
//! The driver owns every mutable structure of one solve: the label and
//! fragment arenas, the best-labels cache and a per-station index of
//! stored labels. It repeatedly pops the best-scored explorable label,
//! re-checks its lower bound against the current upper bound, generates
//! its children under the pruning rules, and admits the survivors after
//! domination filtering. A child that reaches the required station count
//! with every region covered tightens the upper bound.
//!
//! Everything is single-threaded; cancellation is cooperative and checked
//! once per iteration.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::instance::Instance;
use crate::region::RegionMap;
use crate::solver::adjacency::PartialAdjacency;
use crate::solver::arena::{ClockArena, FragmentArena, FragmentId, Slot};
use crate::solver::bounds::LowerBounds;
use crate::solver::label::{Hours, Label, LabelId};
use crate::solver::queue::BestLabels;
use crate::solver::SolveOptions;
use crate::station::{Station, StationId};

/// Initial slot counts for both arenas; they grow as needed.
const INITIAL_ARENA_SLOTS: usize = 20_000;

/// Weight of elapsed time in the exploration score.
const TIME_SCORE_WEIGHT: f32 = 0.3;

/// Amplitude of the random score jitter applied once an upper bound
/// exists, to diversify otherwise score-tied labels.
const SCORE_NOISE: f32 = 3.0;

/// Lenient domination rule: equal progress, no missing region, no later.
/// Strict visited-set inclusion would be admissible too but leaves far
/// too many incomparable labels per station on large catalogues. The
/// current-station condition is enforced by only comparing labels inside
/// the same per-station bucket.
fn dominates(dominating: &Label, dominated: &Label) -> bool {
    dominating.visited_station_count() == dominated.visited_station_count()
        && dominating
            .visited_regions()
            .contains_all(dominated.visited_regions())
        && dominating.current_time <= dominated.current_time
}

pub(crate) struct LabelSetting<'a> {
    stations: &'a [Station],
    instance: &'a Instance,
    regions: RegionMap,
    adjacency: PartialAdjacency,
    bounds: LowerBounds,
    labels: ClockArena<Label>,
    fragments: FragmentArena,
    queue: BestLabels,
    /// Stored label ids per current station; domination only compares
    /// within one bucket.
    by_station: Vec<Vec<LabelId>>,
    rng: StdRng,
    plane_fuel_time: Hours,
    best_time: Hours,
    best_fragment: FragmentId,
    /// Score jitter only starts once a completion-time bound is known,
    /// from the seed or from a found tour.
    noise_enabled: bool,
}

impl<'a> LabelSetting<'a> {
    pub fn new(
        stations: &'a [Station],
        instance: &'a Instance,
        options: &SolveOptions,
    ) -> Result<Self> {
        instance.validate(stations.len())?;
        let regions = RegionMap::build(stations, &instance.rules.regions)?;
        let adjacency = PartialAdjacency::build(stations, instance);
        let bounds = LowerBounds::build(stations, instance, &regions);
        Ok(Self {
            stations,
            instance,
            regions,
            adjacency,
            bounds,
            labels: ClockArena::with_capacity(INITIAL_ARENA_SLOTS),
            fragments: FragmentArena::with_capacity(INITIAL_ARENA_SLOTS),
            queue: BestLabels::new(options.max_live_labels),
            by_station: vec![Vec::new(); stations.len()],
            rng: StdRng::seed_from_u64(options.seed),
            plane_fuel_time: instance.plane_fuel_time(),
            // any acceptable completion must also satisfy the duration
            // rule, so it doubles as the initial upper bound
            best_time: instance.departure_time + instance.rules.max_duration,
            best_fragment: Label::NO_FRAGMENT,
            noise_enabled: false,
        })
    }

    /// Install an upper bound on the total completion time before the
    /// search starts (including the departure-time offset). The duration
    /// rule stays in force when the bound is looser.
    pub fn set_initial_bound(&mut self, bound: Hours) {
        self.best_time = self.best_time.min(bound);
        self.noise_enabled = true;
    }

    /// Total flight time of the best path found, if any was found.
    pub fn best_total_time(&self) -> Option<Hours> {
        (self.best_fragment != Label::NO_FRAGMENT)
            .then(|| self.best_time - self.instance.departure_time)
    }

    /// Run the search loop until the queue drains, the stop flag raises,
    /// the time budget elapses or the iteration cap is reached. Returns
    /// the number of explored labels.
    pub fn search(
        &mut self,
        options: &SolveOptions,
        on_improvement: &mut dyn FnMut(Hours, Duration),
    ) -> u64 {
        let started = Instant::now();
        let deadline = options.time_budget.map(|budget| started + budget);
        let min_stations = self.instance.rules.min_stations;
        let full_regions = self.regions.full_set();

        self.push_initial_label();

        let mut children: Vec<Label> = Vec::with_capacity(64);
        let mut iterations = 0u64;

        loop {
            if let Some(stop) = &options.stop {
                if stop.load(Ordering::Relaxed) {
                    tracing::debug!(iterations, "stop flag raised, returning best found");
                    break;
                }
            }
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    tracing::debug!(iterations, "time budget elapsed, returning best found");
                    break;
                }
            }
            if let Some(cap) = options.max_iterations {
                if iterations >= cap {
                    break;
                }
            }

            let Some(explored_id) = self.queue.pop_front(&self.labels) else {
                tracing::debug!(iterations, "no explorable label left");
                break;
            };
            iterations += 1;

            // copy out, then retire the slot; it stays in its bucket for
            // future domination checks
            let explored = self.labels[explored_id as usize];
            self.labels[explored_id as usize].mark_explored();

            // the upper bound may have tightened since this label was
            // queued
            if explored.current_time + self.lower_bound(&explored) >= self.best_time {
                continue;
            }

            self.explore(&explored, &mut children);
            debug_assert!(children.len() <= usize::from(crate::solver::arena::PathFragment::MAX_USE_COUNT));

            for child in children.drain(..) {
                if child.visited_station_count() == min_stations {
                    if child.visited_regions() == full_regions && child.current_time < self.best_time
                    {
                        if self.best_fragment != Label::NO_FRAGMENT {
                            self.fragments.release(self.best_fragment);
                        }
                        // the child still carries its parent's fragment;
                        // materialise the completing hop now
                        self.best_fragment = self
                            .fragments
                            .push(child.current_station(), child.path_fragment);
                        self.best_time = child.current_time;
                        self.noise_enabled = true;
                        let total = self.best_time - self.instance.departure_time;
                        tracing::info!(total_hours = total, "improved upper bound");
                        on_improvement(total, started.elapsed());
                    }
                } else {
                    self.admit(child);
                }
            }
        }

        tracing::debug!(
            iterations,
            live_labels = self.labels.live_count(),
            live_fragments = self.fragments.live_count(),
            "search finished"
        );
        iterations
    }

    /// Reconstruct the best path, then release every remaining label so
    /// that only the best-path fragments stay allocated.
    pub fn take_path(&mut self) -> Result<Vec<StationId>> {
        let path = if self.best_fragment != Label::NO_FRAGMENT {
            let path = self.fragments.unwind(self.best_fragment);
            if path.len() != self.instance.rules.min_stations as usize {
                return Err(Error::InternalInvariant {
                    message: format!(
                        "reconstructed path has {} stations, expected {}",
                        path.len(),
                        self.instance.rules.min_stations
                    ),
                });
            }
            path
        } else {
            Vec::new()
        };
        self.release_remaining_labels();
        Ok(path)
    }

    fn push_initial_label(&mut self) {
        let departure = self.instance.departure;
        let mut initial = Label::new(departure, self.regions.primary(departure), 1);
        initial.current_fuel = self.plane_fuel_time;
        initial.current_time = self.instance.departure_time;
        // score is irrelevant, the initial label is explored first
        initial.score = 0.0;
        initial.visited_stations.insert(departure);
        initial.path_fragment = self.fragments.push_root(departure);
        let score = initial.score;
        let id = self.labels.push(initial) as LabelId;
        self.by_station[departure as usize].push(id);
        self.queue.try_insert(id, score);
    }

    fn lower_bound(&self, label: &Label) -> Hours {
        let regions_left = self.regions.region_count() - label.visited_regions().len();
        let stations_left =
            usize::from(self.instance.rules.min_stations - label.visited_station_count());
        let mut bound = self
            .bounds
            .remaining_regions(regions_left)
            .max(self.bounds.remaining_stations(stations_left));
        if let Some(distance) = self.adjacency.target_distance(label.current_station()) {
            bound = bound.max(distance);
        }
        bound
    }

    fn score(&mut self, label: &Label) -> f32 {
        let mut score = f32::from(label.visited_station_count())
            - TIME_SCORE_WEIGHT * label.current_time;
        if self.noise_enabled {
            score += self.rng.gen::<f32>() * SCORE_NOISE;
        }
        debug_assert!(score > Label::MIN_SCORE);
        score
    }

    /// Generate the children of `source` into `children`.
    fn explore(&mut self, source: &Label, children: &mut Vec<Label>) {
        if let Some(target) = self.instance.target {
            if source.visited_station_count() == self.instance.rules.min_stations - 1 {
                // one station left: the only move is the final hop
                if let Some(distance) = self.adjacency.target_distance(source.current_station()) {
                    self.try_explore(source, target, distance, children);
                }
                return;
            }
        }
        for index in 0..self.adjacency.neighbour_count(source.current_station()) {
            let neighbour = self.adjacency.neighbour(source.current_station(), index);
            self.try_explore(source, neighbour.station, neighbour.distance, children);
        }
    }

    /// Apply every pruning rule to the `source -> next` hop and push the
    /// surviving refuel variants.
    fn try_explore(
        &mut self,
        source: &Label,
        next: StationId,
        distance: Hours,
        children: &mut Vec<Label>,
    ) {
        let next_station = &self.stations[next as usize];
        let new_regions = source.visited_regions().union(self.regions.primary(next));
        let region_count = self.regions.region_count();

        if source.visited_stations.contains(next) {
            return; // already visited
        }
        if distance > source.current_fuel {
            return; // not enough fuel
        }
        if source.current_time + distance >= self.best_time {
            return; // cannot beat the best known completion
        }
        if usize::from(self.instance.rules.min_stations - source.visited_station_count())
            < region_count - new_regions.len()
        {
            return; // more regions missing than steps remaining
        }
        if !next_station.fuel_capable
            && source.current_fuel - distance < self.adjacency.nearest_refuel_distance(next)
        {
            return; // one hop is possible, two are not
        }
        if !next_station.night_accessible
            && Some(next) != self.instance.target
            && self
                .instance
                .is_night(source.current_time + distance)
        {
            return; // the station is closed at night
        }

        // Ir strategy: finish the extended region you are in before
        // leaving it, and never re-enter one whose primary region you
        // already visited; moot once every region is covered.
        let current_extended = self.regions.extended(source.current_station());
        let next_extended = self.regions.extended(next);
        let visited = source.visited_regions();
        if !visited.contains_all(current_extended) && next_extended != current_extended {
            return;
        }
        if visited.len() != region_count
            && visited.intersects(current_extended)
            && next_extended != current_extended
            && visited.intersects(next_extended)
        {
            return;
        }

        let with_refuel = next_station.fuel_capable;
        // with a free refuel the non-refuelling variant is strictly
        // dominated, skip it to avoid duplicates
        let without_refuel = !(with_refuel && self.instance.refuel_time == 0.0);

        let mut base = *source;
        base.set_current_station(next);
        base.set_visited_regions(new_regions);
        base.increment_station_count();
        base.visited_stations.insert(next);

        if without_refuel {
            let mut child = base;
            child.current_fuel -= distance;
            child.current_time += distance;
            child.score = self.score(&child);
            children.push(child);
        }

        if with_refuel {
            let mut child = base;
            child.current_fuel = self.plane_fuel_time;
            child.current_time += distance + self.instance.refuel_time;
            child.score = self.score(&child);
            children.push(child);
        }
    }

    /// Check a child against the stored labels at its station, free the
    /// ones it dominates, and store it unless it is dominated itself.
    fn admit(&mut self, child: Label) {
        let station = child.current_station() as usize;
        let mut is_dominated = false;
        let mut index = 0;
        while index < self.by_station[station].len() {
            let other_id = self.by_station[station][index];
            let other = &self.labels[other_id as usize];
            let child_wins = dominates(&child, other);
            let other_wins = dominates(other, &child);
            if child_wins {
                self.queue.remove(other_id);
                let fragment = self.labels[other_id as usize].path_fragment;
                self.labels.free(other_id as usize);
                self.fragments.release(fragment);
                self.by_station[station].swap_remove(index);
            } else if other_wins {
                is_dominated = true;
                break;
            } else {
                index += 1;
            }
        }
        if is_dominated {
            return;
        }

        // the fragment is only materialised once the child is known to
        // survive; until here it still names its parent's fragment
        let mut child = child;
        child.path_fragment = self
            .fragments
            .push(child.current_station(), child.path_fragment);
        let score = child.score;
        let id = self.labels.push(child) as LabelId;
        self.by_station[station].push(id);
        self.queue.try_insert(id, score);
    }

    /// Release the fragments of every label still in the arena. After
    /// this, only the best-path chain remains allocated.
    fn release_remaining_labels(&mut self) {
        for index in 0..self.labels.len() {
            if self.labels[index].is_free() {
                continue;
            }
            let fragment = self.labels[index].path_fragment;
            self.labels.free(index);
            self.fragments.release(fragment);
        }
        for bucket in &mut self.by_station {
            bucket.clear();
        }
    }
}
