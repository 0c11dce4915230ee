//! Aerodrome catalogue model.

use serde::Serialize;

use crate::geometry::Location;

/// Index of a station in the catalogue.
///
/// The solver never handles more than [`MAX_STATIONS`] stations, so an
/// index always fits the 9-bit fields of the packed solver structures.
pub type StationId = u16;

/// Hard cap on catalogue size. The label bit sets and the packed
/// station fields are sized for it; raising it requires recomputing
/// those widths.
pub const MAX_STATIONS: usize = 512;

/// A single aerodrome, immutable for the duration of a solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub location: Location,
    pub name: String,
    /// Fuel service is available on the ground.
    pub fuel_capable: bool,
    /// The aerodrome accepts night-VFR arrivals.
    pub night_accessible: bool,
}

impl Station {
    pub fn new(
        location: Location,
        name: impl Into<String>,
        fuel_capable: bool,
        night_accessible: bool,
    ) -> Self {
        Self {
            location,
            name: name.into(),
            fuel_capable,
            night_accessible,
        }
    }
}
