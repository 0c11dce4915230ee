use thiserror::Error;

/// Convenient result alias for the Aerotour library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when the catalogue holds more stations than the packed label
    /// structures can index.
    #[error("catalogue has {count} stations, the solver supports at most {max}")]
    TooManyStations { count: usize, max: usize },

    /// Raised when the catalogue is empty.
    #[error("catalogue has no stations")]
    EmptyCatalogue,

    /// Raised when a station index does not exist in the catalogue.
    #[error("station index {index} is out of range for a catalogue of {count}")]
    StationOutOfRange { index: usize, count: usize },

    /// Raised when a mandatory region contains no station of the catalogue.
    #[error("mandatory region '{name}' contains no station")]
    EmptyRegion { name: String },

    /// Raised when the region list is empty or exceeds the supported maximum.
    #[error("instance declares {count} regions, expected 1 to {max}")]
    InvalidRegionCount { count: usize, max: usize },

    /// Raised when the minimum station count does not fit the packed label
    /// fields or exceeds the catalogue size.
    #[error("minimum station count {value} must be between 2 and {max}")]
    InvalidMinStations { value: u8, max: u8 },

    /// Raised when a speed, capacity or burn rate is not strictly positive.
    #[error("{name} must be strictly positive, got {value}")]
    InvalidPositive { name: &'static str, value: f64 },

    /// Raised when the day/night window is not ordered inside a 24-hour day.
    #[error("invalid day window: day start {day_start} must come before night start {night_start} within 0..24")]
    InvalidDayWindow { day_start: f32, night_start: f32 },

    /// Raised when the seed heuristic runs out of admissible stations.
    #[error("seed heuristic found no admissible station at step {step}")]
    SeedStuck { step: usize },

    /// Violation of a solver invariant; indicates a bug, not a bad input.
    #[error("internal invariant violated: {message}")]
    InternalInvariant { message: String },
}
