//! Geometry on a spherical Earth.
//!
//! Positions are longitude/latitude pairs in degrees, distances are
//! great-circle distances in nautical miles. The solver converts every
//! distance once into a *time-distance* (hours at cruise speed) so that
//! elapsed time and distance stay interchangeable downstream; the
//! conversion itself lives on [`crate::instance::Instance`].

use serde::Serialize;

/// Mean Earth radius in nautical miles.
pub const EARTH_RADIUS_NM: f64 = 3440.1;

/// Geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Location {
    pub lon: f64,
    pub lat: f64,
}

impl Location {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Great-circle distance to `other` in nautical miles, using the
    /// spherical law of cosines.
    pub fn distance_nm(&self, other: &Location) -> f64 {
        let la1 = self.lat.to_radians();
        let lo1 = self.lon.to_radians();
        let la2 = other.lat.to_radians();
        let lo2 = other.lon.to_radians();
        let cos_angle = la1.sin() * la2.sin() + la1.cos() * la2.cos() * (lo2 - lo1).cos();
        // rounding can push the cosine a hair outside [-1, 1]
        cos_angle.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_NM
    }

    /// Initial great-circle bearing towards `other`, in degrees 0..360.
    pub fn bearing_to(&self, other: &Location) -> f64 {
        let d_lon = (other.lon - self.lon).to_radians();
        let la1 = self.lat.to_radians();
        let la2 = other.lat.to_radians();
        let y = d_lon.sin() * la2.cos();
        let x = la1.cos() * la2.sin() - la1.sin() * la2.cos() * d_lon.cos();
        let azimuth = y.atan2(x).to_degrees();
        if azimuth < 0.0 {
            azimuth + 360.0
        } else {
            azimuth
        }
    }

    /// Linear interpolation towards `other` at fraction `x`.
    ///
    /// Not exact on a sphere, but at the scale of the problem area
    /// lon/lat behave close enough to planar coordinates.
    pub fn lerp(&self, other: &Location, x: f64) -> Location {
        Location {
            lon: self.lon + (other.lon - self.lon) * x,
            lat: self.lat + (other.lat - self.lat) * x,
        }
    }
}

/// Total great-circle length of a polyline of locations, in nautical miles.
pub fn polyline_length_nm(points: impl IntoIterator<Item = Location>) -> f64 {
    let mut length = 0.0;
    let mut previous: Option<Location> = None;
    for point in points {
        if let Some(prev) = previous {
            length += prev.distance_nm(&point);
        }
        previous = Some(point);
    }
    length
}

/// True when `time` (hours since an arbitrary midnight) falls in the night
/// window of a day running `day_start..night_start`.
pub fn is_night(time: f32, day_start: f32, night_start: f32) -> bool {
    let t = time.rem_euclid(24.0);
    t < day_start || t > night_start
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dms(d: f64, m: f64, s: f64) -> f64 {
        d + m / 60.0 + s / 3600.0
    }

    #[test]
    fn london_paris_distance() {
        let london = Location::new(-dms(0.0, 27.0, 42.0), dms(51.0, 28.0, 14.0));
        let paris = Location::new(dms(2.0, 32.0, 59.0), dms(49.0, 0.0, 46.0));
        let distance = london.distance_nm(&paris);
        assert!((distance - 187.456).abs() < 0.5, "got {distance}");
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = Location::new(3.2, 47.1);
        let b = Location::new(-1.5, 44.0);
        assert!((a.distance_nm(&b) - b.distance_nm(&a)).abs() < 1e-9);
        assert_eq!(a.distance_nm(&a), 0.0);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Location::new(0.0, 0.0);
        assert!((origin.bearing_to(&Location::new(0.0, 1.0)) - 0.0).abs() < 1e-6);
        assert!((origin.bearing_to(&Location::new(1.0, 0.0)) - 90.0).abs() < 1e-6);
        assert!((origin.bearing_to(&Location::new(0.0, -1.0)) - 180.0).abs() < 1e-6);
        assert!((origin.bearing_to(&Location::new(-1.0, 0.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(10.0, 20.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid, Location::new(5.0, 10.0));
    }

    #[test]
    fn night_window_wraps_past_midnight() {
        assert!(is_night(6.0, 8.0, 20.0));
        assert!(!is_night(12.0, 8.0, 20.0));
        assert!(is_night(21.5, 8.0, 20.0));
        // 26h elapsed is 2am the next day
        assert!(is_night(26.0, 8.0, 20.0));
        assert!(!is_night(24.0 + 12.0, 8.0, 20.0));
    }
}
