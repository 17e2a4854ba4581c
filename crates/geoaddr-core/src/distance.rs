//! Distance from a fixed reference point.
//!
//! Uses the equirectangular approximation: longitude deltas are scaled by the
//! cosine of the mean latitude of the two points, then treated as planar.
//! Accurate to well under 1% at the scale of a single country.

use std::f64::consts::PI;

use crate::location::LocationRecord;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// A point on the globe in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl ReferencePoint {
    /// Tokyo Station. Reported on the wire as `tokyo_sta_distance`.
    pub const TOKYO_STATION: Self = Self {
        longitude: 139.767_306_8,
        latitude: 35.680_959_1,
    };

    /// Approximate distance in km from this point to `(longitude, latitude)`.
    #[must_use]
    pub fn distance_to(&self, longitude: f64, latitude: f64) -> f64 {
        let dx = (longitude - self.longitude) * (PI * (latitude + self.latitude) / 360.0).cos();
        let dy = latitude - self.latitude;
        (PI * EARTH_RADIUS_KM / 180.0) * dx.hypot(dy)
    }
}

/// Unrounded distance in km from Tokyo Station to `record`.
#[must_use]
pub fn distance_km(record: &LocationRecord) -> f64 {
    ReferencePoint::TOKYO_STATION.distance_to(record.longitude, record.latitude)
}

/// Round to one decimal place, half away from zero (`0.25 -> 0.3`).
#[must_use]
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Farthest candidate's distance from Tokyo Station, rounded to 0.1 km.
///
/// The farthest point gives an upper bound for the whole postal-code area.
/// Returns `None` for an empty slice; a postal code with no hits has no
/// meaningful distance.
#[must_use]
pub fn reference_distance_km(records: &[LocationRecord]) -> Option<f64> {
    records
        .iter()
        .map(distance_km)
        .reduce(f64::max)
        .map(round_to_tenth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(longitude: f64, latitude: f64) -> LocationRecord {
        LocationRecord::new("p", "c", "t", longitude, latitude)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn reference_point_is_zero_distance() {
        let station = ReferencePoint::TOKYO_STATION;
        let record = at(station.longitude, station.latitude);
        assert_close(distance_km(&record), 0.0);
        assert_eq!(reference_distance_km(&[record]), Some(0.0));
    }

    #[test]
    fn marunouchi_is_within_a_hundred_metres() {
        let record = LocationRecord::new("Tokyo", "Chiyoda", "Marunouchi", 139.7671, 35.6812);
        let d = reference_distance_km(&[record]).expect("non-empty");
        assert!((0.0..=0.1).contains(&d), "got {d}");
    }

    #[test]
    fn single_record_matches_formula() {
        // Osaka Station.
        let record = at(135.4959, 34.7025);
        let x: f64 = 135.4959;
        let y: f64 = 34.7025;
        let rx = 139.767_306_8;
        let ry = 35.680_959_1;
        let expected = (PI * 6371.0) / 180.0
            * (((x - rx) * (PI * (y + ry) / 360.0).cos()).powi(2) + (y - ry).powi(2)).sqrt();
        assert_close(distance_km(&record), expected);
        assert!((expected - 403.109_8).abs() < 1e-3);
        assert_eq!(reference_distance_km(&[record]), Some(403.1));
    }

    #[test]
    fn multiple_records_report_the_maximum() {
        let records = [
            at(139.7005, 35.6897), // Shinjuku, ~6.1 km
            at(141.3508, 43.0686), // Sapporo, ~832.7 km
            at(135.4959, 34.7025), // Osaka, ~403.1 km
        ];
        assert_eq!(reference_distance_km(&records), Some(832.7));
    }

    #[test]
    fn maximum_is_not_first_or_mean() {
        let records = [at(139.7638, 35.6745), at(139.6917, 35.6895)];
        // First is ~0.8 km, mean would be ~3.8 km, farthest is ~6.9 km.
        assert_eq!(reference_distance_km(&records), Some(6.9));
    }

    #[test]
    fn empty_input_has_no_distance() {
        assert_eq!(reference_distance_km(&[]), None);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_close(round_to_tenth(0.25), 0.3);
        assert_close(round_to_tenth(1.25), 1.3);
        assert_close(round_to_tenth(2.75), 2.8);
        assert_close(round_to_tenth(0.249), 0.2);
        assert_close(round_to_tenth(886.189), 886.2);
    }
}
