//! Nearest known city by great-circle distance.

use puch_core::constants::EARTH_RADIUS_KM;
use puch_core::types::ResolvedCity;

use crate::cities::{CityRecord, CITIES};

/// Haversine distance between two points, in kilometres.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
}

/// Returns the closest known city and its distance, however far.
///
/// Ties keep the record that comes first in [`CITIES`].
pub fn nearest_city_with_distance(lat: f64, lon: f64) -> Option<(&'static CityRecord, f64)> {
    let mut best: Option<(&'static CityRecord, f64)> = None;
    for record in CITIES {
        let d = haversine_km(lat, lon, record.center_lat, record.center_lon);
        if best.map_or(true, |(_, best_d)| d < best_d) {
            best = Some((record, d));
        }
    }
    best
}

/// Returns the closest known city if it lies within `max_distance_km`.
pub fn nearest_known_city(lat: f64, lon: f64, max_distance_km: f64) -> Option<ResolvedCity> {
    nearest_city_with_distance(lat, lon)
        .filter(|(_, d)| *d <= max_distance_km)
        .map(|(record, _)| record.resolved())
}
