//! Collaborator traits.
//!
//! Geocoding services are unreliable network dependencies. Implementations
//! absorb transport errors and report them as `None`, so callers only ever
//! see "found" or "not found".

use async_trait::async_trait;

use crate::types::GeoPoint;

// ═══════════════════════════════════════════════════════════════════════════════
// GEOCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Maps coordinates to a free-text place name.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    /// Returns the city (or town, municipality, county) at the given point.
    async fn city_at(&self, lat: f64, lon: f64) -> Option<String>;
}

/// Maps a free-text place name to coordinates.
#[async_trait]
pub trait ForwardGeocoder: Send + Sync {
    /// Returns the best match for `query`.
    async fn locate(&self, query: &str) -> Option<GeoPoint>;
}

/// A reverse geocoder that never finds anything.
///
/// Useful when no network collaborator is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoReverseGeocoder;

#[async_trait]
impl ReverseGeocoder for NoReverseGeocoder {
    async fn city_at(&self, _lat: f64, _lon: f64) -> Option<String> {
        None
    }
}
