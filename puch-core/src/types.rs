//! Domain types shared across crates.

use serde::{Deserialize, Serialize};

/// Outcome of geo resolution.
///
/// `slug` is present only when the input matched a known city; otherwise the
/// display name is the caller's own text, tidied up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCity {
    /// Human-readable city name.
    pub display_name: String,
    /// Catalog identifier used in booking URLs.
    pub slug: Option<String>,
}

impl ResolvedCity {
    /// A city found in the known-city table.
    pub fn known(display_name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            slug: Some(slug.into()),
        }
    }

    /// A free-text city that maps to no catalog entry.
    pub fn unmapped(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            slug: None,
        }
    }

    /// Returns true if the city carries a catalog slug.
    pub fn is_known(&self) -> bool {
        self.slug.is_some()
    }
}

/// A geocoded point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Place label returned by the geocoder, if any.
    pub label: Option<String>,
}

impl GeoPoint {
    /// Creates an unlabelled point.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, label: None }
    }

    /// Attaches a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label if present, else `"lat,lon"`.
    ///
    /// Whole-number coordinates keep their decimal point (`13.0,77.0`).
    pub fn describe(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{:?},{:?}", self.lat, self.lon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_city_constructors() {
        let known = ResolvedCity::known("Mumbai", "mumbai");
        assert!(known.is_known());
        assert_eq!(known.slug.as_deref(), Some("mumbai"));

        let free = ResolvedCity::unmapped("Timbuktu");
        assert!(!free.is_known());
        assert_eq!(free.display_name, "Timbuktu");
    }

    #[test]
    fn test_resolved_city_serializes_absent_slug_as_null() {
        let json = serde_json::to_value(ResolvedCity::unmapped("Goa")).unwrap();
        assert_eq!(json["slug"], serde_json::Value::Null);
    }

    #[test]
    fn test_geo_point_describe() {
        assert_eq!(GeoPoint::new(12.5, 77.25).describe(), "12.5,77.25");
        assert_eq!(GeoPoint::new(13.0, 77.0).describe(), "13.0,77.0");
        assert_eq!(GeoPoint::new(-33.0, 151.2).describe(), "-33.0,151.2");
        assert_eq!(
            GeoPoint::new(12.5, 77.25).with_label("Bengaluru").describe(),
            "Bengaluru"
        );
    }
}
