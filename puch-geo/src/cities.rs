//! Known-city table.
//!
//! Every record is a BookMyShow city: canonical display name, catalog slug,
//! lookup aliases (already normalized: lowercase `a-z` words separated by
//! single spaces) and the city center.

use puch_core::types::ResolvedCity;

/// Static reference data for one known city.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityRecord {
    /// Display name, e.g. "Delhi-NCR".
    pub canonical_name: &'static str,
    /// Catalog slug, e.g. "delhi".
    pub slug: &'static str,
    /// Normalized names that resolve to this city, besides the slug.
    pub aliases: &'static [&'static str],
    /// Latitude of the city center.
    pub center_lat: f64,
    /// Longitude of the city center.
    pub center_lon: f64,
}

impl CityRecord {
    /// Returns true if `key` (normalized) names this city.
    pub fn matches(&self, key: &str) -> bool {
        self.slug == key || self.aliases.contains(&key)
    }

    /// The resolution result for this record.
    pub fn resolved(&self) -> ResolvedCity {
        ResolvedCity::known(self.canonical_name, self.slug)
    }
}

const fn city(
    canonical_name: &'static str,
    slug: &'static str,
    aliases: &'static [&'static str],
    center_lat: f64,
    center_lon: f64,
) -> CityRecord {
    CityRecord {
        canonical_name,
        slug,
        aliases,
        center_lat,
        center_lon,
    }
}

/// All known cities. Order matters for nearest-city ties: first wins.
pub static CITIES: &[CityRecord] = &[
    city("Mumbai", "mumbai", &["bombay"], 19.0760, 72.8777),
    city("Delhi-NCR", "delhi", &["new delhi", "ncr", "delhi ncr"], 28.6139, 77.2090),
    city("Bengaluru", "bengaluru", &["bangalore"], 12.9716, 77.5946),
    city("Chennai", "chennai", &["madras"], 13.0827, 80.2707),
    city("Hyderabad", "hyderabad", &[], 17.3850, 78.4867),
    city("Pune", "pune", &["poona"], 18.5204, 73.8567),
    city("Kolkata", "kolkata", &["calcutta"], 22.5726, 88.3639),
    city("Ahmedabad", "ahmedabad", &[], 23.0225, 72.5714),
    city("Kochi", "kochi", &["cochin"], 9.9312, 76.2673),
    city("Jaipur", "jaipur", &[], 26.9124, 75.7873),
    city("Surat", "surat", &[], 21.1702, 72.8311),
    city("Lucknow", "lucknow", &[], 26.8467, 80.9462),
    city("Coimbatore", "coimbatore", &[], 11.0168, 76.9558),
    city("Indore", "indore", &[], 22.7196, 75.8577),
    city("Bhopal", "bhopal", &[], 23.2599, 77.4126),
    city("Visakhapatnam", "visakhapatnam", &["vizag"], 17.6868, 83.2185),
    city("Tiruchirappalli", "tiruchirappalli", &["trichy"], 10.7905, 78.7047),
    city("Madurai", "madurai", &[], 9.9252, 78.1198),
    city("Nagpur", "nagpur", &[], 21.1458, 79.0882),
    city("Chandigarh", "chandigarh", &[], 30.7333, 76.7794),
    city("Mysuru", "mysuru", &["mysore"], 12.2958, 76.6394),
];

/// Slugs offered in the city picker when no city could be resolved.
pub static POPULAR_CITIES: &[&str] = &[
    "mumbai",
    "delhi",
    "bengaluru",
    "chennai",
    "hyderabad",
    "pune",
    "kolkata",
    "ahmedabad",
];

/// Looks up a normalized key among slugs and aliases.
pub fn find_city(key: &str) -> Option<&'static CityRecord> {
    CITIES.iter().find(|c| c.matches(key))
}
