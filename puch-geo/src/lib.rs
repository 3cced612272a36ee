//! # Puch Geo
//!
//! Turns a free-text city or a latitude/longitude pair into a normalized city.
//!
//! - [`normalize_city`] maps names and aliases ("bombay", "Bangalore") onto the
//!   known-city table and title-cases anything else.
//! - [`nearest_known_city`] snaps a coordinate to the closest known city
//!   center within a radius (haversine distance).
//! - [`GeoResolver`] combines both with a reverse-geocoding collaborator,
//!   caching its hits.
//!
//! ## Example
//!
//! ```rust
//! use puch_geo::{nearest_known_city, normalize_city};
//!
//! let city = normalize_city(Some("Bombay")).unwrap();
//! assert_eq!(city.display_name, "Mumbai");
//!
//! let near = nearest_known_city(12.9716, 77.5946, 75.0).unwrap();
//! assert_eq!(near.slug.as_deref(), Some("bengaluru"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cities;
mod nearest;
mod normalize;
mod resolver;

pub use cities::{find_city, CityRecord, CITIES, POPULAR_CITIES};
pub use nearest::{haversine_km, nearest_city_with_distance, nearest_known_city};
pub use normalize::{normalize_city, title_case};
pub use resolver::{GeoResolver, ResolverConfig};
