//! # Puch Tools
//!
//! Adapters behind every callable tool. Each one validates its arguments,
//! calls a third-party HTTP API (or none, for link builders) and reshapes the
//! answer into a small JSON-friendly payload.
//!
//! - [`nominatim`]: OpenStreetMap geocoding, forward and reverse
//! - [`movies`]: BookMyShow/Paytm booking links, share cards, OTT search links
//! - [`music`]: Spotify vibe recommendations with script biasing
//! - [`weather`]: Open-Meteo current conditions and 3-day forecast
//! - [`trending`]: Google News headlines
//! - [`prefs`]: the on-disk preferred-city store
//!
//! Every HTTP client takes a config struct whose base URLs default to the
//! public endpoints, so tests can point them at a local mock server.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod http;
pub mod links;
pub mod movies;
pub mod music;
pub mod nominatim;
pub mod prefs;
pub mod trending;
pub mod weather;

pub use movies::{MovieTools, ShowtimeItem, ShowtimesPayload, ShowtimesQuery};
pub use music::{MusicRequest, MusicResponse, SpotifyClient, SpotifyConfig};
pub use nominatim::{NominatimClient, NominatimConfig};
pub use prefs::PrefsStore;
pub use trending::{NewsClient, NewsConfig, TrendingResponse};
pub use weather::{WeatherClient, WeatherConfig};
