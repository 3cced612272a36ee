//! Shared constants for Puch tools.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// GEO RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default radius within which a coordinate snaps to a known city.
pub const DEFAULT_NEAREST_CITY_KM: f64 = 75.0;

/// How long a reverse-geocoded city name stays fresh.
pub const REVERSE_GEOCODE_TTL: Duration = Duration::from_secs(3600);

// ═══════════════════════════════════════════════════════════════════════════════
// MUSIC
// ═══════════════════════════════════════════════════════════════════════════════

/// Freshness window for a Spotify client-credentials token.
/// Spotify tokens live 3600 s; refresh ahead of expiry.
pub const SPOTIFY_TOKEN_TTL: Duration = Duration::from_secs(3000);

/// Freshness window for the available genre seed list.
pub const GENRE_SEEDS_TTL: Duration = Duration::from_secs(24 * 3600);

/// Market passed to every Spotify call.
pub const SPOTIFY_MARKET: &str = "IN";

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Default bound on cache entries.
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;

/// Longest TTL any caller applies; entries older than this are swept when full.
pub const CACHE_SWEEP_TTL: Duration = GENRE_SEEDS_TTL;

// ═══════════════════════════════════════════════════════════════════════════════
// NETWORK
// ═══════════════════════════════════════════════════════════════════════════════

/// Default timeout for geocoding, weather and news calls, in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 8;

/// Timeout for Spotify calls, in seconds.
pub const SPOTIFY_HTTP_TIMEOUT_SECS: u64 = 12;

/// User agent sent to Nominatim, which rejects anonymous clients.
pub const USER_AGENT: &str = concat!("PuchTools/", env!("CARGO_PKG_VERSION"), " (tool server)");

// ═══════════════════════════════════════════════════════════════════════════════
// TOOL LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum movie suggestions.
pub const MAX_MOVIE_SUGGESTIONS: u32 = 10;

/// Maximum tracks per music request.
pub const MAX_TRACKS: u32 = 50;

/// Maximum trending headlines.
pub const MAX_HEADLINES: u32 = 20;
