//! DTOs for tool arguments and responses.
//!
//! Argument structs reject unknown fields, except the booking card, which
//! accepts whatever `fetch_showtimes` returned.

use axum::extract::FromRequest;
use serde::{Deserialize, Serialize};

use puch_core::constants::{MAX_HEADLINES, MAX_MOVIE_SUGGESTIONS, MAX_TRACKS};
use puch_core::error::{PuchError, Result};
use puch_tools::{MusicRequest, ShowtimesQuery};

use crate::error::ApiError;

/// JSON tool arguments; malformed bodies become validation errors.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ToolArgs<T>(pub T);

fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PuchError::Validation(format!(
            "{field} must be between {min} and {max}, got {value}"
        )))
    }
}

fn default_movie_limit() -> u32 {
    5
}

fn default_radius_km() -> i64 {
    20
}

fn default_track_limit() -> u32 {
    10
}

fn default_headline_limit() -> u32 {
    10
}

fn default_region() -> String {
    "IN".into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREFERENCES
// ═══════════════════════════════════════════════════════════════════════════════

/// Arguments of `set_preferred_city`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetPreferredCityRequest {
    /// City name, e.g. "Bengaluru"
    pub city: String,
}

/// Result of `set_preferred_city`.
#[derive(Debug, Serialize)]
pub struct SetPreferredCityResponse {
    /// Always "ok"
    pub status: &'static str,
    /// Confirmation text
    pub message: String,
}

/// Result of `get_preferred_city`.
#[derive(Debug, Serialize)]
pub struct PreferredCityResponse {
    /// Saved city, if any
    pub city: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MOVIES
// ═══════════════════════════════════════════════════════════════════════════════

/// Arguments of `recommend_movies`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecommendMoviesRequest {
    /// City
    pub city: Option<String>,
    /// Preferred language
    pub language: Option<String>,
    /// Genre(s)
    pub genre: Option<String>,
    /// How many suggestions, 1 to 10
    #[serde(default = "default_movie_limit")]
    pub limit: u32,
}

impl RecommendMoviesRequest {
    /// Checks bounds.
    pub fn validate(&self) -> Result<()> {
        check_range("limit", self.limit, 1, MAX_MOVIE_SUGGESTIONS)
    }
}

/// Arguments of `fetch_showtimes`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FetchShowtimesRequest {
    /// City, optional if lat/lon provided
    pub city: Option<String>,
    /// Movie title; browse everything when absent
    pub movie_title: Option<String>,
    /// YYYY-MM-DD; today when absent
    pub date: Option<String>,
    /// Search radius; accepted but unused
    #[serde(default = "default_radius_km")]
    pub radius_km: i64,
    /// Latitude
    pub lat: Option<f64>,
    /// Longitude
    pub lon: Option<f64>,
}

impl FetchShowtimesRequest {
    /// Checks bounds.
    pub fn validate(&self) -> Result<()> {
        if self.radius_km < 1 {
            return Err(PuchError::Validation(format!(
                "radius_km must be at least 1, got {}",
                self.radius_km
            )));
        }
        Ok(())
    }
}

impl From<FetchShowtimesRequest> for ShowtimesQuery {
    fn from(req: FetchShowtimesRequest) -> Self {
        Self {
            city: req.city,
            movie_title: req.movie_title,
            date: req.date,
            lat: req.lat,
            lon: req.lon,
        }
    }
}

/// Arguments of `quick_book`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuickBookRequest {
    /// Movie name
    pub movie_title: Option<String>,
    /// YYYY-MM-DD; today when absent
    pub date: Option<String>,
    /// City, optional if lat/lon provided
    pub city: Option<String>,
    /// Latitude
    pub lat: Option<f64>,
    /// Longitude
    pub lon: Option<f64>,
}

impl From<QuickBookRequest> for ShowtimesQuery {
    fn from(req: QuickBookRequest) -> Self {
        Self {
            city: req.city,
            movie_title: req.movie_title,
            date: req.date,
            lat: req.lat,
            lon: req.lon,
        }
    }
}

/// Result of `generate_booking_card`.
#[derive(Debug, Serialize)]
pub struct BookingCardResponse {
    /// Ready-to-forward text
    pub share_text: String,
}

/// Arguments of `ott_where_to_watch`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OttRequest {
    /// Movie or series title
    pub title: String,
    /// Language; accepted but unused
    pub language: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// MUSIC
// ═══════════════════════════════════════════════════════════════════════════════

/// Arguments of `music_vibe_recommendations` and `music`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MusicVibeRequest {
    /// Mood or activity, e.g. chill, workout, focus, party
    pub vibe: String,
    /// Hint word like "bollywood", "punjabi", "tamil"
    pub language: Option<String>,
    /// How many tracks, 1 to 50
    #[serde(default = "default_track_limit")]
    pub limit: u32,
    /// Original user message for script and genre hints
    pub user_text: Option<String>,
}

impl MusicVibeRequest {
    /// Checks bounds.
    pub fn validate(&self) -> Result<()> {
        check_range("limit", self.limit, 1, MAX_TRACKS)
    }
}

impl From<MusicVibeRequest> for MusicRequest {
    fn from(req: MusicVibeRequest) -> Self {
        Self {
            vibe: req.vibe,
            language: req.language,
            limit: req.limit,
            user_text: req.user_text,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WEATHER & NEWS
// ═══════════════════════════════════════════════════════════════════════════════

/// Arguments of `weather_now` and `weather_forecast`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherRequest {
    /// City
    pub city: Option<String>,
    /// Latitude
    pub lat: Option<f64>,
    /// Longitude
    pub lon: Option<f64>,
}

/// Arguments of `trending_topics`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrendingRequest {
    /// Region code
    #[serde(default = "default_region")]
    pub region: String,
    /// Items to return, 1 to 20
    #[serde(default = "default_headline_limit")]
    pub limit: u32,
}

impl TrendingRequest {
    /// Checks bounds.
    pub fn validate(&self) -> Result<()> {
        check_range("limit", self.limit, 1, MAX_HEADLINES)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER
// ═══════════════════════════════════════════════════════════════════════════════

/// One entry of the tool listing.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Route name under `/tools/`
    pub name: &'static str,
    /// What the tool does
    pub description: &'static str,
    /// When a caller should pick it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_when: Option<&'static str>,
}

/// Response for the tool listing.
#[derive(Debug, Serialize)]
pub struct ToolListResponse {
    /// Available tools
    pub tools: Vec<ToolInfo>,
}

/// Response for health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status
    pub status: String,
    /// Version
    pub version: String,
    /// Uptime in seconds
    pub uptime_seconds: u64,
}
