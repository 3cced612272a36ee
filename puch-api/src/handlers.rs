//! Tool handlers.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use axum::{extract::State, Json};
use tracing::info;

use puch_tools::movies::{self, BookingCard, MovieSuggestions, OttLinks};
use puch_tools::{MusicRequest, MusicResponse, ShowtimesPayload, ShowtimesQuery, TrendingResponse};
use puch_tools::weather::{CurrentWeather, DailyForecast};

use crate::dto::*;
use crate::error::ApiError;
use crate::state::AppState;

type Result<T> = std::result::Result<T, ApiError>;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Marks server start for uptime reporting.
pub(crate) fn mark_started() {
    START_TIME.get_or_init(Instant::now);
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVER
// ═══════════════════════════════════════════════════════════════════════════════

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(Instant::now);

    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_seconds: start.elapsed().as_secs(),
    })
}

/// GET /tools
pub async fn list_tools() -> Json<ToolListResponse> {
    Json(ToolListResponse {
        tools: TOOLS.to_vec(),
    })
}

/// POST /tools/validate
pub async fn validate(State(state): State<Arc<AppState>>) -> Json<String> {
    Json(state.config.my_number.clone())
}

// ═══════════════════════════════════════════════════════════════════════════════
// PREFERENCES
// ═══════════════════════════════════════════════════════════════════════════════

/// POST /tools/set_preferred_city
pub async fn set_preferred_city(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<SetPreferredCityRequest>,
) -> Result<Json<SetPreferredCityResponse>> {
    let city = state.prefs.set_preferred_city(&req.city).await?;
    info!(city = %city, "Saved preferred city");

    Ok(Json(SetPreferredCityResponse {
        status: "ok",
        message: format!("Saved preferred city as {city}."),
    }))
}

/// POST /tools/get_preferred_city
pub async fn get_preferred_city(State(state): State<Arc<AppState>>) -> Json<PreferredCityResponse> {
    Json(PreferredCityResponse {
        city: state.prefs.preferred_city().await,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// MOVIES
// ═══════════════════════════════════════════════════════════════════════════════

/// POST /tools/recommend_movies
pub async fn recommend_movies(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<RecommendMoviesRequest>,
) -> Result<Json<MovieSuggestions>> {
    req.validate()?;
    Ok(Json(state.movies.recommend_movies(req.limit)))
}

/// POST /tools/fetch_showtimes
pub async fn fetch_showtimes(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<FetchShowtimesRequest>,
) -> Result<Json<ShowtimesPayload>> {
    req.validate()?;
    let query = ShowtimesQuery::from(req);
    Ok(Json(state.movies.fetch_showtimes(&query).await))
}

/// POST /tools/quick_book
pub async fn quick_book(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<QuickBookRequest>,
) -> Json<ShowtimesPayload> {
    let query = ShowtimesQuery::from(req);
    Json(state.movies.quick_book(&query).await)
}

/// POST /tools/generate_booking_card
pub async fn generate_booking_card(ToolArgs(card): ToolArgs<BookingCard>) -> Json<BookingCardResponse> {
    Json(BookingCardResponse {
        share_text: movies::generate_booking_card(&card),
    })
}

/// POST /tools/ott_where_to_watch
pub async fn ott_where_to_watch(ToolArgs(req): ToolArgs<OttRequest>) -> Json<OttLinks> {
    Json(movies::ott_where_to_watch(&req.title))
}

// ═══════════════════════════════════════════════════════════════════════════════
// MUSIC, WEATHER & NEWS
// ═══════════════════════════════════════════════════════════════════════════════

/// POST /tools/music_vibe_recommendations and POST /tools/music
pub async fn music_recommendations(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<MusicVibeRequest>,
) -> Result<Json<MusicResponse>> {
    req.validate()?;
    let request = MusicRequest::from(req);
    let response = state.spotify.recommend(&request).await?;

    info!(
        vibe = %response.vibe,
        script = %response.dominant_script,
        tracks = response.tracks.len(),
        "Music recommendations ready"
    );
    Ok(Json(response))
}

/// POST /tools/weather_now
pub async fn weather_now(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<WeatherRequest>,
) -> Result<Json<CurrentWeather>> {
    let weather = state
        .weather
        .current(req.city.as_deref(), req.lat, req.lon)
        .await?;
    Ok(Json(weather))
}

/// POST /tools/weather_forecast
pub async fn weather_forecast(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<WeatherRequest>,
) -> Result<Json<DailyForecast>> {
    let forecast = state
        .weather
        .daily(req.city.as_deref(), req.lat, req.lon)
        .await?;
    Ok(Json(forecast))
}

/// POST /tools/trending_topics
pub async fn trending_topics(
    State(state): State<Arc<AppState>>,
    ToolArgs(req): ToolArgs<TrendingRequest>,
) -> Result<Json<TrendingResponse>> {
    req.validate()?;
    Ok(Json(state.news.trending(&req.region, req.limit).await?))
}

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG
// ═══════════════════════════════════════════════════════════════════════════════

const fn tool(
    name: &'static str,
    description: &'static str,
    use_when: Option<&'static str>,
) -> ToolInfo {
    ToolInfo {
        name,
        description,
        use_when,
    }
}

/// Every tool served under `/tools/`.
pub static TOOLS: &[ToolInfo] = &[
    tool("validate", "Returns the server owner's phone number.", None),
    tool(
        "set_preferred_city",
        "Set your preferred default city for bookings.",
        Some("User says 'set my city to X'."),
    ),
    tool(
        "get_preferred_city",
        "Get your saved preferred city, if any.",
        Some("Use before booking when city is not provided."),
    ),
    tool(
        "recommend_movies",
        "Light movie ideas (live booking handled via BMS/Paytm links).",
        Some("User asks for ideas; not essential for booking."),
    ),
    tool(
        "fetch_showtimes",
        "Book via BookMyShow + Paytm deeplinks. Uses nearest BMS city from lat/lon; else single normalized city; else city picker.",
        Some("User says 'book movie' or asks showtimes."),
    ),
    tool(
        "quick_book",
        "One-tap booking handoff. Provide zero/minimal info; shares BMS/Paytm links and city picker if needed.",
        Some("Default entry point for booking."),
    ),
    tool(
        "generate_booking_card",
        "Create a WhatsApp-friendly, shareable booking card (BMS + Paytm).",
        Some("After quick_book/fetch_showtimes."),
    ),
    tool(
        "ott_where_to_watch",
        "Find where to watch a title across OTTs (Netflix, Prime, Hotstar/JioCinema/etc.).",
        Some("User asks 'Where can I watch <title>?'"),
    ),
    tool(
        "music_vibe_recommendations",
        "Music recommendations by vibe. Dynamic Spotify genres, script biasing, and graceful fallbacks.",
        Some("User asks for songs for a mood/activity."),
    ),
    tool(
        "music",
        "Recommend songs by vibe/language keywords. Triggers: music, song(s), track(s), playlist(s), workout, gym, party, chill, focus, romance, bollywood, punjabi, tamil, telugu, hindi, k-pop.",
        Some("User asks for songs/music/playlists or names a mood/language/genre (e.g., 'workout tamil songs')."),
    ),
    tool("weather_now", "Current weather by city or lat/lon (Open-Meteo).", None),
    tool("weather_forecast", "3-day forecast by city or lat/lon (Open-Meteo).", None),
    tool(
        "trending_topics",
        "Trending topics in India (free headlines approximation).",
        None,
    ),
];
