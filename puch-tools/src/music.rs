//! Music recommendations by vibe, via the Spotify Web API.
//!
//! The pipeline:
//! 1. client-credentials token (cached)
//! 2. dominant script of the user's words
//! 3. search queries from language hint, vibe, quoted phrases and Latin words
//! 4. seed tracks from search, script matches first
//! 5. genre seeds when no track seeds were found
//! 6. recommendations tuned by the vibe
//! 7. script-matching tracks first, the rest as backfill

use std::collections::HashSet;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use puch_cache::TtlCache;
use puch_core::constants::{
    GENRE_SEEDS_TTL, MAX_TRACKS, SPOTIFY_HTTP_TIMEOUT_SECS, SPOTIFY_MARKET, SPOTIFY_TOKEN_TTL,
};
use puch_core::error::{PuchError, Result};
use puch_script::{dominant_script, script_matcher, ScriptLabel};

use crate::http::{build_client, endpoint, ensure_success, transport_error};
use crate::links::quote;

const SERVICE: &str = "Spotify";
const TOKEN_KEY: &str = "spotify_token";
const GENRES_KEY: &str = "genre_seeds";
const SEARCH_LIMIT: &str = "15";
const MAX_SEEDS: usize = 5;
const FALLBACK_GENRES: &[&str] = &["pop", "rock", "indie", "electronic", "dance"];
const COMMON_GENRES: &[&str] = &["pop", "indie", "rock", "electronic", "dance"];
const COMMON_GENRE_COUNT: usize = 3;
const DEFAULT_VIBE: &str = "chill";
const STEERING_HINT: &str = "You can add words like 'bollywood', 'punjabi', 'tamil', 'telugu', 'k-pop' or pass language='...' to steer results.";

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

/// Spotify client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpotifyConfig {
    /// App client id
    pub client_id: Option<String>,
    /// App client secret
    pub client_secret: Option<String>,
    /// Accounts service root (token endpoint)
    pub accounts_url: String,
    /// Web API root
    pub api_url: String,
    /// Market code sent with every catalog call
    pub market: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            accounts_url: "https://accounts.spotify.com".into(),
            api_url: "https://api.spotify.com".into(),
            market: SPOTIFY_MARKET.into(),
            timeout_seconds: SPOTIFY_HTTP_TIMEOUT_SECS,
        }
    }
}

impl SpotifyConfig {
    /// Sets the app credentials.
    pub fn with_credentials(mut self, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// Points both roots at one server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.accounts_url = base_url.clone();
        self.api_url = base_url;
        self
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let id = self.client_id.as_deref().filter(|s| !s.is_empty())?;
        let secret = self.client_secret.as_deref().filter(|s| !s.is_empty())?;
        Some((id, secret))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REQUEST / RESPONSE
// ═══════════════════════════════════════════════════════════════════════════════

/// A vibe recommendation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MusicRequest {
    /// Mood or activity, e.g. "workout"
    pub vibe: String,
    /// Hint word such as "bollywood" or "tamil"
    pub language: Option<String>,
    /// Tracks wanted, 1 to 50
    pub limit: u32,
    /// The user's original message
    pub user_text: Option<String>,
}

/// One recommended track with listening and search links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrackLinks {
    /// Track name
    pub title: String,
    /// Comma-separated artist names
    pub artists: String,
    /// Spotify link
    pub spotify: String,
    /// Apple Music search link
    pub apple_music_search: String,
    /// JioSaavn search link
    pub jiosaavn_search: String,
    /// YouTube search link
    pub youtube: String,
}

/// Recommendation result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MusicResponse {
    /// Vibe used
    pub vibe: String,
    /// Language hint, if one was given
    pub language_hint: Option<String>,
    /// Script the ranking favoured
    pub dominant_script: ScriptLabel,
    /// Track ids used as seeds
    pub used_seed_tracks: Vec<String>,
    /// Genres used as seeds
    pub used_genre_seeds: Vec<String>,
    /// Recommended tracks
    pub tracks: Vec<TrackLinks>,
    /// Set when the result is degraded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// How to steer results
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<TrackPage>,
}

#[derive(Debug, Default, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<Track>,
}

#[derive(Debug, Default, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    tracks: Vec<Track>,
}

#[derive(Debug, Default, Deserialize)]
struct GenresResponse {
    #[serde(default)]
    genres: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Track {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    artists: Vec<Artist>,
    #[serde(default)]
    external_urls: Option<ExternalUrls>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct Artist {
    #[serde(default)]
    name: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

impl Track {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn links(&self) -> TrackLinks {
        let name = self.name();
        let artists = self.artist_names();
        let q = if name.is_empty() && artists.is_empty() {
            "music".to_string()
        } else {
            quote(&format!("{name} {artists}"))
        };
        let spotify = self
            .external_urls
            .as_ref()
            .and_then(|u| u.spotify.clone())
            .unwrap_or_else(|| "https://open.spotify.com/".into());

        TrackLinks {
            title: if name.is_empty() { "Track".into() } else { name.to_string() },
            artists: if artists.is_empty() { "—".into() } else { artists },
            spotify,
            apple_music_search: format!("https://music.apple.com/in/search?term={q}"),
            jiosaavn_search: format!("https://www.jiosaavn.com/search/{q}"),
            youtube: format!("https://www.youtube.com/results?search_query={q}"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VIBE TUNING
// ═══════════════════════════════════════════════════════════════════════════════

/// Coarse audio-feature targets for a vibe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AudioTargets {
    /// Musical positiveness, 0 to 1
    pub valence: f64,
    /// Intensity, 0 to 1
    pub energy: f64,
    /// Lower bound on instrumentalness
    pub min_instrumentalness: Option<f64>,
    /// Lower bound on danceability
    pub min_danceability: Option<f64>,
}

impl AudioTargets {
    const fn new(valence: f64, energy: f64) -> Self {
        Self {
            valence,
            energy,
            min_instrumentalness: None,
            min_danceability: None,
        }
    }

    /// Targets for a vibe; first matching keyword wins.
    pub fn for_vibe(vibe: &str) -> Self {
        let v = vibe.to_lowercase();
        if v.contains("chill") {
            Self::new(0.5, 0.3)
        } else if v.contains("focus") {
            Self {
                min_instrumentalness: Some(0.5),
                ..Self::new(0.3, 0.2)
            }
        } else if v.contains("workout") || v.contains("gym") {
            Self::new(0.6, 0.8)
        } else if v.contains("party") {
            Self {
                min_danceability: Some(0.6),
                ..Self::new(0.8, 0.8)
            }
        } else if v.contains("romance") || v.contains("love") {
            Self::new(0.7, 0.4)
        } else {
            Self::new(0.5, 0.5)
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("target_valence", self.valence.to_string()),
            ("target_energy", self.energy.to_string()),
        ];
        if let Some(v) = self.min_instrumentalness {
            pairs.push(("min_instrumentalness", v.to_string()));
        }
        if let Some(v) = self.min_danceability {
            pairs.push(("min_danceability", v.to_string()));
        }
        pairs
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// QUERY BUILDING
// ═══════════════════════════════════════════════════════════════════════════════

/// Words made of ASCII letters, `+` and `-`, starting with a letter.
pub fn latin_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        let continues = ch.is_ascii_alphabetic() || (!current.is_empty() && (ch == '+' || ch == '-'));
        if continues {
            current.push(ch);
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Non-empty phrases enclosed in double quotes, scanned left to right.
///
/// An empty pair `""` does not consume its closing quote, which may open
/// the next phrase.
pub fn quoted_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find('"') {
        let after = &rest[open + 1..];
        match after.find('"') {
            Some(0) => rest = after,
            Some(close) => {
                phrases.push(after[..close].to_string());
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    phrases
}

/// Search queries, most specific first.
pub fn build_queries(vibe: &str, language: Option<&str>, user_text: &str) -> Vec<String> {
    let mut queries = Vec::new();
    if let Some(language) = language {
        queries.push(format!("{language} {vibe}"));
        queries.push(language.to_string());
    }
    queries.push(vibe.to_string());
    queries.extend(quoted_phrases(user_text));

    let tokens = latin_tokens(user_text).join(" ");
    if !tokens.is_empty() && !queries.iter().any(|q| q.eq_ignore_ascii_case(&tokens)) {
        queries.push(tokens);
    }
    queries
}

/// Picks up to five genre seeds matching the user's words.
///
/// Falls back to common genres (at most three) and then to the head of the
/// available list.
pub fn pick_genre_seeds(available: &[String], user_text: &str, language: Option<&str>) -> Vec<String> {
    let tokens: HashSet<String> = [user_text, language.unwrap_or("")]
        .iter()
        .flat_map(|src| latin_tokens(&src.to_lowercase()))
        .collect();

    let mut matched: Vec<String> = available
        .iter()
        .filter(|g| {
            let g = g.to_lowercase();
            tokens.iter().any(|t| g.contains(t.as_str()))
        })
        .cloned()
        .collect();

    if matched.is_empty() {
        let common: Vec<String> = COMMON_GENRES
            .iter()
            .filter(|c| available.iter().any(|g| g.as_str() == **c))
            .map(|c| c.to_string())
            .collect();
        let source = if common.is_empty() { available } else { &common[..] };
        matched = source.iter().take(COMMON_GENRE_COUNT).cloned().collect();
    }

    matched.truncate(MAX_SEEDS);
    matched
}

/// Script-matching tracks first, the rest as backfill, `limit` in total.
fn rank_tracks(items: &[Track], script: ScriptLabel, limit: usize) -> Vec<TrackLinks> {
    let prefers = script_matcher(script);
    let mut filtered = Vec::new();
    let mut backfill = Vec::new();

    for track in items {
        let links = track.links();
        if prefers(track.name()) || prefers(&track.artist_names()) {
            filtered.push(links);
        } else {
            backfill.push(links);
        }
        if filtered.len() >= limit {
            break;
        }
    }

    filtered.extend(backfill);
    filtered.truncate(limit);
    filtered
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Spotify Web API client.
pub struct SpotifyClient {
    config: SpotifyConfig,
    http_client: reqwest::Client,
    tokens: TtlCache<String>,
    genres: TtlCache<Vec<String>>,
}

impl SpotifyClient {
    /// Creates a client with the given config.
    pub fn with_config(config: SpotifyConfig) -> Result<Self> {
        let http_client = build_client(config.timeout_seconds)?;
        Ok(Self {
            config,
            http_client,
            tokens: TtlCache::new(),
            genres: TtlCache::new(),
        })
    }

    /// Returns true if client credentials are configured.
    pub fn has_credentials(&self) -> bool {
        self.config.credentials().is_some()
    }

    /// Returns a client-credentials access token, cached for
    /// [`SPOTIFY_TOKEN_TTL`].
    #[instrument(skip(self))]
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.tokens.get(TOKEN_KEY, SPOTIFY_TOKEN_TTL) {
            return Ok(token);
        }

        let (id, secret) = self.config.credentials().ok_or_else(|| PuchError::MissingCredentials {
            service: SERVICE.into(),
            variables: "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET".into(),
        })?;

        let response = self
            .http_client
            .post(endpoint(&self.config.accounts_url, "api/token"))
            .basic_auth(id, Some(secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let body: TokenResponse = ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let token = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PuchError::upstream(SERVICE, "token response had no access_token"))?;

        self.tokens.set(TOKEN_KEY, token.clone());
        debug!("Fetched Spotify access token");
        Ok(token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .http_client
            .get(endpoint(&self.config.api_url, path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(|e| transport_error(SERVICE, e))
    }

    /// Available genre seeds, cached for [`GENRE_SEEDS_TTL`].
    pub async fn available_genre_seeds(&self, token: &str) -> Result<Vec<String>> {
        if let Some(genres) = self.genres.get(GENRES_KEY, GENRE_SEEDS_TTL) {
            return Ok(genres);
        }
        let body: GenresResponse = self
            .get_json(token, "v1/recommendations/available-genre-seeds", &[])
            .await?;
        self.genres.set(GENRES_KEY, body.genres.clone());
        Ok(body.genres)
    }

    /// Up to five distinct seed track ids across `queries`.
    ///
    /// Results of each search are ordered script match first, then longer
    /// name-plus-artists strings first. A failed search is skipped.
    async fn search_seed_tracks(&self, token: &str, queries: &[String], script: ScriptLabel) -> Vec<String> {
        let prefers = script_matcher(script);
        let mut seen = HashSet::new();
        let mut seeds = Vec::new();

        for q in queries.iter().filter(|q| !q.trim().is_empty()) {
            let params = [
                ("q", q.clone()),
                ("type", "track".to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
                ("market", self.config.market.clone()),
            ];
            let mut items = match self.get_json::<SearchResponse>(token, "v1/search", &params).await {
                Ok(body) => body.tracks.unwrap_or_default().items,
                Err(e) => {
                    warn!(error = %e, query = %q, "Spotify search failed");
                    continue;
                }
            };

            items.sort_by_cached_key(|item| {
                let s = format!("{} {}", item.name(), item.artist_names());
                std::cmp::Reverse((prefers(&s), s.chars().count()))
            });

            for id in items.into_iter().filter_map(|item| item.id) {
                if seen.insert(id.clone()) {
                    seeds.push(id);
                    if seeds.len() >= MAX_SEEDS {
                        return seeds;
                    }
                }
            }
        }
        seeds
    }

    async fn recommendations(&self, token: &str, params: &[(&str, String)]) -> Result<Vec<Track>> {
        let body: RecommendationsResponse = self.get_json(token, "v1/recommendations", params).await?;
        Ok(body.tracks)
    }

    async fn track(&self, token: &str, id: &str) -> Result<Track> {
        self.get_json(token, &format!("v1/tracks/{id}"), &[("market", self.config.market.clone())])
            .await
    }

    /// Runs the full recommendation pipeline.
    #[instrument(skip(self))]
    pub async fn recommend(&self, request: &MusicRequest) -> Result<MusicResponse> {
        let token = self.access_token().await?;

        let vibe = Some(request.vibe.trim())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VIBE)
            .to_string();
        let language = request
            .language
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty());
        let user_text = request.user_text.as_deref().unwrap_or("");
        let limit = request.limit.clamp(1, MAX_TRACKS) as usize;

        let script_source = if user_text.is_empty() { language } else { Some(user_text) };
        let script = dominant_script(script_source);

        let queries = build_queries(&vibe, language, user_text);
        let seed_tracks = self.search_seed_tracks(&token, &queries, script).await;

        let rec_limit = (limit * 3).clamp(10, MAX_TRACKS as usize);
        let mut params = vec![
            ("limit", rec_limit.to_string()),
            ("market", self.config.market.clone()),
        ];

        let mut used_genre_seeds = Vec::new();
        if seed_tracks.is_empty() {
            let available = match self.available_genre_seeds(&token).await {
                Ok(genres) => genres,
                Err(e) => {
                    warn!(error = %e, "Genre seeds unavailable; using fallback list");
                    FALLBACK_GENRES.iter().map(|g| g.to_string()).collect()
                }
            };
            used_genre_seeds = pick_genre_seeds(&available, user_text, language);
            params.push(("seed_genres", used_genre_seeds.join(",")));
        } else {
            params.push(("seed_tracks", seed_tracks.join(",")));
        }
        params.extend(AudioTargets::for_vibe(&vibe).query_pairs());

        let mut response = MusicResponse {
            vibe,
            language_hint: language.map(str::to_string),
            dominant_script: script,
            used_seed_tracks: seed_tracks,
            used_genre_seeds,
            tracks: Vec::new(),
            note: None,
            hint: None,
        };

        match self.recommendations(&token, &params).await {
            Ok(items) => {
                response.tracks = rank_tracks(&items, script, limit);
                response.hint = Some(STEERING_HINT.into());
                info!(tracks = response.tracks.len(), %script, "Recommendations ready");
            }
            Err(e) if !response.used_seed_tracks.is_empty() => {
                warn!(error = %e, "Recommendations failed; returning seed tracks");
                response.tracks = self
                    .seed_track_links(&token, &response.used_seed_tracks, limit)
                    .await;
                response.note = Some(format!(
                    "Spotify recommendations errored: {e}. Returned seed tracks instead."
                ));
            }
            Err(e) => {
                return Err(PuchError::upstream(SERVICE, format!("recommendations failed: {e}")));
            }
        }

        Ok(response)
    }

    async fn seed_track_links(&self, token: &str, ids: &[String], limit: usize) -> Vec<TrackLinks> {
        let fetches = ids.iter().take(limit).map(|id| self.track(token, id));
        join_all(fetches)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(track) => Some(track.links()),
                Err(e) => {
                    debug!(error = %e, "Skipping seed track");
                    None
                }
            })
            .collect()
    }

    /// Drops cached tokens and genres.
    pub fn clear_cache(&self) {
        self.tokens.clear();
        self.genres.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn track(id: &str, name: &str, artist: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "artists": [{ "name": artist }],
            "external_urls": { "spotify": format!("https://open.spotify.com/track/{id}") }
        })
    }

    fn request(vibe: &str, language: Option<&str>, limit: u32, user_text: Option<&str>) -> MusicRequest {
        MusicRequest {
            vibe: vibe.into(),
            language: language.map(str::to_string),
            limit,
            user_text: user_text.map(str::to_string),
        }
    }

    async fn mount_token(server: &MockServer, times: u64) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok", "token_type": "Bearer", "expires_in": 3600
            })))
            .expect(times)
            .mount(server)
            .await;
    }

    fn client_for(server: &MockServer) -> SpotifyClient {
        SpotifyClient::with_config(
            SpotifyConfig::default()
                .with_credentials("id", "secret")
                .with_base_url(server.uri()),
        )
        .unwrap()
    }

    // ── pure helpers ────────────────────────────────────────────────────────

    #[test_case("chill evening", 0.5, 0.3 ; "chill")]
    #[test_case("Deep FOCUS", 0.3, 0.2 ; "focus")]
    #[test_case("gym", 0.6, 0.8 ; "gym")]
    #[test_case("party", 0.8, 0.8 ; "party")]
    #[test_case("love songs", 0.7, 0.4 ; "love")]
    #[test_case("rainy day", 0.5, 0.5 ; "default")]
    fn test_vibe_targets(vibe: &str, valence: f64, energy: f64) {
        let t = AudioTargets::for_vibe(vibe);
        assert_eq!((t.valence, t.energy), (valence, energy));
    }

    #[test]
    fn test_vibe_bounds() {
        assert_eq!(AudioTargets::for_vibe("focus").min_instrumentalness, Some(0.5));
        assert_eq!(AudioTargets::for_vibe("party").min_danceability, Some(0.6));
        let pairs = AudioTargets::for_vibe("party").query_pairs();
        assert!(pairs.contains(&("min_danceability", "0.6".to_string())));
        assert!(pairs.contains(&("target_valence", "0.8".to_string())));
    }

    #[test]
    fn test_latin_tokens() {
        assert_eq!(latin_tokens("play k-pop & AC+DC 2024!"), ["play", "k-pop", "AC+DC"]);
        assert_eq!(latin_tokens("-x +y"), ["x", "y"]);
        assert!(latin_tokens("नमस्ते 123").is_empty());
    }

    #[test]
    fn test_quoted_phrases() {
        assert_eq!(quoted_phrases(r#"play "Kesariya" and "Tum Hi Ho""#), ["Kesariya", "Tum Hi Ho"]);
        assert!(quoted_phrases(r#"unterminated "phrase"#).is_empty());
        assert!(quoted_phrases(r#"empty """#).is_empty());
    }

    #[test]
    fn test_quoted_phrases_after_empty_pair() {
        // The second quote of an empty pair opens the next phrase.
        assert_eq!(quoted_phrases(r#""" "x""#), [" "]);
        assert_eq!(quoted_phrases(r#"say ""Kesariya"""#), ["Kesariya"]);
    }

    #[test]
    fn test_build_queries() {
        let queries = build_queries("workout", Some("tamil"), r#"some "Vaathi Coming" songs"#);
        assert_eq!(
            queries,
            ["tamil workout", "tamil", "workout", "Vaathi Coming", "some Vaathi Coming songs"]
        );
    }

    #[test]
    fn test_build_queries_skips_duplicate_tokens() {
        assert_eq!(build_queries("chill", None, "CHILL"), ["chill"]);
        assert_eq!(build_queries("chill", None, ""), ["chill"]);
    }

    #[test]
    fn test_pick_genre_seeds_matches_tokens() {
        let available: Vec<String> = ["pop", "k-pop", "indian", "tamil", "rock"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(pick_genre_seeds(&available, "pop please", None), ["pop", "k-pop"]);
        assert_eq!(pick_genre_seeds(&available, "some k-pop", None), ["k-pop"]);
        assert_eq!(pick_genre_seeds(&available, "", Some("Tamil")), ["tamil"]);
    }

    #[test]
    fn test_pick_genre_seeds_fallbacks() {
        let available: Vec<String> = ["acoustic", "dance", "electronic", "indie", "pop", "rock"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(pick_genre_seeds(&available, "zzz", None), ["pop", "indie", "rock"]);

        let exotic: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        assert_eq!(pick_genre_seeds(&exotic, "", None), ["a", "b", "c"]);

        assert!(pick_genre_seeds(&[], "pop", None).is_empty());
    }

    #[test]
    fn test_rank_tracks_prefers_script_and_backfills() {
        let items: Vec<Track> = serde_json::from_value(json!([
            track("1", "Shape of You", "Ed Sheeran"),
            track("2", "तुम ही हो", "Arijit Singh"),
            track("3", "Levitating", "Dua Lipa"),
            track("4", "Kesariya", "अरिजीत"),
        ]))
        .unwrap();

        let script = dominant_script(Some("गाने"));
        let ranked = rank_tracks(&items, script, 3);
        let titles: Vec<_> = ranked.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["तुम ही हो", "Kesariya", "Shape of You"]);
    }

    #[test]
    fn test_track_links_defaults() {
        let links = Track::default().links();
        assert_eq!(links.title, "Track");
        assert_eq!(links.artists, "—");
        assert_eq!(links.spotify, "https://open.spotify.com/");
        assert_eq!(links.youtube, "https://www.youtube.com/results?search_query=music");

        let t: Track = serde_json::from_value(track("9", "Tum Hi Ho", "Arijit Singh")).unwrap();
        assert_eq!(
            t.links().apple_music_search,
            "https://music.apple.com/in/search?term=Tum%20Hi%20Ho%20Arijit%20Singh"
        );
    }

    // ── HTTP pipeline ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_missing_credentials() {
        let client = SpotifyClient::with_config(SpotifyConfig::default()).unwrap();
        assert!(!client.has_credentials());

        let err = client.recommend(&request("chill", None, 5, None)).await.unwrap_err();
        assert!(err.is_config_error());
        assert_eq!(
            err.to_string(),
            "Spotify credentials missing. Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET in .env."
        );
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        let client = client_for(&server);
        assert_eq!(client.access_token().await.unwrap(), "tok");
        assert_eq!(client.access_token().await.unwrap(), "tok");
    }

    #[tokio::test]
    async fn test_seed_track_pipeline() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("authorization", "Bearer tok"))
            .and(query_param("q", "hindi party"))
            .and(query_param("market", "IN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": { "items": [
                    track("lat", "Party Anthem", "DJ"),
                    track("dev", "बदतमीज़ दिल", "Benny Dayal"),
                ]}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tracks": { "items": [] } })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .and(query_param("seed_tracks", "dev,lat"))
            .and(query_param("limit", "10"))
            .and(query_param("min_danceability", "0.6"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [
                    track("a", "Badtameez Dil", "Benny Dayal"),
                    track("b", "लंदन ठुमकदा", "Labh Janjua"),
                    track("c", "Gallan Goodiyaan", "Yashita"),
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .recommend(&request("party", Some("hindi"), 2, Some("बॉलीवुड पार्टी गाने")))
            .await
            .unwrap();

        assert_eq!(response.dominant_script.to_string(), "DEVANAGARI");
        assert_eq!(response.used_seed_tracks, ["dev", "lat"]);
        assert!(response.used_genre_seeds.is_empty());
        assert_eq!(response.language_hint.as_deref(), Some("hindi"));
        let titles: Vec<_> = response.tracks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["लंदन ठुमकदा", "Badtameez Dil"]);
        assert!(response.hint.is_some());
        assert!(response.note.is_none());
    }

    #[tokio::test]
    async fn test_genre_seed_pipeline() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations/available-genre-seeds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "genres": ["acoustic", "k-pop", "pop", "rock"]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .and(query_param("seed_genres", "k-pop"))
            .and(query_param("target_energy", "0.3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [track("x", "Dynamite", "BTS")]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        for _ in 0..2 {
            let response = client
                .recommend(&request("chill", Some("k-pop"), 5, None))
                .await
                .unwrap();
            assert_eq!(response.used_genre_seeds, ["k-pop"]);
            assert!(response.used_seed_tracks.is_empty());
            assert_eq!(response.tracks.len(), 1);
        }
    }

    #[tokio::test]
    async fn test_genre_endpoint_failure_uses_fallback_list() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tracks": { "items": [] } })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations/available-genre-seeds"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .and(query_param("seed_genres", "pop,indie,rock"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tracks": [] })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.recommend(&request("rainy", None, 5, None)).await.unwrap();
        assert_eq!(response.used_genre_seeds, ["pop", "indie", "rock"]);
        assert!(response.tracks.is_empty());
    }

    #[tokio::test]
    async fn test_recommendation_failure_returns_seed_tracks() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": { "items": [track("s1", "Kun Faya Kun", "A. R. Rahman")] }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/tracks/s1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(track("s1", "Kun Faya Kun", "A. R. Rahman")))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.recommend(&request("focus", None, 5, None)).await.unwrap();

        assert_eq!(response.used_seed_tracks, ["s1"]);
        assert_eq!(response.tracks.len(), 1);
        assert_eq!(response.tracks[0].spotify, "https://open.spotify.com/track/s1");
        assert!(response.note.unwrap().starts_with("Spotify recommendations errored"));
        assert!(response.hint.is_none());
    }

    #[tokio::test]
    async fn test_recommendation_failure_without_seeds_is_error() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "tracks": { "items": [] } })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations/available-genre-seeds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "genres": ["pop"] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.recommend(&request("chill", None, 5, None)).await.unwrap_err();
        assert!(matches!(err, PuchError::Upstream { .. }));
    }
}
