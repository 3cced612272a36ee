//! App state: configuration and the adapters every handler shares.

use std::path::PathBuf;
use std::sync::Arc;

use puch_cache::{CacheConfig, TtlCache};
use puch_core::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_HTTP_TIMEOUT_SECS};
use puch_core::error::{PuchError, Result};
use puch_geo::GeoResolver;
use puch_tools::links::Affiliate;
use puch_tools::{
    MovieTools, NewsClient, NewsConfig, NominatimClient, NominatimConfig, PrefsStore, SpotifyClient,
    SpotifyConfig, WeatherClient, WeatherConfig,
};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8086;

/// Server configuration, usually read from the environment.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Bearer token every tool call must present
    pub auth_token: String,
    /// Phone number returned by `validate`
    pub my_number: String,
    /// Preference file
    pub prefs_path: PathBuf,
    /// Listening port
    pub port: u16,
    /// Spotify app client id
    pub spotify_client_id: Option<String>,
    /// Spotify app client secret
    pub spotify_client_secret: Option<String>,
    /// Affiliate text before an encoded booking link
    pub affiliate_prefix: String,
    /// Affiliate text after an encoded booking link
    pub affiliate_suffix: String,
    /// Timeout for geocoding, weather and news calls
    pub http_timeout_seconds: u64,
    /// Bound on the shared cache
    pub cache_max_entries: usize,
}

impl ApiConfig {
    /// Creates a config with the two required values and defaults for the rest.
    pub fn new(auth_token: impl Into<String>, my_number: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            my_number: my_number.into(),
            prefs_path: PathBuf::from("prefs.json"),
            port: DEFAULT_PORT,
            spotify_client_id: None,
            spotify_client_secret: None,
            affiliate_prefix: String::new(),
            affiliate_suffix: String::new(),
            http_timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }

    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| PuchError::Config(format!("Please set {key} in your .env file")))
        };

        let mut config = Self::new(require("AUTH_TOKEN")?, require("MY_NUMBER")?);

        if let Some(path) = get("PREFS_PATH") {
            config.prefs_path = PathBuf::from(path);
        }
        if let Some(port) = get("PORT") {
            config.port = parse_number("PORT", &port)?;
        }
        if let Some(secs) = get("HTTP_TIMEOUT_SECONDS") {
            config.http_timeout_seconds = parse_number("HTTP_TIMEOUT_SECONDS", &secs)?;
        }
        if let Some(max) = get("CACHE_MAX_ENTRIES") {
            config.cache_max_entries = parse_number("CACHE_MAX_ENTRIES", &max)?;
            if config.cache_max_entries == 0 {
                return Err(PuchError::Config("CACHE_MAX_ENTRIES must be at least 1".into()));
            }
        }
        config.spotify_client_id = get("SPOTIFY_CLIENT_ID");
        config.spotify_client_secret = get("SPOTIFY_CLIENT_SECRET");
        config.affiliate_prefix = get("AFFILIATE_PREFIX").unwrap_or_default();
        config.affiliate_suffix = get("AFFILIATE_SUFFIX").unwrap_or_default();

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| PuchError::Config(format!("{key} must be a number, got '{raw}'")))
}

/// Upstream endpoints for every adapter.
#[derive(Clone, Debug, Default)]
pub struct AdapterConfigs {
    /// Geocoding
    pub nominatim: NominatimConfig,
    /// Music
    pub spotify: SpotifyConfig,
    /// Weather
    pub weather: WeatherConfig,
    /// Headlines
    pub news: NewsConfig,
}

impl AdapterConfigs {
    /// Public endpoints with the timeouts and credentials from `config`.
    pub fn from_api_config(config: &ApiConfig) -> Self {
        let mut adapters = Self::default();
        adapters.nominatim.timeout_seconds = config.http_timeout_seconds;
        adapters.weather.timeout_seconds = config.http_timeout_seconds;
        adapters.news.timeout_seconds = config.http_timeout_seconds;
        adapters.spotify.client_id = config.spotify_client_id.clone();
        adapters.spotify.client_secret = config.spotify_client_secret.clone();
        adapters
    }
}

/// Shared state behind every route.
pub struct AppState {
    /// Server configuration
    pub config: ApiConfig,
    /// Preferred-city store
    pub prefs: Arc<PrefsStore>,
    /// Booking link builder
    pub movies: MovieTools,
    /// Spotify client
    pub spotify: SpotifyClient,
    /// Weather client
    pub weather: WeatherClient,
    /// Headline client
    pub news: NewsClient,
}

impl AppState {
    /// Builds state against the public endpoints.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let adapters = AdapterConfigs::from_api_config(&config);
        Self::with_adapters(config, adapters)
    }

    /// Builds state against the given endpoints.
    pub fn with_adapters(config: ApiConfig, adapters: AdapterConfigs) -> Result<Self> {
        let cache = Arc::new(TtlCache::with_config(CacheConfig::with_max_entries(
            config.cache_max_entries,
        )));
        let nominatim = Arc::new(NominatimClient::with_config(adapters.nominatim)?);
        let resolver = Arc::new(GeoResolver::with_config(
            nominatim.clone(),
            cache,
            Default::default(),
        ));
        let prefs = Arc::new(PrefsStore::new(&config.prefs_path));

        let movies = MovieTools::new(resolver)
            .with_affiliate(Affiliate::new(&config.affiliate_prefix, &config.affiliate_suffix))
            .with_prefs(prefs.clone());

        Ok(Self {
            prefs,
            movies,
            spotify: SpotifyClient::with_config(adapters.spotify)?,
            weather: WeatherClient::with_config(adapters.weather, nominatim)?,
            news: NewsClient::with_config(adapters.news)?,
            config,
        })
    }
}
