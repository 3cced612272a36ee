//! Location resolution combining the city table with reverse geocoding.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use puch_cache::TtlCache;
use puch_core::constants::{DEFAULT_NEAREST_CITY_KM, REVERSE_GEOCODE_TTL};
use puch_core::traits::ReverseGeocoder;
use puch_core::types::ResolvedCity;

use crate::nearest::nearest_known_city;
use crate::normalize::normalize_city;

/// Resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Radius within which coordinates snap to a known city
    pub max_distance_km: f64,
    /// Whether to cache reverse-geocoding hits
    pub enable_cache: bool,
    /// How long a reverse-geocoding hit stays fresh, in seconds
    pub reverse_ttl_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_distance_km: DEFAULT_NEAREST_CITY_KM,
            enable_cache: true,
            reverse_ttl_seconds: REVERSE_GEOCODE_TTL.as_secs(),
        }
    }
}

impl ResolverConfig {
    /// Disables caching.
    pub fn no_cache(mut self) -> Self {
        self.enable_cache = false;
        self
    }
}

/// Resolves a city name and/or coordinates to a city.
///
/// Precedence:
/// 1. Coordinates within range of a known city center
/// 2. Reverse-geocoded place name for the coordinates, normalized
/// 3. The free-text city, normalized
pub struct GeoResolver {
    geocoder: Arc<dyn ReverseGeocoder>,
    cache: Option<Arc<TtlCache<String>>>,
    config: ResolverConfig,
}

impl GeoResolver {
    /// Creates a resolver with a private cache.
    pub fn new(geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self::with_config(geocoder, Arc::new(TtlCache::new()), ResolverConfig::default())
    }

    /// Creates a resolver that stores reverse-geocoding hits in `cache`.
    pub fn with_config(
        geocoder: Arc<dyn ReverseGeocoder>,
        cache: Arc<TtlCache<String>>,
        config: ResolverConfig,
    ) -> Self {
        let cache = if config.enable_cache { Some(cache) } else { None };
        Self {
            geocoder,
            cache,
            config,
        }
    }

    /// Resolves a location from whichever inputs are present.
    ///
    /// Returns `None` only when nothing usable was supplied or found.
    #[instrument(skip(self))]
    pub async fn resolve_location(
        &self,
        city: Option<&str>,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Option<ResolvedCity> {
        if let (Some(lat), Some(lon)) = (lat, lon) {
            if let Some(found) = nearest_known_city(lat, lon, self.config.max_distance_km) {
                debug!(city = %found.display_name, "Matched known city by coordinates");
                return Some(found);
            }

            if let Some(found) = self
                .reverse_geocode(lat, lon)
                .await
                .and_then(|name| normalize_city(Some(&name)))
            {
                debug!(city = %found.display_name, "Resolved city by reverse geocoding");
                return Some(found);
            }
        }

        normalize_city(city)
    }

    /// Reverse geocodes through the cache.
    async fn reverse_geocode(&self, lat: f64, lon: f64) -> Option<String> {
        let key = format!("revgeo:{lat:.4},{lon:.4}");
        let ttl = Duration::from_secs(self.config.reverse_ttl_seconds);

        if let Some(cache) = &self.cache {
            if let Some(name) = cache.get(&key, ttl) {
                debug!(key = %key, "Cache hit");
                return Some(name);
            }
        }

        let name = self.geocoder.city_at(lat, lon).await?;

        if let Some(cache) = &self.cache {
            cache.set(key, name.clone());
        }
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use puch_core::traits::NoReverseGeocoder;

    struct FixedGeocoder {
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedGeocoder {
        fn new(answer: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ReverseGeocoder for FixedGeocoder {
        async fn city_at(&self, _lat: f64, _lon: f64) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.map(str::to_string)
        }
    }

    #[tokio::test]
    async fn test_known_coordinates_skip_geocoder() {
        let geocoder = FixedGeocoder::new(Some("Somewhere"));
        let resolver = GeoResolver::new(geocoder.clone());

        let city = resolver
            .resolve_location(Some("Chennai"), Some(19.0760), Some(72.8777))
            .await;

        assert_eq!(city, Some(ResolvedCity::known("Mumbai", "mumbai")));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_far_coordinates_use_geocoder_and_normalize() {
        let geocoder = FixedGeocoder::new(Some("Bombay"));
        let resolver = GeoResolver::new(geocoder.clone());

        let city = resolver.resolve_location(None, Some(0.0), Some(0.0)).await;

        assert_eq!(city, Some(ResolvedCity::known("Mumbai", "mumbai")));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_reverse_geocode_hits_are_cached() {
        let geocoder = FixedGeocoder::new(Some("Goa"));
        let resolver = GeoResolver::new(geocoder.clone());

        for _ in 0..3 {
            let city = resolver.resolve_location(None, Some(15.4909), Some(73.8278)).await;
            assert_eq!(city, Some(ResolvedCity::unmapped("Goa")));
        }
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let geocoder = FixedGeocoder::new(None);
        let resolver = GeoResolver::new(geocoder.clone());

        resolver.resolve_location(None, Some(0.0), Some(0.0)).await;
        resolver.resolve_location(None, Some(0.0), Some(0.0)).await;
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_no_cache_config() {
        let geocoder = FixedGeocoder::new(Some("Goa"));
        let resolver = GeoResolver::with_config(
            geocoder.clone(),
            Arc::new(TtlCache::new()),
            ResolverConfig::default().no_cache(),
        );

        resolver.resolve_location(None, Some(15.49), Some(73.83)).await;
        resolver.resolve_location(None, Some(15.49), Some(73.83)).await;
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_geocoder_miss_falls_back_to_text() {
        let resolver = GeoResolver::new(Arc::new(NoReverseGeocoder));

        let city = resolver
            .resolve_location(Some("bangalore"), Some(0.0), Some(0.0))
            .await;
        assert_eq!(city, Some(ResolvedCity::known("Bengaluru", "bengaluru")));
    }

    #[tokio::test]
    async fn test_text_only_and_nothing() {
        let resolver = GeoResolver::new(Arc::new(NoReverseGeocoder));

        assert_eq!(
            resolver.resolve_location(Some("Timbuktu"), None, None).await,
            Some(ResolvedCity::unmapped("Timbuktu"))
        );
        // A lone latitude is not a coordinate.
        assert_eq!(resolver.resolve_location(None, Some(12.97), None).await, None);
        assert_eq!(resolver.resolve_location(None, None, None).await, None);
    }

    #[tokio::test]
    async fn test_shared_cache_is_visible_to_other_resolvers() {
        let cache = Arc::new(TtlCache::new());
        let first = GeoResolver::with_config(
            FixedGeocoder::new(Some("Goa")),
            cache.clone(),
            ResolverConfig::default(),
        );
        let silent = FixedGeocoder::new(None);
        let second = GeoResolver::with_config(silent.clone(), cache, ResolverConfig::default());

        first.resolve_location(None, Some(15.4909), Some(73.8278)).await;
        let city = second.resolve_location(None, Some(15.4909), Some(73.8278)).await;

        assert_eq!(city, Some(ResolvedCity::unmapped("Goa")));
        assert_eq!(silent.calls.load(Ordering::SeqCst), 0);
    }
}
