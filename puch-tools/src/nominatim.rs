//! OpenStreetMap Nominatim geocoding.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use puch_core::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use puch_core::error::{PuchError, Result};
use puch_core::traits::{ForwardGeocoder, ReverseGeocoder};
use puch_core::types::GeoPoint;

use crate::http::{build_client, endpoint, ensure_success, transport_error};

const SERVICE: &str = "Nominatim";

/// Nominatim client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// API root, without trailing path
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".into(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl NominatimConfig {
    /// Points the client at another server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct ReverseResponse {
    #[serde(default)]
    address: Address,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    municipality: Option<String>,
    county: Option<String>,
}

impl Address {
    /// The most specific non-empty settlement name.
    fn settlement(self) -> Option<String> {
        [self.city, self.town, self.municipality, self.county]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Nominatim geocoding client.
pub struct NominatimClient {
    config: NominatimConfig,
    http_client: reqwest::Client,
}

impl NominatimClient {
    /// Creates a client against the public Nominatim server.
    pub fn new() -> Result<Self> {
        Self::with_config(NominatimConfig::default())
    }

    /// Creates a client with the given config.
    pub fn with_config(config: NominatimConfig) -> Result<Self> {
        let http_client = build_client(config.timeout_seconds)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Reverse geocodes a point to a city, town, municipality or county.
    #[instrument(skip(self))]
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        let response = self
            .http_client
            .get(endpoint(&self.config.base_url, "reverse"))
            .query(&[("format", "jsonv2"), ("zoom", "10"), ("addressdetails", "1")])
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let body: ReverseResponse = ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let city = body.address.settlement();
        debug!(?city, "Reverse geocoded");
        Ok(city)
    }

    /// Looks up the best match for a free-text place.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Option<GeoPoint>> {
        let response = self
            .http_client
            .get(endpoint(&self.config.base_url, "search"))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let hits: Vec<SearchHit> = ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };

        let lat = parse_coordinate(&hit.lat)?;
        let lon = parse_coordinate(&hit.lon)?;
        let label = hit.display_name.unwrap_or_else(|| query.to_string());
        Ok(Some(GeoPoint::new(lat, lon).with_label(label)))
    }
}

fn parse_coordinate(raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| PuchError::Parse(format!("{SERVICE}: bad coordinate '{raw}'")))
}

#[async_trait]
impl ReverseGeocoder for NominatimClient {
    async fn city_at(&self, lat: f64, lon: f64) -> Option<String> {
        match self.reverse(lat, lon).await {
            Ok(city) => city,
            Err(e) => {
                warn!(error = %e, lat, lon, "Reverse geocoding failed");
                None
            }
        }
    }
}

#[async_trait]
impl ForwardGeocoder for NominatimClient {
    async fn locate(&self, query: &str) -> Option<GeoPoint> {
        match self.search(query).await {
            Ok(point) => point,
            Err(e) => {
                warn!(error = %e, query, "Forward geocoding failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> NominatimClient {
        NominatimClient::with_config(NominatimConfig::default().with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn test_reverse_prefers_city() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("format", "jsonv2"))
            .and(query_param("zoom", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": { "city": "Panaji", "county": "Tiswadi" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.reverse(15.49, 73.83).await.unwrap().as_deref(), Some("Panaji"));
    }

    #[tokio::test]
    async fn test_reverse_falls_back_through_address_levels() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": { "city": "", "county": "Nilgiris" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.city_at(11.4, 76.7).await.as_deref(), Some("Nilgiris"));
    }

    #[tokio::test]
    async fn test_reverse_ocean_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": "Unable to geocode"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.reverse(0.0, 0.0).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_server_error_is_absorbed_by_trait() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.reverse(1.0, 2.0).await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(client.city_at(1.0, 2.0).await, None);
        assert_eq!(client.locate("Pune").await, None);
    }

    #[tokio::test]
    async fn test_search_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Pune"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "lat": "18.5213738",
                "lon": "73.8545071",
                "display_name": "Pune, Maharashtra, India"
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let point = client.locate("Pune").await.unwrap();
        assert!((point.lat - 18.5213738).abs() < 1e-9);
        assert!((point.lon - 73.8545071).abs() < 1e-9);
        assert_eq!(point.describe(), "Pune, Maharashtra, India");
    }

    #[tokio::test]
    async fn test_search_without_display_name_uses_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "lat": "1.5", "lon": "2.5"
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let point = client.search("Somewhere").await.unwrap().unwrap();
        assert_eq!(point.label.as_deref(), Some("Somewhere"));
    }

    #[tokio::test]
    async fn test_search_miss_and_bad_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Atlantis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Broken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "lat": "north", "lon": "2.5"
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.search("Atlantis").await.unwrap(), None);
        assert!(matches!(client.search("Broken").await, Err(PuchError::Parse(_))));
    }
}
