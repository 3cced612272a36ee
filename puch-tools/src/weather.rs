//! Current weather and 3-day forecast from Open-Meteo.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use puch_core::constants::DEFAULT_HTTP_TIMEOUT_SECS;
use puch_core::error::{PuchError, Result};
use puch_core::traits::ForwardGeocoder;
use puch_core::types::GeoPoint;

use crate::http::{build_client, endpoint, ensure_success, transport_error};

const SERVICE: &str = "Open-Meteo";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_probability_mean";
const FORECAST_DAYS: &str = "3";
const NO_LOCATION: &str = "Please provide a city or share location.";

/// Open-Meteo client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// API root
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.open-meteo.com".into(),
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

/// Current conditions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrentWeather {
    /// Place label
    #[serde(rename = "where")]
    pub place: String,
    /// Open-Meteo `current_weather` block, passed through
    pub current: Value,
}

/// Daily forecast.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyForecast {
    /// Place label
    #[serde(rename = "where")]
    pub place: String,
    /// Open-Meteo `daily` block, passed through
    pub daily: Value,
}

#[derive(Debug, Default, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current_weather: Option<Value>,
    #[serde(default)]
    daily: Option<Value>,
}

/// Weather client. Cities are forward geocoded through `geocoder`.
pub struct WeatherClient {
    config: WeatherConfig,
    http_client: reqwest::Client,
    geocoder: Arc<dyn ForwardGeocoder>,
}

impl WeatherClient {
    /// Creates a client with the given config.
    pub fn with_config(config: WeatherConfig, geocoder: Arc<dyn ForwardGeocoder>) -> Result<Self> {
        let http_client = build_client(config.timeout_seconds)?;
        Ok(Self {
            config,
            http_client,
            geocoder,
        })
    }

    /// Picks the point to query: explicit coordinates first, then the city.
    async fn locate(&self, city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Result<GeoPoint> {
        let city = city.map(str::trim).filter(|c| !c.is_empty());

        if let (Some(lat), Some(lon)) = (lat, lon) {
            let point = GeoPoint::new(lat, lon);
            return Ok(match city {
                Some(city) => point.with_label(city),
                None => point,
            });
        }

        let Some(city) = city else {
            return Err(PuchError::Validation(NO_LOCATION.into()));
        };

        match self.geocoder.locate(city).await {
            Some(point) => Ok(point),
            None => {
                debug!(city, "City not found by geocoder");
                Err(PuchError::Validation(NO_LOCATION.into()))
            }
        }
    }

    async fn forecast(&self, point: &GeoPoint, extra: &[(&str, &str)]) -> Result<ForecastResponse> {
        let response = self
            .http_client
            .get(endpoint(&self.config.base_url, "v1/forecast"))
            .query(&[("latitude", point.lat), ("longitude", point.lon)])
            .query(&[("timezone", "auto")])
            .query(extra)
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))?;

        ensure_success(SERVICE, response)?
            .json()
            .await
            .map_err(|e| transport_error(SERVICE, e))
    }

    /// Current conditions for a city or coordinates.
    #[instrument(skip(self))]
    pub async fn current(&self, city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Result<CurrentWeather> {
        let point = self.locate(city, lat, lon).await?;
        let body = self.forecast(&point, &[("current_weather", "true")]).await?;
        Ok(CurrentWeather {
            place: point.describe(),
            current: body.current_weather.unwrap_or_else(|| Value::Object(Default::default())),
        })
    }

    /// Three-day min/max temperature and rain probability.
    #[instrument(skip(self))]
    pub async fn daily(&self, city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> Result<DailyForecast> {
        let point = self.locate(city, lat, lon).await?;
        let body = self
            .forecast(&point, &[("daily", DAILY_FIELDS), ("forecast_days", FORECAST_DAYS)])
            .await?;
        Ok(DailyForecast {
            place: point.describe(),
            daily: body.daily.unwrap_or_else(|| Value::Object(Default::default())),
        })
    }
}
