//! HTTP client for the weather and air-pollution endpoints.
//!
//! Weather fetches return typed errors so the presentation layer can decide
//! how to surface them. Air-quality fetches never fail: any transport or
//! shape problem degrades to `AirQuality::Error` so the rest of the snapshot
//! still renders.

use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::types::{
    AirQuality, ClientOptions, CurrentConditions, Units, WeatherError, WeatherSnapshot,
};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Raw current-weather provider response
#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub main: Option<MainFields>,
    #[serde(default)]
    pub weather: Vec<ConditionEntry>,
    #[serde(default)]
    pub coord: Option<Coordinates>,
}

#[derive(Debug, Deserialize)]
pub struct MainFields {
    #[serde(default)]
    pub temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ConditionEntry {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Coordinates {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Vec<AirPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionEntry {
    main: AqiField,
}

#[derive(Debug, Deserialize)]
struct AqiField {
    aqi: i64,
}

/// Weather provider client
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    weather_url: Url,
    air_quality_url: Url,
    api_key: String,
    units: Units,
}

impl WeatherClient {
    /// Create a new client from explicit options.
    ///
    /// # Errors
    /// Fails on an empty API key or an unparseable endpoint URL.
    pub fn new(options: ClientOptions) -> Result<Self, WeatherError> {
        if options.api_key.is_empty() {
            return Err(WeatherError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            weather_url: Url::parse(&options.weather_url)?,
            air_quality_url: Url::parse(&options.air_quality_url)?,
            api_key: options.api_key,
            units: options.units,
        })
    }

    /// Fetch and normalize current weather for a city.
    ///
    /// # Errors
    /// Returns `WeatherError::Network` on transport failure and
    /// `WeatherError::Api` on a non-2xx status. Missing response fields are
    /// not errors; they resolve to sentinel values.
    pub async fn fetch_weather(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        tracing::debug!("Fetching weather for {}", city);

        let response = self
            .client
            .get(self.weather_url.clone())
            .query(&[
                ("q", city),
                ("appid", &self.api_key),
                ("units", self.units.as_query_param()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: WeatherResponse = response.json().await?;
        Ok(parse_conditions(body))
    }

    /// Fetch the air-quality band for a coordinate pair.
    ///
    /// Never returns an error: failures yield `(AirQuality::Error, None)`
    /// so the caller can still render the rest of the snapshot.
    pub async fn fetch_air_quality(&self, latitude: f64, longitude: f64) -> (AirQuality, Option<i64>) {
        let response = match self
            .client
            .get(self.air_quality_url.clone())
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
            ])
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Air quality request failed: {}", e);
                return (AirQuality::Error, None);
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Air quality endpoint returned status {}", response.status());
            return (AirQuality::Error, None);
        }

        let body: AirPollutionResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Air quality parse error: {}", e);
                return (AirQuality::Error, None);
            }
        };

        match body.list.first() {
            Some(entry) => {
                let aqi = entry.main.aqi;
                (AirQuality::from_index(aqi), Some(aqi))
            }
            None => {
                tracing::debug!("Air quality response had no entries");
                (AirQuality::Error, None)
            }
        }
    }

    /// Full snapshot for a city: weather, then air quality at the returned
    /// coordinates. Skips the air-quality call when coordinates are absent.
    ///
    /// # Errors
    /// Only the weather fetch itself can fail; air-quality failure degrades
    /// into the snapshot's label.
    pub async fn snapshot(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let conditions = self.fetch_weather(city).await?;

        let (air_quality, air_quality_index) = match (conditions.latitude, conditions.longitude) {
            (Some(lat), Some(lon)) => self.fetch_air_quality(lat, lon).await,
            _ => (AirQuality::Unknown, None),
        };

        tracing::info!(
            "Weather snapshot for {}: {} ({})",
            conditions.city,
            conditions.description,
            air_quality.label()
        );

        Ok(WeatherSnapshot {
            city: conditions.city,
            temperature: conditions.temperature,
            description: conditions.description,
            latitude: conditions.latitude,
            longitude: conditions.longitude,
            air_quality,
            air_quality_index,
            fetched_at: Utc::now(),
        })
    }
}

/// Extract display fields from a provider response.
///
/// Defensive throughout: a missing city name becomes "Unknown", a missing
/// temperature or coordinate becomes `None`, a missing description becomes
/// "N/A". The description is capitalized for display.
pub fn parse_conditions(response: WeatherResponse) -> CurrentConditions {
    let city = response.name.unwrap_or_else(|| "Unknown".to_string());
    let temperature = response.main.and_then(|m| m.temp);
    let description = response
        .weather
        .into_iter()
        .next()
        .and_then(|w| w.description)
        .map(|d| capitalize(&d))
        .unwrap_or_else(|| "N/A".to_string());
    let (latitude, longitude) = match response.coord {
        Some(c) => (c.lat, c.lon),
        None => (None, None),
    };

    CurrentConditions {
        city,
        temperature,
        description,
        latitude,
        longitude,
    }
}

/// Uppercase the first character, lowercase the rest
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
