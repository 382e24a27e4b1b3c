use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit system sent to the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    /// Query-parameter value understood by the provider
    pub fn as_query_param(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }
}

/// Air quality bands mapped from the provider's 1-5 index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirQuality {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
    Error,
}

impl AirQuality {
    /// Convert the provider's AQI value to a band.
    /// Indices outside 1..=5 map to Unknown.
    pub fn from_index(aqi: i64) -> Self {
        match aqi {
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
            Self::Unknown => "Unknown",
            Self::Error => "Error fetching air quality",
        }
    }
}

impl std::fmt::Display for AirQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parsed current-weather fields, before air-quality enrichment.
///
/// Missing provider fields resolve to sentinels ("Unknown", "N/A", None)
/// rather than failing the whole fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    pub temperature: Option<f64>,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Complete normalized weather + air-quality record for one query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: Option<f64>,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub air_quality: AirQuality,
    pub air_quality_index: Option<i64>,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Temperature formatted for display, "N/A" when absent
    pub fn temperature_display(&self) -> String {
        match self.temperature {
            Some(t) => format!("{:.1}", t),
            None => "N/A".to_string(),
        }
    }
}

/// Construction-time client configuration
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub weather_url: String,
    pub air_quality_url: String,
    pub api_key: String,
    pub units: Units,
}

/// Weather service errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Weather API key is not set")]
    MissingApiKey,
}

impl WeatherError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "Unable to fetch weather data. Check your connection.",
            WeatherError::Api { status, .. } if *status == 404 => {
                "City not found. Check the name and try again."
            }
            WeatherError::Api { status, .. } if *status == 401 => {
                "Weather API key is invalid. Check settings."
            }
            WeatherError::Api { .. } => "Weather service error. Please try again.",
            WeatherError::InvalidUrl(_) => "Weather provider URL is invalid. Check settings.",
            WeatherError::MissingApiKey => "Weather API key is not set. Set WEATHER_API_KEY.",
        }
    }
}
