use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherSettings,

    /// User report storage settings
    #[serde(default)]
    pub reports: ReportsSettings,
}

/// Unit system sent to the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSettings {
    /// Current-weather endpoint
    pub weather_url: String,

    /// Air-pollution endpoint
    pub air_quality_url: String,

    /// Geo-IP lookup endpoint
    pub geo_url: String,

    /// Unit system for temperature values
    pub units: Units,

    /// Weather provider API key (environment only, never persisted)
    #[serde(skip, default = "weather_api_key_from_env")]
    pub api_key: Option<String>,

    /// Geo-IP provider access key (environment only, never persisted)
    #[serde(skip, default = "geo_access_key_from_env")]
    pub geo_access_key: Option<String>,
}

fn weather_api_key_from_env() -> Option<String> {
    std::env::var("WEATHER_API_KEY").ok()
}

fn geo_access_key_from_env() -> Option<String> {
    std::env::var("GEO_API_KEY").ok()
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            weather_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            air_quality_url: "http://api.openweathermap.org/data/2.5/air_pollution".to_string(),
            geo_url: "http://api.ipstack.com/check".to_string(),
            units: Units::Metric,
            api_key: weather_api_key_from_env(),
            geo_access_key: geo_access_key_from_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsSettings {
    /// Directory holding per-city report files
    #[serde(default = "default_reports_dir_str")]
    pub reports_dir: String,
}

fn default_reports_dir_str() -> String {
    default_reports_dir().to_string_lossy().into_owned()
}

fn default_reports_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("nimbus").join("weather_reports"))
        .unwrap_or_else(|| PathBuf::from("weather_reports"))
}

impl Default for ReportsSettings {
    fn default() -> Self {
        Self {
            reports_dir: default_reports_dir_str(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nimbus");

        Self {
            config_dir,
            weather: WeatherSettings::default(),
            reports: ReportsSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult), ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.weather_url, "weather.weather_url", &mut result);
        self.validate_url(
            &self.weather.air_quality_url,
            "weather.air_quality_url",
            &mut result,
        );
        self.validate_url(&self.weather.geo_url, "weather.geo_url", &mut result);

        // Missing keys degrade features rather than break startup
        if self.weather.api_key.as_deref().unwrap_or("").is_empty() {
            result.add_warning(
                "weather.api_key",
                "WEATHER_API_KEY not set - weather lookups will fail",
            );
        }
        if self.weather.geo_access_key.as_deref().unwrap_or("").is_empty() {
            result.add_warning(
                "weather.geo_access_key",
                "GEO_API_KEY not set - location detection unavailable",
            );
        }

        let reports_dir = PathBuf::from(&self.reports.reports_dir);
        if reports_dir.exists() && !reports_dir.is_dir() {
            result.add_error(
                "reports.reports_dir",
                format!("Path is not a directory: {}", reports_dir.display()),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(&config_path, contents)?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::MissingSetting("config directory".to_string()))?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}
