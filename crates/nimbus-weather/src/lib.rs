//! Weather service for Nimbus
//!
//! Fetches current weather and air quality from the OpenWeatherMap REST
//! APIs, normalizes the responses into a flat snapshot, and derives
//! activity advisories. City detection via a geo-IP lookup is included
//! for the startup "current location" flow.

pub mod advisories;
pub mod client;
pub mod geolocate;
pub mod types;

pub use advisories::activity_advisories;
pub use client::{parse_conditions, WeatherClient};
pub use geolocate::detect_city;
pub use types::*;
