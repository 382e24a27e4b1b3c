//! Geo-IP city detection for the startup "current location" flow.
//!
//! Returns `None` on failure; the caller falls back to asking for a city.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    #[serde(default)]
    city: Option<String>,
}

/// Resolve the caller's city from its apparent network location.
///
/// Issues a GET to the geo-IP endpoint with the provider access key.
/// Returns `None` on any transport, status, or shape failure, and when the
/// provider reports no city.
pub async fn detect_city(geo_url: &str, access_key: &str) -> Option<String> {
    let client = match Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to create geo-IP client: {}", e);
            return None;
        }
    };

    let response = match client
        .get(geo_url)
        .query(&[("access_key", access_key)])
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("Geo-IP request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!("Geo-IP endpoint returned status {}", response.status());
        return None;
    }

    let body: GeoIpResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => {
            tracing::debug!("Geo-IP parse error: {}", e);
            return None;
        }
    };

    let city = body.city.filter(|c| !c.is_empty())?;
    tracing::info!("Detected location: {}", city);
    Some(city)
}
