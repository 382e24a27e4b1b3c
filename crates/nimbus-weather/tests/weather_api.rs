//! Integration tests for WeatherClient and geo-IP detection against a
//! mock HTTP server.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use nimbus_weather::{detect_city, AirQuality, ClientOptions, Units, WeatherClient, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> WeatherClient {
    WeatherClient::new(ClientOptions {
        weather_url: format!("{}/data/2.5/weather", server.uri()),
        air_quality_url: format!("{}/data/2.5/air_pollution", server.uri()),
        api_key: "test-key".to_string(),
        units: Units::Metric,
    })
    .unwrap()
}

fn weather_body() -> serde_json::Value {
    serde_json::json!({
        "name": "London",
        "main": { "temp": 11.3, "humidity": 80 },
        "weather": [{ "id": 500, "description": "light rain" }],
        "coord": { "lat": 51.51, "lon": -0.13 }
    })
}

fn air_quality_body(aqi: i64) -> serde_json::Value {
    serde_json::json!({
        "list": [{ "main": { "aqi": aqi } }]
    })
}

#[tokio::test]
async fn test_snapshot_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "London"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body(2)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let snapshot = client.snapshot("London").await.unwrap();

    assert_eq!(snapshot.city, "London");
    assert_eq!(snapshot.temperature, Some(11.3));
    assert_eq!(snapshot.description, "Light rain");
    assert_eq!(snapshot.latitude, Some(51.51));
    assert_eq!(snapshot.longitude, Some(-0.13));
    assert_eq!(snapshot.air_quality, AirQuality::Fair);
    assert_eq!(snapshot.air_quality_index, Some(2));
}

#[tokio::test]
async fn test_weather_server_error_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client.snapshot("London").await;

    match result {
        Err(WeatherError::Api { status, .. }) => {
            assert_eq!(status, 500);
        }
        other => panic!("expected Api error, got {:?}", other.map(|s| s.city)),
    }
}

#[tokio::test]
async fn test_weather_network_error_surfaces_user_message() {
    // Nothing listening here; the connection is refused.
    let client = WeatherClient::new(ClientOptions {
        weather_url: "http://127.0.0.1:9/data/2.5/weather".to_string(),
        air_quality_url: "http://127.0.0.1:9/data/2.5/air_pollution".to_string(),
        api_key: "test-key".to_string(),
        units: Units::Metric,
    })
    .unwrap();

    let result = client.fetch_weather("London").await;
    match result {
        Err(e) => {
            assert!(matches!(e, WeatherError::Network(_)));
            assert!(!e.user_message().is_empty());
        }
        Ok(_) => panic!("expected a network error"),
    }
}

#[tokio::test]
async fn test_air_quality_failure_degrades_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let snapshot = client.snapshot("London").await.unwrap();

    // Weather fields survive; air quality degrades to the error label
    assert_eq!(snapshot.city, "London");
    assert_eq!(snapshot.temperature, Some(11.3));
    assert_eq!(snapshot.air_quality, AirQuality::Error);
    assert_eq!(snapshot.air_quality.label(), "Error fetching air quality");
    assert_eq!(snapshot.air_quality_index, None);
}

#[tokio::test]
async fn test_air_quality_unknown_index() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/air_pollution"))
        .respond_with(ResponseTemplate::new(200).set_body_json(air_quality_body(9)))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let snapshot = client.snapshot("London").await.unwrap();

    assert_eq!(snapshot.air_quality, AirQuality::Unknown);
    assert_eq!(snapshot.air_quality_index, Some(9));
}

#[tokio::test]
async fn test_missing_coordinates_skip_air_quality() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Nowhere",
            "main": { "temp": 7.0 },
            "weather": [{ "description": "mist" }]
        })))
        .mount(&server)
        .await;

    // No air-pollution mock mounted; the call must not happen.
    let client = client_for(&server);
    let snapshot = client.snapshot("Nowhere").await.unwrap();

    assert_eq!(snapshot.air_quality, AirQuality::Unknown);
    assert_eq!(snapshot.air_quality_index, None);
    assert_eq!(snapshot.description, "Mist");
}

#[tokio::test]
async fn test_detect_city_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/check"))
        .and(query_param("access_key", "geo-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Toronto",
            "country_name": "Canada"
        })))
        .mount(&server)
        .await;

    let city = detect_city(&format!("{}/check", server.uri()), "geo-key").await;
    assert_eq!(city.as_deref(), Some("Toronto"));
}

#[tokio::test]
async fn test_detect_city_failure_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let city = detect_city(&format!("{}/check", server.uri()), "geo-key").await;
    assert_eq!(city, None);
}

#[tokio::test]
async fn test_detect_city_missing_or_empty_city_returns_none() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": ""
        })))
        .mount(&server)
        .await;

    let city = detect_city(&format!("{}/check", server.uri()), "geo-key").await;
    assert_eq!(city, None);

    let server2 = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server2)
        .await;

    let city = detect_city(&format!("{}/check", server2.uri()), "geo-key").await;
    assert_eq!(city, None);
}
