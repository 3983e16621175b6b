//! HTTP-level tests for the CWA fetcher against a local mock server.

use std::time::Duration;

use cwabot_core::fetcher::{CwaFetcher, ForecastSource};
use cwabot_core::model::ForecastError;
use serde_json::json;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn element(name: &str, values: [&str; 3]) -> serde_json::Value {
    let windows = [
        ("2024-05-16 12:00:00", "2024-05-16 18:00:00"),
        ("2024-05-16 18:00:00", "2024-05-17 06:00:00"),
        ("2024-05-17 06:00:00", "2024-05-17 18:00:00"),
    ];
    json!({
        "elementName": name,
        "time": windows
            .iter()
            .zip(values)
            .map(|((start, end), value)| json!({
                "startTime": start,
                "endTime": end,
                "parameter": { "parameterName": value }
            }))
            .collect::<Vec<_>>()
    })
}

fn forecast_body() -> serde_json::Value {
    json!({
        "success": "true",
        "records": {
            "location": [{
                "locationName": "臺北市",
                "weatherElement": [
                    element("Wx", ["多雲時晴", "多雲", "陰短暫雨"]),
                    element("PoP", ["20", "40", "80"]),
                    element("MinT", ["22", "21", "20"]),
                    element("CI", ["舒適", "舒適", "稍有寒意"]),
                    element("MaxT", ["29", "26", "24"]),
                ]
            }]
        }
    })
}

fn fetcher_for(server: &MockServer) -> CwaFetcher {
    CwaFetcher::new(Some("TEST-KEY".to_string())).with_base_url(server.uri())
}

#[tokio::test]
async fn fetch_sends_credential_and_location_and_parses_three_periods() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("Authorization", "TEST-KEY"))
        .and(query_param("locationName", "臺北市"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&server)
        .await;

    let forecast = fetcher_for(&server).fetch("臺北市").await.expect("fetch should succeed");

    assert_eq!(forecast.location_name, "臺北市");
    assert_eq!(forecast.periods.len(), 3);
    assert_eq!(forecast.periods[0].weather, "多雲時晴");
    assert_eq!(forecast.periods[2].rain_pop, 80);
}

#[tokio::test]
async fn non_2xx_status_maps_to_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch("臺北市").await.unwrap_err();
    assert_eq!(err, ForecastError::Transport(500));
}

#[tokio::test]
async fn slow_response_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast_body())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server).with_timeout(Duration::from_millis(100));
    let err = fetcher.fetch("臺北市").await.unwrap_err();
    assert_eq!(err, ForecastError::Timeout);
}

#[tokio::test]
async fn missing_element_maps_to_parse_error() {
    let server = MockServer::start().await;

    let mut body = forecast_body();
    body["records"]["location"][0]["weatherElement"]
        .as_array_mut()
        .unwrap()
        .retain(|el| el["elementName"] != "CI");

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch("臺北市").await.unwrap_err();
    assert!(matches!(err, ForecastError::Parse(msg) if msg.contains("CI")));
}

#[tokio::test]
async fn non_json_body_maps_to_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = fetcher_for(&server).fetch("臺北市").await.unwrap_err();
    assert!(matches!(err, ForecastError::Parse(_)));
}

#[tokio::test]
async fn missing_api_key_short_circuits_without_a_request() {
    let server = MockServer::start().await;
    // no mock mounted: any request would 404 and fail the assertions below

    let fetcher = CwaFetcher::new(None).with_base_url(server.uri());
    let err = fetcher.fetch("臺北市").await.unwrap_err();
    assert_eq!(err, ForecastError::ApiKeyMissing);

    let fetcher = CwaFetcher::new(Some(String::new())).with_base_url(server.uri());
    let err = fetcher.fetch("臺北市").await.unwrap_err();
    assert_eq!(err, ForecastError::ApiKeyMissing);

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn unsupported_location_short_circuits_without_a_request() {
    let server = MockServer::start().await;

    let err = fetcher_for(&server).fetch("火星市").await.unwrap_err();
    assert_eq!(err, ForecastError::UnsupportedLocation("火星市".to_string()));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}
