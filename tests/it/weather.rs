use serde_json::json;
use shipment_estimator::{
    domain::{AqiIndex, Coordinates},
    infra::weather::WeatherError,
    EstimateError,
};

use crate::helper::{current_body, TestHelper};

const ROTTERDAM: Coordinates = Coordinates {
    lat: 51.9225,
    lon: 4.4792,
};

#[tokio::test]
async fn test_current_conditions_are_parsed() {
    let helper = TestHelper::new().await;
    helper.mount_weather_endpoint("weather", current_body()).await;

    let current = helper.weather_client().current(ROTTERDAM).await.unwrap();

    assert_eq!(current.temperature_c, 11.4);
    assert_eq!(current.humidity_pct, Some(81.0));
    assert_eq!(current.wind_speed_ms, Some(6.2));
    assert_eq!(current.description, "broken clouds");
}

#[tokio::test]
async fn test_forecast_is_limited_to_one_day() {
    let helper = TestHelper::new().await;
    helper.mount_weather(10.0).await;

    let forecast = helper.weather_client().forecast(ROTTERDAM).await.unwrap();

    assert_eq!(forecast.len(), 8);
    assert!(forecast.windows(2).all(|pair| pair[0].at < pair[1].at));
}

#[tokio::test]
async fn test_pollution_samples_keep_missing_components() {
    let helper = TestHelper::new().await;
    helper
        .mount_weather_endpoint(
            "air_pollution",
            json!({ "list": [{ "dt": 1_760_000_000, "components": { "pm10": 9.0 } }] }),
        )
        .await;

    let samples = helper.weather_client().pollution(ROTTERDAM).await.unwrap();

    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].pm2_5, None);
    assert_eq!(samples[0].pm10, Some(9.0));
}

#[tokio::test]
async fn test_air_quality_panel_uses_latest_pm25() {
    let helper = TestHelper::new().await;
    helper.mount_weather(40.0).await;

    let panel = helper
        .estimator()
        .air_quality("Rotterdam, Netherlands")
        .await
        .unwrap();

    assert_eq!(panel.port, "Rotterdam, Netherlands");
    assert_eq!(panel.pollution.len(), 2);
    assert_eq!(panel.reading.index, AqiIndex::Value(112));
    assert_eq!(panel.reading.category, "Unhealthy for Sensitive Groups");
}

#[tokio::test]
async fn test_air_quality_without_pm25_is_not_available() {
    let helper = TestHelper::new().await;
    helper.mount_weather_endpoint("weather", current_body()).await;
    helper
        .mount_weather_endpoint("forecast", json!({ "list": [] }))
        .await;
    helper
        .mount_weather_endpoint("air_pollution", json!({ "list": [] }))
        .await;

    let panel = helper
        .estimator()
        .air_quality("Rotterdam, Netherlands")
        .await
        .unwrap();

    assert_eq!(panel.reading.index, AqiIndex::NotAvailable);
    assert_eq!(panel.reading.category, "Unknown");
    assert!(panel.forecast.is_empty());
}

#[tokio::test]
async fn test_provider_error_message_is_surfaced() {
    let helper = TestHelper::new().await;
    helper.mount_weather_failure(401, "Invalid API key").await;

    let error = helper
        .estimator()
        .air_quality("Rotterdam, Netherlands")
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        EstimateError::Weather(WeatherError::Api(ref message)) if message == "Invalid API key"
    ));
}

#[tokio::test]
async fn test_unknown_port_has_no_weather() {
    let helper = TestHelper::new().await;
    helper.mount_weather(5.0).await;

    let error = helper.estimator().air_quality("Atlantis").await.unwrap_err();

    assert!(matches!(error, EstimateError::UnknownPort(_)));
}

