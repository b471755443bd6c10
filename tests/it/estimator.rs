use std::time::Duration;

use shipment_estimator::{
    domain::{CargoType, Corridor},
    PanelState, QuoteOutcome,
};

use crate::helper::{base_quote, request, TestHelper};

#[tokio::test(flavor = "multi_thread")]
async fn test_older_quote_is_discarded_when_superseded() {
    let helper = TestHelper::new().await;
    helper
        .mount_quote(base_quote(), Some(Duration::from_millis(300)))
        .await;
    let estimator = helper.estimator();

    let first = request(CargoType::Normal);
    let second = request(CargoType::Hazardous);

    let (older, newer) = tokio::join!(estimator.quote(&first), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        estimator.quote(&second).await
    });

    assert_eq!(older.unwrap(), QuoteOutcome::Superseded);
    let QuoteOutcome::Completed(quote) = newer.unwrap() else {
        panic!("newest quote must complete");
    };
    assert_eq!(quote.request, second);
    assert!((quote.breakdown.total - 4500.0 * 1.4).abs() < 1e-9);

    assert_eq!(estimator.latest_quote(&first).await, None);
    assert_eq!(estimator.latest_quote(&second).await, Some(quote));
}

#[tokio::test]
async fn test_failed_quote_clears_previous_result() {
    let helper = TestHelper::new().await;
    helper.mount_quote(base_quote(), None).await;
    let estimator = helper.estimator();
    let req = request(CargoType::Normal);

    estimator.quote(&req).await.unwrap();
    assert!(estimator.latest_quote(&req).await.is_some());

    helper.mock_server.reset().await;
    helper.mount_pricing_status(500).await;

    assert!(estimator.quote(&req).await.is_err());
    assert_eq!(estimator.latest_quote(&req).await, None);
}

#[tokio::test]
async fn test_cost_survives_weather_failure() {
    let helper = TestHelper::new().await;
    helper.mount_quote(base_quote(), None).await;
    helper.mount_weather_failure(500, "upstream timeout").await;

    let report = helper.estimator().report(&request(CargoType::Fragile)).await;

    let quote = report.cost.data().expect("cost panel should be ready");
    assert!((quote.breakdown.total - 4500.0 * 1.15).abs() < 1e-9);
    assert!(matches!(
        report.air_quality,
        PanelState::Failed { retryable: true, .. }
    ));
    assert_eq!(report.route.corridor, Corridor::AsiaEurope);
}

#[tokio::test]
async fn test_weather_survives_pricing_failure() {
    let helper = TestHelper::new().await;
    helper.mount_pricing_status(502).await;
    helper.mount_weather(10.0).await;

    let report = helper.estimator().report(&request(CargoType::Normal)).await;

    match &report.cost {
        PanelState::Failed { message, retryable } => {
            assert!(message.starts_with("failed to calculate shipping cost"));
            assert!(*retryable);
        }
        other => panic!("expected failed cost panel, got {other:?}"),
    }
    let air = report.air_quality.data().expect("air quality should be ready");
    assert_eq!(air.reading.category, "Good");
}

#[tokio::test]
async fn test_report_is_stable_json() {
    let helper = TestHelper::new().await;
    helper.mount_quote(base_quote(), None).await;
    helper.mount_weather(10.0).await;
    let estimator = helper.estimator();
    let req = request(CargoType::Perishable);

    let first = serde_json::to_string(&estimator.report(&req).await).unwrap();
    let second = serde_json::to_string(&estimator.report(&req).await).unwrap();
    assert_eq!(first, second);

    let value: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(value["route"]["corridor"], "Asia-EU");
    assert_eq!(value["cost"]["status"], "ready");
    assert_eq!(value["air_quality"]["data"]["reading"]["index"], 42);
}

#[tokio::test]
async fn test_unknown_port_degrades_route_but_fails_cost() {
    let helper = TestHelper::new().await;
    helper.mount_quote(base_quote(), None).await;
    let mut req = request(CargoType::Normal);
    req.origin = "Atlantis".to_string();

    let report = helper.estimator().report(&req).await;

    assert_eq!(report.route.corridor, Corridor::Custom);
    assert!(!report.route.coordinates_available);
    assert!(matches!(
        report.cost,
        PanelState::Failed { retryable: false, .. }
    ));
}
