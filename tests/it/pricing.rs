use serde_json::json;
use shipment_estimator::domain::{price, CargoType, PricingError, CARGO_SURCHARGE_LINE};
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, ResponseTemplate,
};

use crate::helper::{base_quote, request, TestHelper};

#[tokio::test]
async fn test_oracle_receives_total_weight_and_container_code() {
    let helper = TestHelper::new().await;
    Mock::given(method("POST"))
        .and(path("/calculate"))
        .and(body_partial_json(json!({
            "distanceKm": 1000.0,
            "totalWeightKg": 1000.0,
            "containerVolumeCode": "40HC",
            "method": "standard",
            "cargoType": "perishable"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(base_quote()))
        .expect(1)
        .mount(&helper.mock_server)
        .await;

    let breakdown = price(
        &helper.pricing_client(),
        &request(CargoType::Perishable),
        1000.0,
    )
    .await
    .unwrap();

    assert!((breakdown.total - 4500.0 * 1.25).abs() < 1e-9);
    assert!((breakdown.get(CARGO_SURCHARGE_LINE).unwrap() - 1125.0).abs() < 1e-9);
    let names: Vec<_> = breakdown.lines.iter().map(|line| line.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Base Cost", "Distance Cost", "Weight Cost", CARGO_SURCHARGE_LINE]
    );
}

#[tokio::test]
async fn test_normal_cargo_returns_oracle_total() {
    let helper = TestHelper::new().await;
    helper.mount_quote(base_quote(), None).await;

    let breakdown = price(&helper.pricing_client(), &request(CargoType::Normal), 500.0)
        .await
        .unwrap();

    assert_eq!(breakdown.total, 4500.0);
    assert_eq!(breakdown.lines.len(), 3);
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let helper = TestHelper::new().await;
    helper.mount_pricing_status(503).await;

    let error = price(&helper.pricing_client(), &request(CargoType::Normal), 500.0)
        .await
        .unwrap_err();

    assert!(matches!(error, PricingError::Unavailable(_)));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_unreachable_oracle_is_unavailable() {
    let helper = TestHelper::new().await;
    let client = helper.pricing_client();
    drop(helper);

    let error = price(&client, &request(CargoType::Normal), 500.0)
        .await
        .unwrap_err();

    assert!(matches!(error, PricingError::Unavailable(_)));
}

#[tokio::test]
async fn test_negative_amount_is_malformed() {
    let helper = TestHelper::new().await;
    helper
        .mount_quote(
            json!({ "costs": { "Base Cost": 100.0, "Rebate": -50.0 }, "totalCost": 50.0 }),
            None,
        )
        .await;

    let error = price(&helper.pricing_client(), &request(CargoType::Fragile), 500.0)
        .await
        .unwrap_err();

    assert!(matches!(error, PricingError::Malformed(_)));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let helper = TestHelper::new().await;
    Mock::given(method("POST"))
        .and(path("/calculate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&helper.mock_server)
        .await;

    let error = price(&helper.pricing_client(), &request(CargoType::Normal), 500.0)
        .await
        .unwrap_err();

    assert!(matches!(error, PricingError::Malformed(_)));
}
