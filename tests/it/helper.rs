use std::{sync::Arc, time::Duration};

use serde_json::{json, Value};
use shipment_estimator::{
    domain::{CargoType, ContainerType, ShipmentRequest, ShippingMethod},
    infra::{ports::PortDirectory, pricing::PricingClient, weather::WeatherClient},
    Estimator,
};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const WEATHER_PREFIX: &str = "/data/2.5";
pub const API_KEY: &str = "test-key";

pub struct TestHelper {
    pub mock_server: MockServer,
}

impl TestHelper {
    pub async fn new() -> TestHelper {
        TestHelper {
            mock_server: MockServer::start().await,
        }
    }

    pub fn pricing_client(&self) -> PricingClient {
        PricingClient::new(&self.mock_server.uri()).unwrap()
    }

    pub fn weather_client(&self) -> WeatherClient {
        let base = format!("{}{WEATHER_PREFIX}/", self.mock_server.uri());
        WeatherClient::with_base_url(&base, API_KEY).unwrap()
    }

    pub fn estimator(&self) -> Estimator {
        Estimator::new(
            PortDirectory::embedded().unwrap(),
            Arc::new(self.pricing_client()),
            Some(self.weather_client()),
        )
    }

    pub async fn mount_quote(&self, body: Value, delay: Option<Duration>) {
        let mut template = ResponseTemplate::new(200).set_body_json(body);
        if let Some(delay) = delay {
            template = template.set_delay(delay);
        }
        Mock::given(method("POST"))
            .and(path("/calculate"))
            .respond_with(template)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_pricing_status(&self, status: u16) {
        Mock::given(method("POST"))
            .and(path("/calculate"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_weather(&self, pm2_5: f64) {
        self.mount_weather_endpoint("weather", current_body()).await;
        self.mount_weather_endpoint("forecast", forecast_body()).await;
        self.mount_weather_endpoint("air_pollution", pollution_body(pm2_5))
            .await;
    }

    pub async fn mount_weather_endpoint(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{WEATHER_PREFIX}/{endpoint}")))
            .and(query_param("appid", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mount_weather_failure(&self, status: u16, message: &str) {
        let body = json!({ "cod": status, "message": message });
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }
}

pub fn base_quote() -> Value {
    json!({
        "costs": {
            "Base Cost": 1800.0,
            "Distance Cost": 2400.0,
            "Weight Cost": 300.0
        },
        "totalCost": 4500.0
    })
}

pub fn request(cargo: CargoType) -> ShipmentRequest {
    ShipmentRequest {
        origin: "Singapore".to_string(),
        destination: "Rotterdam, Netherlands".to_string(),
        weight_per_item_kg: 12.5,
        quantity: 80,
        container: ContainerType::HighCube,
        method: ShippingMethod::Standard,
        cargo,
    }
}

pub fn current_body() -> Value {
    json!({
        "weather": [{ "main": "Clouds", "description": "broken clouds" }],
        "main": { "temp": 11.4, "humidity": 81 },
        "wind": { "speed": 6.2 }
    })
}

pub fn forecast_body() -> Value {
    let list: Vec<Value> = (0..12)
        .map(|step| {
            json!({
                "dt": 1_760_000_000 + step * 10_800,
                "main": { "temp": 10.0 + step as f64 * 0.5 },
                "weather": [{ "description": "light rain" }]
            })
        })
        .collect();
    json!({ "cnt": list.len(), "list": list })
}

pub fn pollution_body(latest_pm2_5: f64) -> Value {
    json!({
        "coord": { "lat": 51.9225, "lon": 4.4792 },
        "list": [
            {
                "dt": 1_760_000_000,
                "main": { "aqi": 1 },
                "components": { "pm2_5": 3.1, "pm10": 6.0, "no2": 12.0, "o3": 40.0 }
            },
            {
                "dt": 1_760_003_600,
                "main": { "aqi": 3 },
                "components": { "pm2_5": latest_pm2_5, "pm10": 52.0, "no2": 30.0, "o3": 20.0 }
            }
        ]
    })
}
