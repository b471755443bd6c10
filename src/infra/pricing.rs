//! Pricing oracle implementations.
//!
//! - [`PricingClient`] talks to a remote pricing service over HTTP.
//! - [`RateTableOracle`] computes a base quote locally from fixed rates and is
//!   used when no remote service is configured.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::{Map, Value};

use crate::domain::{ContainerType, OracleQuote, OracleRequest, PricingError, PricingOracle};
use crate::util::version::user_agent;

const CALCULATE_PATH: &str = "calculate";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct PricingClient {
    http: Client,
    base_url: Url,
}

impl PricingClient {
    pub fn new(base: &str) -> Result<Self, PricingError> {
        Self::with_timeout(base, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base: &str, timeout: Duration) -> Result<Self, PricingError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()
            .map_err(|err| PricingError::Unavailable(err.to_string()))?;
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

#[async_trait]
impl PricingOracle for PricingClient {
    async fn quote(&self, request: &OracleRequest) -> Result<OracleQuote, PricingError> {
        let url = self.url(CALCULATE_PATH)?;
        tracing::debug!(%url, "requesting pricing oracle");

        let response = self
            .http
            .post(url.clone())
            .json(request)
            .send()
            .await?
            .error_for_status()?;
        let quote: OracleQuote = response.json().await?;

        tracing::debug!(
            %url,
            lines = quote.costs.len(),
            "pricing oracle responded"
        );
        Ok(quote)
    }
}

/// Rates used by the local oracle.
#[derive(Clone, Debug, PartialEq)]
pub struct RateTable {
    /// Per kilometre for a 20ft container; larger boxes scale by capacity.
    pub per_km: f64,
    pub per_kg: f64,
    pub handling_fee: f64,
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            per_km: 0.12,
            per_kg: 0.05,
            handling_fee: 150.0,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RateTableOracle {
    rates: RateTable,
}

impl RateTableOracle {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    fn container(code: &str) -> Result<ContainerType, PricingError> {
        ContainerType::ALL
            .into_iter()
            .find(|container| container.volume_code() == code)
            .ok_or_else(|| PricingError::Malformed(format!("unknown container code {code}")))
    }

    pub fn compute(&self, request: &OracleRequest) -> Result<OracleQuote, PricingError> {
        if !request.distance_km.is_finite() || request.distance_km < 0.0 {
            return Err(PricingError::Malformed(format!(
                "distance must be finite and non-negative, got {}",
                request.distance_km
            )));
        }
        let container = Self::container(&request.container_volume_code)?;
        let small_capacity = ContainerType::Small.capacity_m3();

        let base = container.base_cost();
        let distance =
            request.distance_km * self.rates.per_km * (container.capacity_m3() / small_capacity);
        let weight = request.total_weight_kg * self.rates.per_kg;
        let handling = self.rates.handling_fee;
        let subtotal = base + distance + weight + handling;

        let mut costs = Map::new();
        costs.insert("Base Container Cost".to_string(), Value::from(base));
        costs.insert("Distance Charge".to_string(), Value::from(distance));
        costs.insert("Weight Charge".to_string(), Value::from(weight));
        costs.insert("Handling Fee".to_string(), Value::from(handling));

        let multiplier = request.method.rate_multiplier();
        let total = if multiplier > 1.0 {
            let premium = subtotal * (multiplier - 1.0);
            costs.insert("Shipping Method Premium".to_string(), Value::from(premium));
            subtotal + premium
        } else if multiplier < 1.0 {
            let discount = subtotal * (1.0 - multiplier);
            costs.insert("Eco Discount".to_string(), Value::from(discount));
            subtotal - discount
        } else {
            subtotal
        };

        Ok(OracleQuote {
            costs,
            total_cost: Some(Value::from(total)),
        })
    }
}

#[async_trait]
impl PricingOracle for RateTableOracle {
    async fn quote(&self, request: &OracleRequest) -> Result<OracleQuote, PricingError> {
        self.compute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{validate_quote, CargoType, ShippingMethod};

    fn request(method: ShippingMethod, code: &str) -> OracleRequest {
        OracleRequest {
            distance_km: 1000.0,
            total_weight_kg: 2000.0,
            container_volume_code: code.to_string(),
            method,
            cargo_type: CargoType::Normal,
        }
    }

    #[test]
    fn standard_rate_is_plain_subtotal() {
        let quote = RateTableOracle::default()
            .compute(&request(ShippingMethod::Standard, "20GP"))
            .unwrap();
        let breakdown = validate_quote(&quote).unwrap();

        // 1000 base + 120 distance + 100 weight + 150 handling
        assert!((breakdown.total - 1370.0).abs() < 1e-9);
        assert_eq!(breakdown.lines.len(), 4);
        assert_eq!(breakdown.lines[0].name, "Base Container Cost");
    }

    #[test]
    fn express_adds_premium_line() {
        let quote = RateTableOracle::default()
            .compute(&request(ShippingMethod::Express, "20GP"))
            .unwrap();
        let breakdown = validate_quote(&quote).unwrap();

        assert!((breakdown.total - 1370.0 * 1.5).abs() < 1e-9);
        assert!((breakdown.get("Shipping Method Premium").unwrap() - 685.0).abs() < 1e-9);
    }

    #[test]
    fn eco_discount_is_non_negative_line() {
        let quote = RateTableOracle::default()
            .compute(&request(ShippingMethod::Eco, "20GP"))
            .unwrap();
        let breakdown = validate_quote(&quote).unwrap();

        assert!((breakdown.total - 1370.0 * 0.85).abs() < 1e-9);
        assert!(breakdown.get("Eco Discount").unwrap() > 0.0);
    }

    #[test]
    fn larger_containers_cost_more_per_km() {
        let oracle = RateTableOracle::default();
        let breakdown = |code| {
            let quote = oracle.compute(&request(ShippingMethod::Standard, code)).unwrap();
            validate_quote(&quote).unwrap()
        };
        let small = breakdown("20GP");
        let cube = breakdown("40HC");
        assert!(cube.get("Distance Charge").unwrap() > small.get("Distance Charge").unwrap());
    }

    #[test]
    fn unknown_container_code_is_rejected() {
        let result = RateTableOracle::default().compute(&request(ShippingMethod::Standard, "53FT"));
        assert!(matches!(result, Err(PricingError::Malformed(_))));
    }
}
