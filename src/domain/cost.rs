//! Shipping cost breakdown: oracle base quote plus the cargo-type surcharge.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::{CargoType, CostBreakdown, CostLine, ShipmentRequest, ShippingMethod};

pub const CARGO_SURCHARGE_LINE: &str = "Cargo Type Surcharge";

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("failed to calculate shipping cost: pricing service unavailable ({0})")]
    Unavailable(String),
    #[error("failed to calculate shipping cost: malformed pricing response ({0})")]
    Malformed(String),
    #[error("invalid pricing service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl PricingError {
    /// Whether asking again with the same inputs can succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Malformed(_))
    }
}

impl From<reqwest::Error> for PricingError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Malformed(error.to_string())
        } else {
            Self::Unavailable(error.to_string())
        }
    }
}

/// Inputs handed to the pricing oracle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleRequest {
    pub distance_km: f64,
    pub total_weight_kg: f64,
    pub container_volume_code: String,
    pub method: ShippingMethod,
    pub cargo_type: CargoType,
}

impl OracleRequest {
    pub fn new(request: &ShipmentRequest, distance_km: f64) -> Self {
        Self {
            distance_km,
            total_weight_kg: request.total_weight_kg(),
            container_volume_code: request.container.volume_code().to_string(),
            method: request.method,
            cargo_type: request.cargo,
        }
    }
}

/// Raw oracle answer. Untrusted until [`validate_quote`] accepts it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OracleQuote {
    #[serde(default)]
    pub costs: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub total_cost: Option<serde_json::Value>,
}

/// Anything that can turn an [`OracleRequest`] into a base quote.
#[async_trait]
pub trait PricingOracle: Send + Sync {
    async fn quote(&self, request: &OracleRequest) -> Result<OracleQuote, PricingError>;
}

fn finite_non_negative(field: &str, value: &serde_json::Value) -> Result<f64, PricingError> {
    let number = value
        .as_f64()
        .ok_or_else(|| PricingError::Malformed(format!("{field} is not a number")))?;
    if !number.is_finite() || number < 0.0 {
        return Err(PricingError::Malformed(format!(
            "{field} must be finite and non-negative, got {number}"
        )));
    }
    Ok(number)
}

/// Check every numeric field of an oracle quote and turn it into a breakdown.
pub fn validate_quote(quote: &OracleQuote) -> Result<CostBreakdown, PricingError> {
    let total = quote
        .total_cost
        .as_ref()
        .ok_or_else(|| PricingError::Malformed("totalCost missing".to_string()))
        .and_then(|value| finite_non_negative("totalCost", value))?;

    if quote.costs.is_empty() {
        return Err(PricingError::Malformed("costs missing or empty".to_string()));
    }
    if quote.costs.contains_key(CARGO_SURCHARGE_LINE) {
        return Err(PricingError::Malformed(format!(
            "{CARGO_SURCHARGE_LINE} is applied locally and must not come from the oracle"
        )));
    }

    let lines = quote
        .costs
        .iter()
        .map(|(name, value)| {
            finite_non_negative(name, value).map(|amount| CostLine {
                name: name.clone(),
                amount,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CostBreakdown { lines, total })
}

/// Layer the cargo-type surcharge on top of a validated base breakdown.
pub fn apply_cargo_surcharge(base: CostBreakdown, cargo: CargoType) -> CostBreakdown {
    let surcharge = cargo.surcharge();
    if surcharge <= 0.0 {
        return base;
    }

    let CostBreakdown { mut lines, total } = base;
    lines.push(CostLine {
        name: CARGO_SURCHARGE_LINE.to_string(),
        amount: total * surcharge,
    });

    CostBreakdown {
        lines,
        total: total * (1.0 + surcharge),
    }
}

/// Price a shipment: ask the oracle for the base quote, validate it and add
/// the cargo surcharge. Either a complete breakdown or an error comes back.
pub async fn price<O>(
    oracle: &O,
    request: &ShipmentRequest,
    distance_km: f64,
) -> Result<CostBreakdown, PricingError>
where
    O: PricingOracle + ?Sized,
{
    let oracle_request = OracleRequest::new(request, distance_km);
    tracing::debug!(?oracle_request, "requesting base quote");

    let quote = oracle.quote(&oracle_request).await?;
    let base = validate_quote(&quote)?;

    Ok(apply_cargo_surcharge(base, request.cargo))
}
