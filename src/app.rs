//! Orchestration: derives every panel from the current inputs.
//!
//! Each call recomputes from scratch. Quote requests carry a generation
//! ticket so that a response arriving after a newer request was issued is
//! discarded instead of overwriting fresher output.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::{
    domain::{
        analyze_route, aqi_from_pm25, distance_km, environment, latest_pm25, price, AqiReading,
        CostBreakdown, EnvironmentalImpact, PollutantSample, PricingError, PricingOracle,
        RequestError, RouteIntel, ShipmentRequest, ShippingMethod,
    },
    infra::{
        ports::{DirectoryError, PortDirectory},
        pricing::{PricingClient, RateTableOracle},
        weather::{CurrentConditions, ForecastPoint, WeatherClient, WeatherError},
    },
    util::settings::Settings,
};

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("unknown port: {0}")]
    UnknownPort(String),
    #[error(transparent)]
    Pricing(#[from] PricingError),
    #[error(transparent)]
    Weather(#[from] WeatherError),
    #[error("no weather provider configured")]
    WeatherUnavailable,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl EstimateError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Pricing(err) => err.is_retryable(),
            Self::Weather(WeatherError::Http(_)) | Self::Weather(WeatherError::Api(_)) => true,
            _ => false,
        }
    }
}

/// A completed cost calculation together with the inputs it belongs to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Quote {
    pub request: ShipmentRequest,
    pub distance_km: f64,
    pub breakdown: CostBreakdown,
    pub environment: EnvironmentalImpact,
}

#[derive(Clone, Debug, PartialEq)]
pub enum QuoteOutcome {
    Completed(Quote),
    /// A newer request was issued while this one was in flight.
    Superseded,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AirQualityPanel {
    pub port: String,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
    pub pollution: Vec<PollutantSample>,
    pub reading: AqiReading,
}

/// Per-panel result so one failing panel never hides another.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PanelState<T> {
    Ready { data: T },
    Failed { message: String, retryable: bool },
    Superseded,
}

impl<T> PanelState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready { data } => Some(data),
            _ => None,
        }
    }

    fn failed(error: &EstimateError) -> Self {
        Self::Failed {
            message: error.to_string(),
            retryable: error.is_retryable(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShipmentReport {
    pub route: RouteIntel,
    pub cost: PanelState<Quote>,
    pub air_quality: PanelState<AirQualityPanel>,
}

pub struct Estimator {
    ports: PortDirectory,
    oracle: Arc<dyn PricingOracle>,
    weather: Option<WeatherClient>,
    generation: AtomicU64,
    latest: Mutex<Option<Quote>>,
}

impl Estimator {
    pub fn new(
        ports: PortDirectory,
        oracle: Arc<dyn PricingOracle>,
        weather: Option<WeatherClient>,
    ) -> Self {
        Self {
            ports,
            oracle,
            weather,
            generation: AtomicU64::new(0),
            latest: Mutex::new(None),
        }
    }

    /// Wire up collaborators from settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, EstimateError> {
        let ports = match settings.ports_file.as_deref() {
            Some(path) => PortDirectory::from_file(path)?,
            None => PortDirectory::embedded()?,
        };

        let oracle: Arc<dyn PricingOracle> = match settings.pricing_url.as_deref() {
            Some(url) => {
                tracing::info!(url, "using remote pricing oracle");
                Arc::new(PricingClient::with_timeout(url, settings.request_timeout())?)
            }
            None => {
                tracing::info!("using local rate table for pricing");
                Arc::new(RateTableOracle::default())
            }
        };

        let weather = match settings.weather_api_key.as_deref() {
            Some(key) => Some(WeatherClient::with_timeout(
                &settings.weather_url,
                key,
                settings.request_timeout(),
            )?),
            None => {
                tracing::warn!("no weather API key configured; air quality disabled");
                None
            }
        };

        Ok(Self::new(ports, oracle, weather))
    }

    pub fn ports(&self) -> &PortDirectory {
        &self.ports
    }

    /// Route intelligence panel. Never fails; unknown ports degrade.
    pub fn route(&self, origin: &str, destination: &str) -> RouteIntel {
        analyze_route(
            origin,
            self.ports.lookup(origin),
            destination,
            self.ports.lookup(destination),
        )
    }

    /// Price a shipment and derive its environmental impact.
    pub async fn quote(&self, request: &ShipmentRequest) -> Result<QuoteOutcome, EstimateError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        request.validate()?;

        let origin = self
            .ports
            .lookup(&request.origin)
            .ok_or_else(|| EstimateError::UnknownPort(request.origin.clone()))?;
        let destination = self
            .ports
            .lookup(&request.destination)
            .ok_or_else(|| EstimateError::UnknownPort(request.destination.clone()))?;

        let distance_km = distance_km(origin.coordinates(), destination.coordinates());
        let priced = price(self.oracle.as_ref(), request, distance_km).await;

        // Generation check and store happen under the same lock.
        let mut latest = self.latest.lock().await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            tracing::debug!(ticket, "discarding superseded quote");
            return Ok(QuoteOutcome::Superseded);
        }

        let breakdown = match priced {
            Ok(breakdown) => breakdown,
            Err(err) => {
                tracing::warn!(error = %err, "pricing failed");
                *latest = None;
                return Err(err.into());
            }
        };

        let total_weight = request.total_weight_kg();
        let selected = environment::footprint_kg(distance_km, total_weight, request.method);
        let eco = environment::footprint_kg(distance_km, total_weight, ShippingMethod::Eco);

        let quote = Quote {
            request: request.clone(),
            distance_km,
            breakdown,
            environment: environment::impact(selected, eco),
        };

        tracing::info!(
            origin = %request.origin,
            destination = %request.destination,
            total = quote.breakdown.total,
            "quote completed"
        );
        *latest = Some(quote.clone());

        Ok(QuoteOutcome::Completed(quote))
    }

    /// Last accepted quote, only if it was computed for exactly these inputs.
    pub async fn latest_quote(&self, request: &ShipmentRequest) -> Option<Quote> {
        self.latest
            .lock()
            .await
            .as_ref()
            .filter(|quote| &quote.request == request)
            .cloned()
    }

    /// Weather, forecast and AQI for a port, fetched concurrently.
    pub async fn air_quality(&self, port_name: &str) -> Result<AirQualityPanel, EstimateError> {
        let port = self
            .ports
            .lookup(port_name)
            .ok_or_else(|| EstimateError::UnknownPort(port_name.to_string()))?;
        let client = self.weather.as_ref().ok_or(EstimateError::WeatherUnavailable)?;
        let at = port.coordinates();

        let (current, forecast, pollution) =
            tokio::try_join!(client.current(at), client.forecast(at), client.pollution(at))?;
        let reading = aqi_from_pm25(latest_pm25(&pollution));

        Ok(AirQualityPanel {
            port: port.name.clone(),
            current,
            forecast,
            pollution,
            reading,
        })
    }

    /// All panels for one request. Cost and weather run in parallel and fail
    /// independently.
    pub async fn report(&self, request: &ShipmentRequest) -> ShipmentReport {
        let route = self.route(&request.origin, &request.destination);

        let (cost, air_quality) =
            tokio::join!(self.quote(request), self.air_quality(&request.destination));

        let cost = match cost {
            Ok(QuoteOutcome::Completed(quote)) => PanelState::Ready { data: quote },
            Ok(QuoteOutcome::Superseded) => PanelState::Superseded,
            Err(err) => PanelState::failed(&err),
        };
        let air_quality = match air_quality {
            Ok(panel) => PanelState::Ready { data: panel },
            Err(err) => {
                tracing::warn!(error = %err, "air quality panel failed");
                PanelState::failed(&err)
            }
        };

        ShipmentReport {
            route,
            cost,
            air_quality,
        }
    }
}
