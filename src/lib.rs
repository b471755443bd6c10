//! Maritime shipment estimates: trade corridor intelligence, cost breakdowns,
//! carbon impact and destination air quality.

pub mod app;
pub mod domain;
pub mod infra;
pub mod util;

pub use app::{
    AirQualityPanel, EstimateError, Estimator, PanelState, Quote, QuoteOutcome, ShipmentReport,
};
