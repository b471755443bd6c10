//! Pure shipment estimation logic: distance, corridors, cost, emissions, AQI.

pub mod air_quality;
pub mod corridor;
pub mod cost;
pub mod entities;
pub mod environment;
pub mod geodesic;

pub use air_quality::{aqi_from_pm25, latest_pm25, AqiIndex, AqiReading, PollutantSample};
pub use corridor::{
    analyze_route, classify, Corridor, CorridorIntel, PortNotes, Region, RouteIntel, Waypoint,
};
pub use cost::{
    apply_cargo_surcharge, price, validate_quote, OracleQuote, OracleRequest, PricingError,
    PricingOracle, CARGO_SURCHARGE_LINE,
};
pub use entities::{
    CargoType, ContainerType, Coordinates, CostBreakdown, CostLine, Port, RequestError,
    ShipmentRequest, ShippingMethod,
};
pub use environment::{
    equivalencies, footprint_kg, impact, EnvironmentalImpact, Equivalencies, SavingsBreakdown,
    SequestrationPoint,
};
pub use geodesic::{display_km, distance_km};
