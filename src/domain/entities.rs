use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point on the globe in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Port entry from the port directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Unique display name, e.g. "Shanghai, China".
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub restricted_items: Vec<String>,
    #[serde(default)]
    pub documents: Vec<String>,
}

impl Port {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Country portion of a port name: text after the last comma, or the whole
/// name for city-states such as "Singapore".
pub fn country_of(port_name: &str) -> &str {
    port_name
        .rsplit_once(',')
        .map(|(_, country)| country)
        .unwrap_or(port_name)
        .trim()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerType {
    Small,
    #[default]
    Standard,
    HighCube,
}

impl ContainerType {
    pub const ALL: [ContainerType; 3] = [Self::Small, Self::Standard, Self::HighCube];

    /// Opaque volumetric code handed to the pricing oracle.
    pub fn volume_code(&self) -> &'static str {
        match self {
            Self::Small => "20GP",
            Self::Standard => "40GP",
            Self::HighCube => "40HC",
        }
    }

    /// Usable capacity in cubic metres.
    pub fn capacity_m3(&self) -> f64 {
        match self {
            Self::Small => 33.2,
            Self::Standard => 67.7,
            Self::HighCube => 76.4,
        }
    }

    pub fn base_cost(&self) -> f64 {
        match self {
            Self::Small => 1000.0,
            Self::Standard => 1800.0,
            Self::HighCube => 2100.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "20ft Standard",
            Self::Standard => "40ft Standard",
            Self::HighCube => "40ft High Cube",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingMethod {
    #[default]
    Standard,
    Express,
    Premium,
    Eco,
}

impl ShippingMethod {
    pub fn rate_multiplier(&self) -> f64 {
        match self {
            Self::Standard => 1.0,
            Self::Express => 1.5,
            Self::Premium => 2.0,
            Self::Eco => 0.85,
        }
    }

    /// Emission factor in kg CO₂e per tonne-kilometre.
    pub fn emission_factor(&self) -> f64 {
        match self {
            Self::Standard => 0.015,
            Self::Express => 0.025,
            Self::Premium => 0.030,
            Self::Eco => 0.010,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Express => "express",
            Self::Premium => "premium",
            Self::Eco => "eco",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Standard => "Standard Shipping",
            Self::Express => "Express Shipping",
            Self::Premium => "Premium Shipping",
            Self::Eco => "Eco-Friendly Shipping",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CargoType {
    #[default]
    Normal,
    Fragile,
    Perishable,
    Hazardous,
}

impl CargoType {
    /// Fractional surcharge applied on top of the oracle total.
    pub fn surcharge(&self) -> f64 {
        match self {
            Self::Normal => 0.0,
            Self::Fragile => 0.15,
            Self::Perishable => 0.25,
            Self::Hazardous => 0.40,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Fragile => "fragile",
            Self::Perishable => "perishable",
            Self::Hazardous => "hazardous",
        }
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ShippingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for CargoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("weight per item must be a positive number, got {0}")]
    InvalidWeight(f64),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
}

/// One user interaction's worth of shipment inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub origin: String,
    pub destination: String,
    pub weight_per_item_kg: f64,
    pub quantity: u32,
    #[serde(default)]
    pub container: ContainerType,
    #[serde(default)]
    pub method: ShippingMethod,
    #[serde(default)]
    pub cargo: CargoType,
}

impl ShipmentRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if !self.weight_per_item_kg.is_finite() || self.weight_per_item_kg <= 0.0 {
            return Err(RequestError::InvalidWeight(self.weight_per_item_kg));
        }
        if self.quantity == 0 {
            return Err(RequestError::ZeroQuantity);
        }
        Ok(())
    }

    pub fn total_weight_kg(&self) -> f64 {
        self.weight_per_item_kg * self.quantity as f64
    }
}

/// A single named line of a cost breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub name: String,
    pub amount: f64,
}

/// Complete cost breakdown; line order is the order the oracle reported,
/// followed by any locally layered surcharge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub lines: Vec<CostLine>,
    pub total: f64,
}

impl CostBreakdown {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.lines
            .iter()
            .find(|line| line.name == name)
            .map(|line| line.amount)
    }
}
