//! PM2.5 to AQI conversion using EPA-style piecewise-linear breakpoints.

use std::fmt;

use serde::{Serialize, Serializer};
use time::OffsetDateTime;

struct Breakpoint {
    conc_lo: f64,
    conc_hi: f64,
    index_lo: f64,
    index_hi: f64,
    category: &'static str,
    style: &'static str,
    advisory: &'static str,
}

const BREAKPOINTS: [Breakpoint; 6] = [
    Breakpoint {
        conc_lo: 0.0,
        conc_hi: 12.0,
        index_lo: 0.0,
        index_hi: 50.0,
        category: "Good",
        style: "aqi-good",
        advisory: "Air quality is satisfactory; outdoor port operations carry no health risk.",
    },
    Breakpoint {
        conc_lo: 12.1,
        conc_hi: 35.4,
        index_lo: 51.0,
        index_hi: 100.0,
        category: "Moderate",
        style: "aqi-moderate",
        advisory: "Acceptable air quality; unusually sensitive crew should limit prolonged exertion.",
    },
    Breakpoint {
        conc_lo: 35.5,
        conc_hi: 55.4,
        index_lo: 101.0,
        index_hi: 150.0,
        category: "Unhealthy for Sensitive Groups",
        style: "aqi-sensitive",
        advisory: "Sensitive groups should reduce extended outdoor work on the quay.",
    },
    Breakpoint {
        conc_lo: 55.5,
        conc_hi: 150.4,
        index_lo: 151.0,
        index_hi: 200.0,
        category: "Unhealthy",
        style: "aqi-unhealthy",
        advisory: "Everyone may feel effects; shorten outdoor shifts and provide masks.",
    },
    Breakpoint {
        conc_lo: 150.5,
        conc_hi: 250.4,
        index_lo: 201.0,
        index_hi: 300.0,
        category: "Very Unhealthy",
        style: "aqi-very-unhealthy",
        advisory: "Health alert; avoid prolonged outdoor cargo handling.",
    },
    Breakpoint {
        conc_lo: 250.5,
        conc_hi: 500.4,
        index_lo: 301.0,
        index_hi: 500.0,
        category: "Hazardous",
        style: "aqi-hazardous",
        advisory: "Emergency conditions; suspend non-essential outdoor operations.",
    },
];

const UNKNOWN_CATEGORY: &str = "Unknown";
const UNKNOWN_STYLE: &str = "aqi-unknown";
const UNKNOWN_ADVISORY: &str = "Air quality data is not available for this location.";

impl Breakpoint {
    fn interpolate(&self, pm25: f64) -> f64 {
        ((self.index_hi - self.index_lo) / (self.conc_hi - self.conc_lo)) * (pm25 - self.conc_lo)
            + self.index_lo
    }
}

/// Numeric index, or "N/A" when no concentration is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AqiIndex {
    Value(u32),
    NotAvailable,
}

impl AqiIndex {
    pub fn value(&self) -> Option<u32> {
        match self {
            Self::Value(value) => Some(*value),
            Self::NotAvailable => None,
        }
    }
}

impl fmt::Display for AqiIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{value}"),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

impl Serialize for AqiIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(value) => serializer.serialize_u32(*value),
            Self::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AqiReading {
    pub pm25: Option<f64>,
    pub index: AqiIndex,
    pub category: &'static str,
    pub style_tag: &'static str,
    pub advisory: &'static str,
}

impl AqiReading {
    fn unknown() -> Self {
        Self {
            pm25: None,
            index: AqiIndex::NotAvailable,
            category: UNKNOWN_CATEGORY,
            style_tag: UNKNOWN_STYLE,
            advisory: UNKNOWN_ADVISORY,
        }
    }
}

/// Convert a PM2.5 concentration (µg/m³) into an AQI reading.
///
/// Missing, negative or non-finite input gives the "N/A" reading. Values above
/// 500.4 keep the slope of the last segment instead of clamping at 500.
pub fn aqi_from_pm25(pm25: Option<f64>) -> AqiReading {
    let Some(pm25) = pm25.filter(|value| value.is_finite() && *value >= 0.0) else {
        return AqiReading::unknown();
    };

    let breakpoint = BREAKPOINTS
        .iter()
        .find(|bp| pm25 <= bp.conc_hi)
        .unwrap_or(&BREAKPOINTS[BREAKPOINTS.len() - 1]);

    let index = breakpoint.interpolate(pm25).round().max(0.0) as u32;

    AqiReading {
        pm25: Some(pm25),
        index: AqiIndex::Value(index),
        category: breakpoint.category,
        style_tag: breakpoint.style,
        advisory: breakpoint.advisory,
    }
}

/// One pollutant sample from the weather provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollutantSample {
    #[serde(with = "time::serde::rfc3339")]
    pub observed_at: OffsetDateTime,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
}

/// Most recent usable PM2.5 value from a series of samples.
pub fn latest_pm25(samples: &[PollutantSample]) -> Option<f64> {
    samples
        .iter()
        .filter(|sample| {
            sample
                .pm2_5
                .map(|value| value.is_finite() && value >= 0.0)
                .unwrap_or(false)
        })
        .max_by_key(|sample| sample.observed_at)
        .and_then(|sample| sample.pm2_5)
}
