//! Client for an OpenWeather-compatible weather and air pollution API.
//!
//! Three endpoints are used: `weather` (current conditions), `forecast`
//! (3-hourly series) and `air_pollution` (pollutant concentrations).

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::{Coordinates, PollutantSample};
use crate::util::version::user_agent;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);
const FORECAST_POINTS: usize = 8;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("weather request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("weather provider error: {0}")]
    Api(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature_c: f64,
    pub humidity_pct: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ForecastPoint {
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
    pub temperature_c: f64,
    pub description: String,
}

#[derive(Clone)]
pub struct WeatherClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl WeatherClient {
    pub fn with_base_url(base: &str, api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_timeout(base, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub async fn current(&self, at: Coordinates) -> Result<CurrentConditions, WeatherError> {
        let dto: CurrentDto = self.fetch("weather", at).await?;
        Ok(CurrentConditions {
            temperature_c: dto.main.temp,
            humidity_pct: dto.main.humidity,
            wind_speed_ms: dto.wind.and_then(|wind| wind.speed),
            description: describe(&dto.weather),
        })
    }

    /// Short-term forecast, limited to the next 24 hours.
    pub async fn forecast(&self, at: Coordinates) -> Result<Vec<ForecastPoint>, WeatherError> {
        let dto: ListDto<ForecastDto> = self.fetch("forecast", at).await?;
        dto.list
            .into_iter()
            .take(FORECAST_POINTS)
            .map(|entry| {
                Ok(ForecastPoint {
                    at: timestamp(entry.dt)?,
                    temperature_c: entry.main.temp,
                    description: describe(&entry.weather),
                })
            })
            .collect()
    }

    pub async fn pollution(&self, at: Coordinates) -> Result<Vec<PollutantSample>, WeatherError> {
        let dto: ListDto<PollutionDto> = self.fetch("air_pollution", at).await?;
        dto.list
            .into_iter()
            .map(|entry| {
                Ok(PollutantSample {
                    observed_at: timestamp(entry.dt)?,
                    pm2_5: entry.components.pm2_5,
                    pm10: entry.components.pm10,
                    no2: entry.components.no2,
                    o3: entry.components.o3,
                })
            })
            .collect()
    }

    async fn fetch<T>(&self, path: &str, at: Coordinates) -> Result<T, WeatherError>
    where
        T: DeserializeOwned,
    {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair("lat", &at.lat.to_string())
            .append_pair("lon", &at.lon.to_string())
            .append_pair("units", "metric");
        tracing::debug!(%url, "requesting weather provider");

        // Key is appended after logging so it never ends up in traces.
        url.query_pairs_mut().append_pair("appid", &self.api_key);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorDto>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.to_string());
            return Err(WeatherError::Api(message));
        }
        Ok(response.json().await?)
    }
}

fn timestamp(secs: i64) -> Result<OffsetDateTime, WeatherError> {
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|err| WeatherError::Api(format!("invalid timestamp {secs}: {err}")))
}

fn describe(weather: &[DescriptionDto]) -> String {
    weather
        .first()
        .map(|entry| entry.description.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[derive(Debug, Deserialize)]
struct ErrorDto {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListDto<T> {
    #[serde(default = "Vec::new")]
    list: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct MainDto {
    temp: f64,
    #[serde(default)]
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WindDto {
    #[serde(default)]
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DescriptionDto {
    description: String,
}

#[derive(Debug, Deserialize)]
struct CurrentDto {
    main: MainDto,
    #[serde(default)]
    wind: Option<WindDto>,
    #[serde(default)]
    weather: Vec<DescriptionDto>,
}

#[derive(Debug, Deserialize)]
struct ForecastDto {
    dt: i64,
    main: MainDto,
    #[serde(default)]
    weather: Vec<DescriptionDto>,
}

#[derive(Debug, Deserialize)]
struct ComponentsDto {
    #[serde(default)]
    pm2_5: Option<f64>,
    #[serde(default)]
    pm10: Option<f64>,
    #[serde(default)]
    no2: Option<f64>,
    #[serde(default)]
    o3: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct PollutionDto {
    dt: i64,
    components: ComponentsDto,
}
