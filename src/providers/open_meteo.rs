//! Daily weather forecasts from `OpenMeteo`

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::parse_body;
use crate::Result;
use crate::config::ProvidersConfig;
use crate::models::{ForecastDay, GeoPoint};
use crate::transport::{Headers, HttpFetcher};

/// Forecast response from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: Option<DailyData>,
}

/// Daily weather data from `OpenMeteo`
#[derive(Debug, Deserialize)]
struct DailyData {
    #[serde(default)]
    time: Vec<String>,
    #[serde(rename = "temperature_2m_max", default)]
    temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    temperature_min: Vec<Option<f64>>,
    #[serde(rename = "precipitation_probability_max", default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(rename = "weathercode", default)]
    weather_code: Vec<Option<u8>>,
}

impl DailyData {
    /// Days missing a date or either temperature are dropped
    fn into_days(self) -> Vec<ForecastDay> {
        let mut days = Vec::with_capacity(self.time.len());
        for (i, raw_date) in self.time.iter().enumerate() {
            let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") else {
                warn!("Skipping forecast entry with unparseable date '{}'", raw_date);
                continue;
            };
            let max = self.temperature_max.get(i).copied().flatten();
            let min = self.temperature_min.get(i).copied().flatten();
            let (Some(max_temp_f), Some(min_temp_f)) = (max, min) else {
                debug!("Skipping {} without temperatures", date);
                continue;
            };
            let chance_of_rain = self
                .precipitation_probability
                .get(i)
                .copied()
                .flatten()
                .map_or(0, |p| p.clamp(0.0, 100.0).round() as u8);
            let condition = self
                .weather_code
                .get(i)
                .copied()
                .flatten()
                .map_or("Unknown", weather_code_to_description)
                .to_string();

            days.push(ForecastDay {
                date,
                min_temp_f,
                max_temp_f,
                chance_of_rain,
                condition,
            });
        }
        days
    }
}

/// Convert `OpenMeteo` weather code to human-readable description
#[must_use]
pub fn weather_code_to_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Weather forecast client
pub struct OpenMeteoClient {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    forecast_days: u32,
}

impl OpenMeteoClient {
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: &ProvidersConfig) -> Self {
        Self {
            fetcher,
            base_url: config.weather_base_url.trim_end_matches('/').to_string(),
            forecast_days: config.forecast_days,
        }
    }

    /// Daily forecast in Fahrenheit for a point
    #[instrument(skip(self), fields(lat = point.latitude, lon = point.longitude))]
    pub async fn daily_forecast(&self, point: GeoPoint) -> Result<Vec<ForecastDay>> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&daily=temperature_2m_max,temperature_2m_min,precipitation_probability_max,weathercode&temperature_unit=fahrenheit&timezone=auto&forecast_days={}",
            self.base_url, point.latitude, point.longitude, self.forecast_days
        );
        let body = self.fetcher.get_json(&url, &Headers::new()).await?;
        let response: ForecastResponse = parse_body(body, "forecast")?;
        let days = response.daily.map(DailyData::into_days).unwrap_or_default();
        info!(
            "Retrieved {}-day forecast for {}",
            days.len(),
            point.format_coordinates()
        );
        Ok(days)
    }
}
