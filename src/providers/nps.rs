//! Park service API client: park metadata, alerts, events and campgrounds

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{lenient_f64, lenient_u32, non_empty, parse_body};
use crate::Result;
use crate::config::ProvidersConfig;
use crate::models::{Alert, Campground, GeoPoint, LocationCode, ParkEvent, ParkSummary};
use crate::transport::{Headers, HttpFetcher};

/// Every endpoint wraps its records in `data`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParkRecord {
    #[serde(default)]
    park_code: String,
    #[serde(default)]
    full_name: String,
    designation: Option<String>,
    description: Option<String>,
    states: Option<String>,
    url: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
    #[serde(default)]
    activities: Vec<NamedRecord>,
}

#[derive(Debug, Deserialize)]
struct NamedRecord {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AlertRecord {
    #[serde(default)]
    title: String,
    #[serde(default)]
    category: String,
    description: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    #[serde(default)]
    title: String,
    #[serde(rename = "datestart")]
    date_start: Option<String>,
    #[serde(rename = "dateend")]
    date_end: Option<String>,
    location: Option<String>,
    #[serde(rename = "isfree")]
    is_free: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampgroundRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    campsites: Option<CampsiteCounts>,
    #[serde(default, deserialize_with = "lenient_u32")]
    number_of_sites_reservable: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    number_of_sites_first_come_first_serve: Option<u32>,
    reservation_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampsiteCounts {
    #[serde(default, deserialize_with = "lenient_u32")]
    total_sites: Option<u32>,
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()
}

fn parse_flag(raw: Option<&serde_json::Value>) -> Option<bool> {
    match raw? {
        serde_json::Value::Bool(b) => Some(*b),
        serde_json::Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

impl ParkRecord {
    fn into_summary(self, requested: &LocationCode) -> ParkSummary {
        let code = if self.park_code.trim().is_empty() {
            requested.clone()
        } else {
            LocationCode::new(&self.park_code)
        };
        let coordinates = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => GeoPoint::checked(lat, lon),
            _ => None,
        };
        ParkSummary {
            code,
            name: self.full_name,
            designation: non_empty(self.designation),
            description: non_empty(self.description),
            states: non_empty(self.states),
            url: non_empty(self.url),
            coordinates,
            activities: self
                .activities
                .into_iter()
                .map(|a| a.name)
                .filter(|name| !name.trim().is_empty())
                .collect(),
        }
    }
}

/// Park service API client
pub struct NpsClient {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    headers: Headers,
}

impl NpsClient {
    /// Create a new client
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: &ProvidersConfig) -> Self {
        let mut headers = Headers::new();
        if let Some(api_key) = &config.nps_api_key {
            headers.insert("X-Api-Key".to_string(), api_key.clone());
        }
        Self {
            fetcher,
            base_url: config.nps_base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        code: &LocationCode,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/{endpoint}?parkCode={}",
            self.base_url,
            urlencoding::encode(code.as_str())
        );
        let body = self.fetcher.get_json(&url, &self.headers).await?;
        let envelope: Envelope<T> = parse_body(body, endpoint)?;
        debug!("{} for {}: {} records", endpoint, code, envelope.data.len());
        Ok(envelope.data)
    }

    /// Park metadata, `None` when the code is unknown upstream
    #[instrument(skip(self), fields(park = %code))]
    pub async fn park(&self, code: &LocationCode) -> Result<Option<ParkSummary>> {
        let records: Vec<ParkRecord> = self.fetch("parks", code).await?;
        Ok(records
            .into_iter()
            .next()
            .map(|record| record.into_summary(code)))
    }

    #[instrument(skip(self), fields(park = %code))]
    pub async fn alerts(&self, code: &LocationCode) -> Result<Vec<Alert>> {
        let records: Vec<AlertRecord> = self.fetch("alerts", code).await?;
        Ok(records
            .into_iter()
            .map(|r| Alert {
                title: r.title,
                category: r.category,
                description: non_empty(r.description),
                url: non_empty(r.url),
            })
            .collect())
    }

    #[instrument(skip(self), fields(park = %code))]
    pub async fn events(&self, code: &LocationCode) -> Result<Vec<ParkEvent>> {
        let records: Vec<EventRecord> = self.fetch("events", code).await?;
        Ok(records
            .into_iter()
            .map(|r| ParkEvent {
                title: r.title,
                date_start: parse_date(r.date_start.as_deref()),
                date_end: parse_date(r.date_end.as_deref()),
                location: non_empty(r.location),
                is_free: parse_flag(r.is_free.as_ref()),
            })
            .collect())
    }

    #[instrument(skip(self), fields(park = %code))]
    pub async fn campgrounds(&self, code: &LocationCode) -> Result<Vec<Campground>> {
        let records: Vec<CampgroundRecord> = self.fetch("campgrounds", code).await?;
        Ok(records
            .into_iter()
            .map(|r| Campground {
                name: r.name,
                total_sites: r.campsites.and_then(|c| c.total_sites),
                reservable_sites: r.number_of_sites_reservable,
                first_come_first_served_sites: r.number_of_sites_first_come_first_serve,
                reservation_url: non_empty(r.reservation_url),
            })
            .collect())
    }
}
