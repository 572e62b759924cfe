//! Recreation facility API client (recreation.gov RIDB)

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::{lenient_f64, non_empty, parse_body, string_or_number};
use crate::Result;
use crate::config::ProvidersConfig;
use crate::models::{GeoPoint, RemoteAreaId};
use crate::transport::{Headers, HttpFetcher};

const PAGE_LIMIT: u32 = 50;

/// Recreation area search response
#[derive(Debug, Deserialize)]
struct RecAreaResponse {
    #[serde(rename = "RECDATA", default)]
    recdata: Vec<RecAreaRecord>,
}

#[derive(Debug, Deserialize)]
struct RecAreaRecord {
    #[serde(rename = "RecAreaID", deserialize_with = "string_or_number")]
    id: String,
    #[serde(rename = "RecAreaName", default)]
    name: String,
}

/// Facility list response
#[derive(Debug, Deserialize)]
struct FacilityListResponse {
    #[serde(rename = "RECDATA", default)]
    recdata: Vec<FacilityRecord>,
}

/// Base fields of a facility as listed under a recreation area
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacilityRecord {
    #[serde(rename = "FacilityID", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "FacilityName", default)]
    pub name: String,
    #[serde(rename = "FacilityTypeDescription", default)]
    pub type_description: Option<String>,
    #[serde(rename = "FacilityDescription", default)]
    pub description: Option<String>,
    #[serde(rename = "FacilityLatitude", default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(rename = "FacilityLongitude", default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

impl FacilityRecord {
    #[must_use]
    pub fn coordinates(&self) -> Option<GeoPoint> {
        GeoPoint::checked(self.latitude?, self.longitude?)
    }

    /// Type descriptor or name mentions "trail"
    #[must_use]
    pub fn signals_trail(&self) -> bool {
        let mentions = |text: &str| text.to_lowercase().contains("trail");
        self.type_description.as_deref().is_some_and(mentions) || mentions(&self.name)
    }

    #[must_use]
    pub fn type_label(&self) -> Option<String> {
        non_empty(self.type_description.clone())
    }

    #[must_use]
    pub fn description_text(&self) -> Option<String> {
        non_empty(self.description.clone())
    }
}

/// A recreation area returned by a name search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaCandidate {
    pub id: RemoteAreaId,
    pub name: String,
}

/// Recreation facility API client
pub struct RidbClient {
    fetcher: Arc<dyn HttpFetcher>,
    base_url: String,
    headers: Headers,
}

impl RidbClient {
    /// Create a new client
    #[must_use]
    pub fn new(fetcher: Arc<dyn HttpFetcher>, config: &ProvidersConfig) -> Self {
        let mut headers = Headers::new();
        if let Some(api_key) = &config.ridb_api_key {
            headers.insert("apikey".to_string(), api_key.clone());
        }
        Self {
            fetcher,
            base_url: config.ridb_base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    /// Search recreation areas by name
    #[instrument(skip(self))]
    pub async fn search_areas(&self, name: &str) -> Result<Vec<AreaCandidate>> {
        let url = format!(
            "{}/recareas?query={}&limit={PAGE_LIMIT}",
            self.base_url,
            urlencoding::encode(name)
        );
        let body = self.fetcher.get_json(&url, &self.headers).await?;
        let response: RecAreaResponse = parse_body(body, "recreation area search")?;

        let candidates: Vec<AreaCandidate> = response
            .recdata
            .into_iter()
            .map(|area| AreaCandidate {
                id: RemoteAreaId::new(area.id),
                name: area.name,
            })
            .collect();
        info!("Area search for '{}' returned {} candidates", name, candidates.len());
        Ok(candidates)
    }

    /// Facilities listed under a recreation area
    #[instrument(skip(self), fields(area = %area_id))]
    pub async fn area_facilities(&self, area_id: &RemoteAreaId) -> Result<Vec<FacilityRecord>> {
        let url = format!(
            "{}/recareas/{}/facilities?limit={PAGE_LIMIT}",
            self.base_url,
            urlencoding::encode(area_id.as_str())
        );
        let body = self.fetcher.get_json(&url, &self.headers).await?;
        let response: FacilityListResponse = parse_body(body, "facility list")?;
        debug!("Area {} lists {} facilities", area_id, response.recdata.len());
        Ok(response.recdata)
    }

    /// Facilities matching a keyword query across all areas
    #[instrument(skip(self))]
    pub async fn search_facilities(&self, query: &str) -> Result<Vec<FacilityRecord>> {
        let url = format!(
            "{}/facilities?query={}&limit={PAGE_LIMIT}",
            self.base_url,
            urlencoding::encode(query)
        );
        let body = self.fetcher.get_json(&url, &self.headers).await?;
        let response: FacilityListResponse = parse_body(body, "facility search")?;
        debug!("Facility search '{}' returned {} results", query, response.recdata.len());
        Ok(response.recdata)
    }

    /// Full facility record; its attribute containers go to the decoder as-is
    pub async fn facility_detail(&self, facility_id: &str) -> Result<Value> {
        let url = format!(
            "{}/facilities/{}?full=true",
            self.base_url,
            urlencoding::encode(facility_id)
        );
        self.fetcher.get_json(&url, &self.headers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_facility_record_parsing() {
        let record: FacilityRecord = serde_json::from_value(json!({
            "FacilityID": 233262,
            "FacilityName": "Mist Trail",
            "FacilityTypeDescription": "Trail",
            "FacilityDescription": "",
            "FacilityLatitude": 37.7271,
            "FacilityLongitude": "-119.5530"
        }))
        .unwrap();
        assert_eq!(record.id, "233262");
        assert!(record.signals_trail());
        assert_eq!(record.description_text(), None);
        let point = record.coordinates().unwrap();
        assert_eq!(point.longitude, -119.553);
    }

    #[test]
    fn test_trail_signal_from_name_or_type() {
        let record = |name: &str, kind: Option<&str>| FacilityRecord {
            id: "1".to_string(),
            name: name.to_string(),
            type_description: kind.map(str::to_string),
            description: None,
            latitude: None,
            longitude: None,
        };
        assert!(record("Upper Yosemite Fall TRAIL", None).signals_trail());
        assert!(record("Glacier Point", Some("Trailhead")).signals_trail());
        assert!(!record("Wawona Campground", Some("Campground")).signals_trail());
    }

    #[test]
    fn test_missing_recdata_is_empty() {
        let response: FacilityListResponse = serde_json::from_value(json!({"METADATA": {}})).unwrap();
        assert!(response.recdata.is_empty());
    }
}
