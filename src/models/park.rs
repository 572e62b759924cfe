//! Park metadata, alerts, events and campgrounds

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::location::{GeoPoint, LocationCode};

/// Basic park metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkSummary {
    pub code: LocationCode,
    pub name: String,
    pub designation: Option<String>,
    pub description: Option<String>,
    pub states: Option<String>,
    pub url: Option<String>,
    pub coordinates: Option<GeoPoint>,
    /// Activity names advertised for the park
    pub activities: Vec<String>,
}

impl ParkSummary {
    /// Minimal summary used when only the code and a name are known
    #[must_use]
    pub fn named(code: LocationCode, name: &str) -> Self {
        Self {
            code,
            name: name.to_string(),
            designation: None,
            description: None,
            states: None,
            url: None,
            coordinates: None,
            activities: Vec::new(),
        }
    }
}

/// A park alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    /// Provider category, e.g. "Park Closure", "Caution", "Information"
    pub category: String,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl Alert {
    /// Title or category mentions a closure
    #[must_use]
    pub fn is_closure(&self) -> bool {
        let mentions = |text: &str| {
            let text = text.to_lowercase();
            text.contains("closure") || text.contains("closed")
        };
        mentions(&self.title) || mentions(&self.category)
    }
}

/// A scheduled park event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParkEvent {
    pub title: String,
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    pub location: Option<String>,
    pub is_free: Option<bool>,
}

/// A campground in or near the park
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campground {
    pub name: String,
    pub total_sites: Option<u32>,
    pub reservable_sites: Option<u32>,
    pub first_come_first_served_sites: Option<u32>,
    pub reservation_url: Option<String>,
}
