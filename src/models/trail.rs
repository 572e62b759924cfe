//! Trail and facility records produced by the aggregator

use serde::{Deserialize, Serialize};

use super::attributes::AttributeSet;
use super::location::{GeoPoint, LocationCode};

/// Outcome of the per-item detail fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Enrichment {
    /// Detail record fetched and decoded
    Enriched,
    /// Detail fetch failed; only base fields are present
    Failed { reason: String },
    /// Not fetched because the request was cancelled or hit its deadline
    Skipped,
}

/// A trail (or trail-like facility) in a park
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    /// Facility id in the provider's namespace
    pub id: String,
    pub name: String,
    /// Park the trail was listed under
    pub location: LocationCode,
    pub coordinates: Option<GeoPoint>,
    /// Provider's facility type label (e.g. "Trail", "Trailhead")
    pub facility_type: Option<String>,
    pub description: Option<String>,
    /// Length in miles
    pub length_miles: Option<f64>,
    pub difficulty: Option<String>,
    /// Elevation gain in feet
    pub elevation_gain_ft: Option<f64>,
    pub surface: Option<String>,
    /// Decoded attributes; `None` unless enrichment succeeded
    pub attributes: Option<AttributeSet>,
    pub enrichment: Enrichment,
}

impl Trail {
    /// Whether the detail fetch for this trail failed or was skipped
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        !matches!(self.enrichment, Enrichment::Enriched)
    }

    /// Capabilities decoded for this trail, empty when degraded
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        match &self.attributes {
            Some(attributes) => attributes.capabilities(),
            None => &[],
        }
    }
}

/// Optional criteria applied after decoding
///
/// A trail missing the scalar a supplied criterion needs is excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailFilter {
    pub id: Option<String>,
    /// Case-insensitive substring of the difficulty rating
    pub difficulty: Option<String>,
    /// Inclusive lower bound in miles
    pub min_length: Option<f64>,
    /// Inclusive upper bound in miles
    pub max_length: Option<f64>,
}

impl TrailFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.difficulty.is_none()
            && self.min_length.is_none()
            && self.max_length.is_none()
    }

    #[must_use]
    pub fn matches(&self, trail: &Trail) -> bool {
        if let Some(id) = &self.id {
            if trail.id != *id {
                return false;
            }
        }

        if let Some(wanted) = &self.difficulty {
            let wanted = wanted.to_lowercase();
            match &trail.difficulty {
                Some(difficulty) if difficulty.to_lowercase().contains(&wanted) => {}
                _ => return false,
            }
        }

        if self.min_length.is_some() || self.max_length.is_some() {
            let Some(length) = trail.length_miles else {
                return false;
            };
            if self.min_length.is_some_and(|min| length < min) {
                return false;
            }
            if self.max_length.is_some_and(|max| length > max) {
                return false;
            }
        }

        true
    }
}
