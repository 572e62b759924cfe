//! Location identifiers and geographic coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical short key for a park or protected area (e.g. `"yose"`)
///
/// Codes are normalised to trimmed lowercase so that lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationCode(String);

impl LocationCode {
    /// Create a new location code
    #[must_use]
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LocationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Identifier of an area in the facility provider's namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteAreaId(String);

impl RemoteAreaId {
    #[must_use]
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RemoteAreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An area that has been resolved into the facility provider's namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRef {
    /// Canonical code the caller asked for
    pub code: LocationCode,
    /// Identifier in the facility provider's namespace
    pub id: RemoteAreaId,
}

impl AreaRef {
    #[must_use]
    pub fn new(code: LocationCode, id: RemoteAreaId) -> Self {
        Self { code, id }
    }
}

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range values and the `0,0` placeholder
    /// some providers emit for unknown coordinates.
    #[must_use]
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let in_range = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        let placeholder = latitude == 0.0 && longitude == 0.0;
        (in_range && !placeholder).then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_code_is_normalised() {
        let code = LocationCode::new("  YOSE ");
        assert_eq!(code.as_str(), "yose");
        assert_eq!(code, LocationCode::from("yose"));
    }

    #[test]
    fn test_geo_point_rejects_placeholder_and_out_of_range() {
        assert!(GeoPoint::checked(0.0, 0.0).is_none());
        assert!(GeoPoint::checked(91.0, 10.0).is_none());
        assert!(GeoPoint::checked(37.8651, -119.5383).is_some());
    }

    #[test]
    fn test_format_coordinates() {
        let point = GeoPoint {
            latitude: 37.865_101,
            longitude: -119.538_329,
        };
        assert_eq!(point.format_coordinates(), "37.8651, -119.5383");
    }
}
