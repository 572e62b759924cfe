//! Upstream provider clients
//!
//! Each provider has explicit response schemas. Bodies are validated and
//! converted to domain models here, so nothing past this boundary sees raw
//! provider JSON except the attribute containers handed to the decoder.
//!
//! - `ridb`: recreation areas and facilities (area search, facility lists, details)
//! - `nps`: park metadata, alerts, events and campgrounds
//! - `open_meteo`: daily weather forecasts

pub mod nps;
pub mod open_meteo;
pub mod ridb;

pub use nps::NpsClient;
pub use open_meteo::OpenMeteoClient;
pub use ridb::{AreaCandidate, FacilityRecord, RidbClient};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{Result, TrailPlannerError};

/// Deserialize a body into its schema, reporting which call it came from
pub(crate) fn parse_body<T: serde::de::DeserializeOwned>(body: Value, what: &str) -> Result<T> {
    serde_json::from_value(body)
        .map_err(|e| TrailPlannerError::decode(format!("invalid {what} response: {e}")))
}

/// Ids arrive as numbers from some endpoints and strings from others
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

/// Numbers that may be sent as numbers, numeric strings, empty strings or null
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Counts that may be sent as numbers or numeric strings
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?
        .filter(|n| n.is_finite() && *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n as u32))
}

/// Treat empty strings as missing
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "string_or_number")]
        id: String,
        #[serde(default, deserialize_with = "lenient_f64")]
        lat: Option<f64>,
        #[serde(default, deserialize_with = "lenient_u32")]
        count: Option<u32>,
    }

    #[test]
    fn test_lenient_fields() {
        let sample: Sample = serde_json::from_value(json!({"id": 12, "lat": "37.5", "count": "40"})).unwrap();
        assert_eq!(sample.id, "12");
        assert_eq!(sample.lat, Some(37.5));
        assert_eq!(sample.count, Some(40));

        let sample: Sample = serde_json::from_value(json!({"id": "x", "lat": "", "count": null})).unwrap();
        assert_eq!(sample.lat, None);
        assert_eq!(sample.count, None);

        let sample: Sample = serde_json::from_value(json!({"id": "x"})).unwrap();
        assert_eq!(sample.lat, None);
    }

    #[test]
    fn test_parse_body_reports_decode_error() {
        let err = parse_body::<Sample>(json!({"lat": 1}), "sample").unwrap_err();
        assert!(matches!(err, TrailPlannerError::Decode { .. }));
        assert!(err.to_string().contains("sample"));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" a ".to_string())), Some("a".to_string()));
    }
}
