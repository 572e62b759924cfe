//! Static lookup tables
//!
//! Park code → facility area id, park code → display name, and opaque
//! activity/amenity id → capability name. The tables are versioned JSON data,
//! loaded once and shared read-only between the resolver and the decoder.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{LocationCode, RemoteAreaId};
use crate::{Result, TrailPlannerError};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    version: String,
    #[serde(default)]
    area_ids: HashMap<String, serde_json::Value>,
    #[serde(default)]
    display_names: HashMap<String, String>,
    #[serde(default)]
    capability_ids: HashMap<String, String>,
}

/// Immutable lookup tables
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    version: String,
    area_ids: HashMap<LocationCode, RemoteAreaId>,
    display_names: HashMap<LocationCode, String>,
    capability_ids: HashMap<String, String>,
}

impl Catalog {
    /// Tables shipped with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load tables from a JSON file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        info!(
            "Loaded catalog version {} from {}",
            catalog.version,
            path.display()
        );
        Ok(catalog)
    }

    /// Load from the configured path, or the bundled tables when none is set
    pub fn load(path: Option<&Path>) -> Result<Arc<Self>> {
        let catalog = match path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::bundled()?,
        };
        Ok(Arc::new(catalog))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(raw)
            .map_err(|e| TrailPlannerError::catalog(format!("invalid catalog JSON: {e}")))?;

        let mut area_ids = HashMap::with_capacity(file.area_ids.len());
        for (code, id) in file.area_ids {
            // ids may be written as numbers or strings
            let id = match id {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    return Err(TrailPlannerError::catalog(format!(
                        "area id for '{code}' must be a string or number, got {other}"
                    )));
                }
            };
            area_ids.insert(LocationCode::new(&code), RemoteAreaId::new(id));
        }

        let display_names = file
            .display_names
            .into_iter()
            .filter(|(_, name)| !name.trim().is_empty())
            .map(|(code, name)| (LocationCode::new(&code), name.trim().to_string()))
            .collect();

        let capability_ids = file
            .capability_ids
            .into_iter()
            .map(|(id, name)| (id.trim().to_lowercase(), name))
            .collect();

        let catalog = Self {
            version: file.version,
            area_ids,
            display_names,
            capability_ids,
        };
        debug!(
            "Catalog {}: {} area ids, {} display names, {} capability ids",
            catalog.version,
            catalog.area_ids.len(),
            catalog.display_names.len(),
            catalog.capability_ids.len()
        );
        Ok(catalog)
    }

    /// Builder used by tests and embedders that assemble tables in code
    #[must_use]
    pub fn with_area_id(mut self, code: &str, id: &str) -> Self {
        self.area_ids
            .insert(LocationCode::new(code), RemoteAreaId::new(id));
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, code: &str, name: &str) -> Self {
        if !name.trim().is_empty() {
            self.display_names
                .insert(LocationCode::new(code), name.trim().to_string());
        }
        self
    }

    #[must_use]
    pub fn with_capability(mut self, id: &str, name: &str) -> Self {
        self.capability_ids
            .insert(id.trim().to_lowercase(), name.to_string());
        self
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn area_id(&self, code: &LocationCode) -> Option<&RemoteAreaId> {
        self.area_ids.get(code)
    }

    #[must_use]
    pub fn display_name(&self, code: &LocationCode) -> Option<&str> {
        self.display_names.get(code).map(String::as_str)
    }

    /// Capability name for an opaque id; ids compare case-insensitively
    #[must_use]
    pub fn capability(&self, id: &str) -> Option<&str> {
        self.capability_ids
            .get(&id.trim().to_lowercase())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_loads() {
        let catalog = Catalog::bundled().unwrap();
        assert!(!catalog.version().is_empty());
        assert_eq!(
            catalog.area_id(&LocationCode::new("YOSE")),
            Some(&RemoteAreaId::new("2991"))
        );
        assert_eq!(
            catalog.display_name(&LocationCode::new("yell")),
            Some("Yellowstone")
        );
        assert_eq!(catalog.capability("14"), Some("Hiking"));
    }

    #[test]
    fn test_numeric_area_ids_are_accepted() {
        let catalog = Catalog::from_json(
            r#"{"version": "t", "area_ids": {"ABCD": 1234}, "capability_ids": {"X-1": "Kayaking"}}"#,
        )
        .unwrap();
        assert_eq!(
            catalog.area_id(&LocationCode::new("abcd")),
            Some(&RemoteAreaId::new("1234"))
        );
        assert_eq!(catalog.capability("x-1"), Some("Kayaking"));
    }

    #[test]
    fn test_blank_display_names_are_ignored() {
        let catalog = Catalog::from_json(
            r#"{"version": "t", "display_names": {"blnk": "  ", "zion": " Zion "}}"#,
        )
        .unwrap();
        assert_eq!(catalog.display_name(&LocationCode::new("blnk")), None);
        assert_eq!(catalog.display_name(&LocationCode::new("zion")), Some("Zion"));

        let built = Catalog::default().with_display_name("blnk", "");
        assert_eq!(built.display_name(&LocationCode::new("blnk")), None);
    }

    #[test]
    fn test_invalid_catalog_is_a_catalog_error() {
        let err = Catalog::from_json(r#"{"version": "t", "area_ids": {"abcd": [1]}}"#).unwrap_err();
        assert!(matches!(err, TrailPlannerError::Catalog { .. }));

        let err = Catalog::from_json("not json").unwrap_err();
        assert!(matches!(err, TrailPlannerError::Catalog { .. }));
    }
}
