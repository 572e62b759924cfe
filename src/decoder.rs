//! Attribute decoding
//!
//! Facility providers describe attributes in four incompatible ways. A raw
//! container is first classified into the [`RawShape`]s it contains, each
//! shape is decoded by its own function, and the partial results are merged
//! into one [`AttributeSet`]:
//!
//! - [`RawShape::FlatList`]: `[{"name": "Trail Length", "value": "4.5"}, ...]`
//! - [`RawShape::Nested`]: `{"ATTRIBUTES": [{"AttributeName": ..., "AttributeValue": ...}]}`
//! - [`RawShape::IdFlags`]: `{"A59947B7-...": "Yes"}` with ids from the catalog
//! - [`RawShape::Freeform`]: `{"activities": "[\"Hiking\", {\"id\": \"14\"}]"}` or `"Hiking, Camping"`
//!
//! Decoding never fails. Malformed values simply produce fewer attributes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::Catalog;
use crate::models::{AttributeSet, AttributeValue};

const PAIR_NAME_KEYS: &[&str] = &["name", "key", "Name", "AttributeName", "attribute_name"];
const PAIR_VALUE_KEYS: &[&str] = &["value", "Value", "AttributeValue", "attribute_value"];
const NESTED_LIST_KEYS: &[&str] = &["attributes", "ATTRIBUTES", "Attributes", "items", "values"];
const FLAG_CONTAINER_KEYS: &[&str] = &["amenities", "AMENITIES", "features"];
const FREEFORM_KEYS: &[&str] = &["activities", "ACTIVITIES", "Activities", "ACTIVITY"];
const ITEM_NAME_KEYS: &[&str] = &["name", "Name", "ActivityName"];
const ITEM_ID_KEYS: &[&str] = &["id", "ID", "ActivityID"];

const LENGTH_NAMES: &[&str] = &["Trail Length", "Length", "Length (miles)", "TrailLength"];
const DIFFICULTY_NAMES: &[&str] = &["Difficulty", "Trail Difficulty", "TrailDifficulty"];
const ELEVATION_GAIN_NAMES: &[&str] = &["Elevation Gain", "Trail Elevation Gain", "ElevationGain"];
const SURFACE_NAMES: &[&str] = &["Surface Type", "Trail Surface", "Surface", "Trail Type"];

/// One recognised encoding found inside a raw attribute container
#[derive(Debug, Clone, PartialEq)]
pub enum RawShape<'a> {
    /// Top-level list of name/value pairs
    FlatList(&'a [Value]),
    /// Pair list held under a field of an outer object
    Nested(&'a [Value]),
    /// Opaque ids mapped to "Yes"/"No" flags
    IdFlags(Vec<(&'a str, &'a Value)>),
    /// Activities as a JSON-array string, comma-separated string, or array
    Freeform(&'a Value),
}

/// Scalars the aggregator reads off a decoded attribute set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrailScalars {
    pub length_miles: Option<f64>,
    pub difficulty: Option<String>,
    pub elevation_gain_ft: Option<f64>,
    pub surface: Option<String>,
}

impl TrailScalars {
    #[must_use]
    pub fn from_attributes(attributes: &AttributeSet) -> Self {
        let number = |names: &[&str]| attributes.first_of(names).and_then(AttributeValue::as_number);
        let text = |names: &[&str]| {
            attributes
                .first_of(names)
                .and_then(AttributeValue::as_text)
                .map(str::to_string)
        };
        Self {
            length_miles: number(LENGTH_NAMES),
            difficulty: text(DIFFICULTY_NAMES),
            elevation_gain_ft: number(ELEVATION_GAIN_NAMES),
            surface: text(SURFACE_NAMES),
        }
    }
}

/// Decodes raw provider attribute containers into [`AttributeSet`]s
#[derive(Debug, Clone)]
pub struct AttributeDecoder {
    catalog: Arc<Catalog>,
}

impl AttributeDecoder {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Decode every recognised shape in `raw` and merge the results
    #[must_use]
    pub fn decode(&self, raw: &Value) -> AttributeSet {
        let shapes = self.classify(raw);
        let mut merged = AttributeSet::new();
        for shape in shapes {
            let decoded = match shape {
                RawShape::FlatList(pairs) | RawShape::Nested(pairs) => decode_pairs(pairs),
                RawShape::IdFlags(flags) => self.decode_id_flags(&flags),
                RawShape::Freeform(value) => self.decode_freeform(value),
            };
            merged.merge(decoded);
        }
        merged
    }

    /// Decode and extract the trail scalars in one step
    #[must_use]
    pub fn decode_trail(&self, raw: &Value) -> (AttributeSet, TrailScalars) {
        let attributes = self.decode(raw);
        let scalars = TrailScalars::from_attributes(&attributes);
        (attributes, scalars)
    }

    /// List the shapes present in `raw`, pair-based shapes first
    #[must_use]
    pub fn classify<'a>(&self, raw: &'a Value) -> Vec<RawShape<'a>> {
        let mut shapes = Vec::new();
        match raw {
            Value::Array(items) => {
                if items.iter().any(|item| as_pair(item).is_some()) {
                    shapes.push(RawShape::FlatList(items));
                } else if !items.is_empty() {
                    shapes.push(RawShape::Freeform(raw));
                }
            }
            Value::Object(map) => {
                for key in NESTED_LIST_KEYS {
                    if let Some(Value::Array(items)) = map.get(*key) {
                        if items.iter().any(|item| as_pair(item).is_some()) {
                            shapes.push(RawShape::Nested(items));
                        }
                    }
                }

                let mut flags = self.id_flags(map);
                for key in FLAG_CONTAINER_KEYS {
                    if let Some(Value::Object(inner)) = map.get(*key) {
                        flags.extend(self.id_flags(inner));
                    }
                }
                if !flags.is_empty() {
                    shapes.push(RawShape::IdFlags(flags));
                }

                for key in FREEFORM_KEYS {
                    if let Some(value @ (Value::String(_) | Value::Array(_))) = map.get(*key) {
                        shapes.push(RawShape::Freeform(value));
                    }
                }
            }
            Value::String(_) => shapes.push(RawShape::Freeform(raw)),
            _ => {}
        }
        debug!("Classified attribute container into {} shape(s)", shapes.len());
        shapes
    }

    fn id_flags<'a>(&self, map: &'a Map<String, Value>) -> Vec<(&'a str, &'a Value)> {
        map.iter()
            .filter(|(key, _)| self.catalog.capability(key).is_some())
            .map(|(key, value)| (key.as_str(), value))
            .collect()
    }

    fn decode_id_flags(&self, flags: &[(&str, &Value)]) -> AttributeSet {
        let mut set = AttributeSet::new();
        for (id, value) in flags {
            let enabled = match value {
                Value::String(s) => s.trim().eq_ignore_ascii_case("yes"),
                Value::Bool(b) => *b,
                _ => false,
            };
            if let (true, Some(name)) = (enabled, self.catalog.capability(id)) {
                set.insert_capability(name);
            }
        }
        set
    }

    fn decode_freeform(&self, value: &Value) -> AttributeSet {
        let mut set = AttributeSet::new();
        match value {
            Value::Array(items) => self.collect_items(items, &mut set),
            Value::String(text) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Array(items)) => self.collect_items(&items, &mut set),
                _ => {
                    for token in text.split(',') {
                        set.insert_capability(self.token_capability(token));
                    }
                }
            },
            _ => {}
        }
        set
    }

    fn collect_items(&self, items: &[Value], set: &mut AttributeSet) {
        for item in items {
            if let Some(name) = self.item_capability(item) {
                set.insert_capability(&name);
            }
        }
    }

    /// Catalog name for a bare token that is a known id, else the token itself
    fn token_capability<'a>(&'a self, token: &'a str) -> &'a str {
        self.catalog.capability(token).unwrap_or(token)
    }

    fn item_capability(&self, item: &Value) -> Option<String> {
        match item {
            Value::String(s) => Some(self.token_capability(s).to_string()),
            Value::Number(n) => self.catalog.capability(&n.to_string()).map(str::to_string),
            Value::Object(map) => {
                let named = ITEM_NAME_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .filter(|name| !name.trim().is_empty());
                if let Some(name) = named {
                    return Some(name.to_string());
                }
                ITEM_ID_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).and_then(json_id))
                    .and_then(|id| self.catalog.capability(&id).map(str::to_string))
            }
            _ => None,
        }
    }
}

fn json_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_pair(item: &Value) -> Option<(&str, &Value)> {
    let map = item.as_object()?;
    let name = PAIR_NAME_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str))?;
    let value = PAIR_VALUE_KEYS.iter().find_map(|key| map.get(*key))?;
    Some((name, value))
}

fn decode_pairs(pairs: &[Value]) -> AttributeSet {
    let mut set = AttributeSet::new();
    for (name, raw_value) in pairs.iter().filter_map(as_pair) {
        let Some(value) = AttributeValue::from_json(raw_value) else {
            continue;
        };
        if value.is_affirmative() {
            set.insert_capability(name);
        }
        set.insert_attribute(name, value);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn decoder() -> AttributeDecoder {
        let catalog = Catalog::default()
            .with_capability("14", "Hiking")
            .with_capability("9", "Camping")
            .with_capability("A59947B7-3376-49B4-AD02-C0423E08C5F7", "Hiking")
            .with_capability("7CE6E935-F839-4FEC-A63E-052B1DEF39D2", "Camping");
        AttributeDecoder::new(Arc::new(catalog))
    }

    #[rstest]
    #[case(json!("4.5"), Some(4.5))]
    #[case(json!("4.5 miles"), Some(4.5))]
    #[case(json!("4.5mi"), Some(4.5))]
    #[case(json!("3.2-mile loop"), Some(3.2))]
    #[case(json!(7), Some(7.0))]
    #[case(json!("abc"), None)]
    fn test_flat_list_length(#[case] value: Value, #[case] expected: Option<f64>) {
        let raw = json!([{"name": "Trail Length", "value": value}]);
        let (_, scalars) = decoder().decode_trail(&raw);
        assert_eq!(scalars.length_miles, expected);
    }

    #[test]
    fn test_flat_list_malformed_length_is_absent() {
        let raw = json!([{"name": "Trail Length", "value": "abc"}]);
        let (attributes, scalars) = decoder().decode_trail(&raw);
        assert_eq!(scalars.length_miles, None);
        assert!(attributes.get("Trail Length").is_some());
    }

    #[test]
    fn test_nested_container_with_provider_keys() {
        let raw = json!({
            "FacilityName": "Mist Trail",
            "ATTRIBUTES": [
                {"AttributeName": "Difficulty", "AttributeValue": "Strenuous"},
                {"AttributeName": "Elevation Gain", "AttributeValue": "1,000 ft"},
                {"AttributeName": "Surface Type", "AttributeValue": "Granite steps"},
                {"AttributeName": "Pets Allowed", "AttributeValue": "Yes"}
            ]
        });
        let (attributes, scalars) = decoder().decode_trail(&raw);
        assert_eq!(scalars.difficulty.as_deref(), Some("Strenuous"));
        assert_eq!(scalars.elevation_gain_ft, Some(1000.0));
        assert_eq!(scalars.surface.as_deref(), Some("Granite steps"));
        assert_eq!(attributes.capabilities(), ["Pets Allowed"]);
    }

    #[test]
    fn test_id_flags_only_yes_counts() {
        let raw = json!({
            "A59947B7-3376-49B4-AD02-C0423E08C5F7": "Yes",
            "7CE6E935-F839-4FEC-A63E-052B1DEF39D2": "No",
            "unrelated": "Yes"
        });
        let attributes = decoder().decode(&raw);
        assert_eq!(attributes.capabilities(), ["Hiking"]);
    }

    #[test]
    fn test_id_flags_inside_amenities_object() {
        let raw = json!({"amenities": {"9": "yes", "14": true}});
        let attributes = decoder().decode(&raw);
        assert!(attributes.has_capability("Camping"));
        assert!(attributes.has_capability("Hiking"));
    }

    #[test]
    fn test_freeform_json_array_with_ids_and_names() {
        let raw = json!({"activities": r#"["Swimming", {"id": "14"}, {"name": "Birding"}, {"id": "999"}]"#});
        let attributes = decoder().decode(&raw);
        assert_eq!(attributes.capabilities(), ["Swimming", "Hiking", "Birding"]);
    }

    #[test]
    fn test_freeform_comma_fallback() {
        let raw = json!({"activities": "Hiking, Camping ,, Fishing"});
        let attributes = decoder().decode(&raw);
        assert_eq!(attributes.capabilities(), ["Hiking", "Camping", "Fishing"]);
    }

    #[rstest]
    #[case(r#"["14", "9"]"#, &["Hiking", "Camping"])]
    #[case("[14, 9]", &["Hiking", "Camping"])]
    #[case("14, 9", &["Hiking", "Camping"])]
    #[case("14, Stargazing", &["Hiking", "Stargazing"])]
    fn test_freeform_ids_resolve_through_catalog(#[case] activities: &str, #[case] expected: &[&str]) {
        let raw = json!({ "activities": activities });
        let attributes = decoder().decode(&raw);
        assert_eq!(attributes.capabilities(), expected);
    }

    #[test]
    fn test_freeform_non_array_json_falls_back_to_split() {
        let raw = json!({"activities": "42"});
        let attributes = decoder().decode(&raw);
        assert_eq!(attributes.capabilities(), ["42"]);
    }

    #[test]
    fn test_provider_activity_array() {
        let raw = json!({"ACTIVITY": [{"ActivityID": 14, "ActivityName": "HIKING"}, {"ActivityID": 9}]});
        let attributes = decoder().decode(&raw);
        assert_eq!(attributes.capabilities(), ["HIKING", "Camping"]);
    }

    #[test]
    fn test_all_shapes_merge_without_duplicates() {
        let raw = json!({
            "attributes": [
                {"key": "Hiking", "value": true},
                {"key": "Trail Length", "value": 3}
            ],
            "14": "Yes",
            "9": "Yes",
            "activities": "Camping, Stargazing"
        });
        let decoder = decoder();
        assert_eq!(decoder.classify(&raw).len(), 3);

        let (attributes, scalars) = decoder.decode_trail(&raw);
        assert_eq!(attributes.capabilities(), ["Hiking", "Camping", "Stargazing"]);
        assert_eq!(scalars.length_miles, Some(3.0));
    }

    #[test]
    fn test_unrecognised_input_yields_empty_set() {
        let decoder = decoder();
        assert!(decoder.decode(&json!(null)).is_empty());
        assert!(decoder.decode(&json!(17)).is_empty());
        assert!(decoder.decode(&json!({"unrelated": {"deep": 1}})).is_empty());
        assert!(decoder.decode(&json!([])).is_empty());
    }
}
