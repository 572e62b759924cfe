//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use serde_json::{Value, json};
use std::sync::Arc;
use trailplanner::test_support::StubFetcher;
use trailplanner::{Catalog, TrailPlannerConfig, VisitPlanner};

pub fn catalog() -> Catalog {
    Catalog::default()
        .with_area_id("yose", "2991")
        .with_display_name("yose", "Yosemite")
        .with_display_name("zion", "Zion")
        .with_capability("14", "Hiking")
}

pub fn planner(fetcher: &Arc<StubFetcher>) -> VisitPlanner {
    planner_with(fetcher, TrailPlannerConfig::default())
}

pub fn planner_with(fetcher: &Arc<StubFetcher>, config: TrailPlannerConfig) -> VisitPlanner {
    let fetcher: Arc<StubFetcher> = Arc::clone(fetcher);
    VisitPlanner::with_fetcher(&config, Arc::new(catalog()), fetcher)
}

pub fn planner_with_catalog(fetcher: &Arc<StubFetcher>, catalog: Catalog) -> VisitPlanner {
    let fetcher: Arc<StubFetcher> = Arc::clone(fetcher);
    VisitPlanner::with_fetcher(&TrailPlannerConfig::default(), Arc::new(catalog), fetcher)
}

pub fn facility(id: &str, name: &str, kind: &str) -> Value {
    json!({
        "FacilityID": id,
        "FacilityName": name,
        "FacilityTypeDescription": kind,
        "FacilityDescription": "",
        "FacilityLatitude": 37.73,
        "FacilityLongitude": -119.55
    })
}

pub fn recdata(records: Vec<Value>) -> Value {
    json!({ "RECDATA": records, "METADATA": { "RESULTS": { "TOTAL_COUNT": records.len() } } })
}

/// Detail record carrying its attributes as a nested pair list
pub fn detail(length: &str, difficulty: &str) -> Value {
    json!({
        "FacilityID": "ignored",
        "ATTRIBUTES": [
            { "AttributeName": "Trail Length", "AttributeValue": length },
            { "AttributeName": "Difficulty", "AttributeValue": difficulty },
            { "AttributeName": "Pets Allowed", "AttributeValue": "Yes" }
        ],
        "ACTIVITY": "[{\"id\": \"14\"}]"
    })
}
