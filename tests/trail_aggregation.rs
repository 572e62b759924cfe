//! Resolution and trail aggregation against a stubbed transport.

mod support;

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use trailplanner::models::Enrichment;
use trailplanner::test_support::StubFetcher;
use trailplanner::{
    AreaRef, FetchScope, LocationCode, RemoteAreaId, Resolution, TrailFilter, TrailPlannerConfig,
    TrailPlannerError,
};

use support::{detail, facility, planner, planner_with, planner_with_catalog, recdata};

fn yosemite() -> AreaRef {
    AreaRef::new(LocationCode::new("yose"), RemoteAreaId::new("2991"))
}

#[tokio::test]
async fn test_static_table_hit_makes_no_calls() {
    let fetcher = Arc::new(StubFetcher::new());
    let planner = planner(&fetcher);

    let resolution = planner.resolve(&LocationCode::new("YOSE")).await.unwrap();
    assert_eq!(resolution, Resolution::Found(RemoteAreaId::new("2991")));
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_code_is_not_found_without_calls() {
    let fetcher = Arc::new(StubFetcher::new());
    let planner = planner(&fetcher);

    let resolution = planner.resolve(&LocationCode::new("xxxx")).await.unwrap();
    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_search_fallback_prefers_national_park_name() {
    let fetcher = Arc::new(StubFetcher::new().with_json(
        "/recareas?query=Zion",
        json!({"RECDATA": [
            {"RecAreaID": 100, "RecAreaName": "Zion Wilderness"},
            {"RecAreaID": 2994, "RecAreaName": "Zion National Park"}
        ]}),
    ));
    let planner = planner(&fetcher);

    let resolution = planner.resolve(&LocationCode::new("zion")).await.unwrap();
    assert_eq!(resolution, Resolution::Found(RemoteAreaId::new("2994")));
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_search_failure_bubbles() {
    let fetcher = Arc::new(StubFetcher::new().with_status("/recareas?query=", 503));
    let planner = planner(&fetcher);

    let err = planner.resolve(&LocationCode::new("zion")).await.unwrap_err();
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_one_failed_detail_keeps_all_trails() {
    let fetcher = Arc::new(
        StubFetcher::new()
            .with_json(
                "/recareas/2991/facilities",
                recdata(vec![
                    facility("101", "Mist Trail", "Trail"),
                    facility("102", "Upper Pines", "Campground"),
                    facility("103", "Four Mile Trail", "Trail"),
                    facility("104", "Panorama", "Trailhead"),
                ]),
            )
            .with_json("/facilities/101?", detail("3.0 miles", "Strenuous"))
            .with_status("/facilities/103?", 500)
            .with_json("/facilities/104?", detail("8.5", "Moderate")),
    );
    let planner = planner(&fetcher);

    let trails = planner
        .list_trails(&yosemite(), &TrailFilter::default(), &FetchScope::new())
        .await
        .unwrap();

    let ids: Vec<&str> = trails.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["101", "103", "104"]);

    let mist = &trails[0];
    assert_eq!(mist.enrichment, Enrichment::Enriched);
    assert_eq!(mist.length_miles, Some(3.0));
    assert_eq!(mist.difficulty.as_deref(), Some("Strenuous"));
    assert!(mist.capabilities().iter().any(|c| c == "Hiking"));
    assert!(mist.capabilities().iter().any(|c| c == "Pets Allowed"));

    let four_mile = &trails[1];
    assert!(four_mile.attributes.is_none());
    assert!(matches!(four_mile.enrichment, Enrichment::Failed { .. }));
    assert_eq!(four_mile.name, "Four Mile Trail");

    assert_eq!(fetcher.calls_matching("/facilities/102?"), 0);
}

#[tokio::test]
async fn test_facility_list_failure_bubbles() {
    let fetcher = Arc::new(StubFetcher::new().with_status("/recareas/2991/facilities", 502));
    let planner = planner(&fetcher);

    let err = planner
        .list_trails(&yosemite(), &TrailFilter::default(), &FetchScope::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TrailPlannerError::TransientIo {
            status: Some(502),
            ..
        }
    ));
}

#[tokio::test]
async fn test_keyword_search_when_area_lists_no_trails() {
    let fetcher = Arc::new(
        StubFetcher::new()
            .with_json(
                "/recareas/2991/facilities",
                recdata(vec![facility("102", "Upper Pines", "Campground")]),
            )
            .with_json(
                "/facilities?query=Yosemite%20trail",
                recdata(vec![facility("201", "Valley Loop Trail", "Trail")]),
            )
            .with_json("/facilities/201?", detail("11.5", "Easy")),
    );
    let planner = planner(&fetcher);

    let trails = planner
        .list_trails(&yosemite(), &TrailFilter::default(), &FetchScope::new())
        .await
        .unwrap();
    assert_eq!(trails.len(), 1);
    assert_eq!(trails[0].id, "201");
    assert_eq!(trails[0].length_miles, Some(11.5));
}

#[tokio::test]
async fn test_filter_applies_after_decoding() {
    let fetcher = Arc::new(
        StubFetcher::new()
            .with_json(
                "/recareas/2991/facilities",
                recdata(vec![
                    facility("101", "Mist Trail", "Trail"),
                    facility("103", "Four Mile Trail", "Trail"),
                    facility("104", "Panorama Trail", "Trail"),
                ]),
            )
            .with_json("/facilities/101?", detail("3.0", "Strenuous"))
            .with_status("/facilities/103?", 500)
            .with_json("/facilities/104?", detail("8.5", "Moderate")),
    );
    let planner = planner(&fetcher);
    let filter = TrailFilter {
        difficulty: Some("moderate".to_string()),
        min_length: Some(5.0),
        ..TrailFilter::default()
    };

    let trails = planner
        .list_trails(&yosemite(), &filter, &FetchScope::new())
        .await
        .unwrap();
    let ids: Vec<&str> = trails.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec!["104"]);
}

#[tokio::test]
async fn test_fan_out_respects_concurrency_limit() {
    let mut stub = StubFetcher::new().with_json(
        "/recareas/2991/facilities",
        recdata(
            (0..8)
                .map(|i| facility(&format!("30{i}"), &format!("Trail {i}"), "Trail"))
                .collect(),
        ),
    );
    for i in 0..8 {
        stub = stub.with_delayed_json(
            &format!("/facilities/30{i}?"),
            detail("2.0", "Easy"),
            Duration::from_millis(20),
        );
    }
    let fetcher = Arc::new(stub);
    let mut config = TrailPlannerConfig::default();
    config.aggregation.max_concurrent_fetches = 3;
    let planner = planner_with(&fetcher, config);

    let trails = planner
        .list_trails(&yosemite(), &TrailFilter::default(), &FetchScope::new())
        .await
        .unwrap();
    assert_eq!(trails.len(), 8);
    assert!(trails.iter().all(|t| t.enrichment == Enrichment::Enriched));
    assert!(fetcher.peak_in_flight() <= 3);
    assert!(fetcher.peak_in_flight() >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_skips_slow_details() {
    let fetcher = Arc::new(
        StubFetcher::new()
            .with_json(
                "/recareas/2991/facilities",
                recdata(vec![
                    facility("101", "Mist Trail", "Trail"),
                    facility("103", "Four Mile Trail", "Trail"),
                ]),
            )
            .with_json("/facilities/101?", detail("3.0", "Strenuous"))
            .with_delayed_json(
                "/facilities/103?",
                detail("4.8", "Strenuous"),
                Duration::from_secs(60),
            ),
    );
    let planner = planner(&fetcher);
    let scope = FetchScope::new().with_timeout(Duration::from_secs(5));

    let trails = planner
        .list_trails(&yosemite(), &TrailFilter::default(), &scope)
        .await
        .unwrap();
    assert_eq!(trails.len(), 2);
    assert_eq!(trails[0].enrichment, Enrichment::Enriched);
    assert_eq!(trails[1].enrichment, Enrichment::Skipped);
    assert!(trails[1].attributes.is_none());
}

#[tokio::test]
async fn test_cancelled_scope_issues_no_detail_fetches() {
    let fetcher = Arc::new(StubFetcher::new().with_json(
        "/recareas/2991/facilities",
        recdata(vec![facility("101", "Mist Trail", "Trail")]),
    ));
    let planner = planner(&fetcher);
    let scope = FetchScope::new();
    scope.cancel();

    let trails = planner
        .list_trails(&yosemite(), &TrailFilter::default(), &scope)
        .await
        .unwrap();
    assert_eq!(trails.len(), 1);
    assert_eq!(trails[0].enrichment, Enrichment::Skipped);
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_trails_for_unresolvable_code_is_empty() {
    let fetcher = Arc::new(StubFetcher::new());
    let planner = planner(&fetcher);

    let trails = planner
        .trails_for_code(&LocationCode::new("xxxx"), &TrailFilter::default(), &planner.scope())
        .await
        .unwrap();
    assert!(trails.is_empty());
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_empty_area_search_is_not_found() {
    let fetcher =
        Arc::new(StubFetcher::new().with_json("/recareas?query=Zion", json!({"RECDATA": []})));
    let planner = planner(&fetcher);

    let resolution = planner.resolve(&LocationCode::new("zion")).await.unwrap();
    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_blank_display_name_is_not_found_without_calls() {
    let fetcher = Arc::new(StubFetcher::new());
    let catalog = support::catalog().with_display_name("blnk", "   ");
    let planner = planner_with_catalog(&fetcher, catalog);

    let resolution = planner.resolve(&LocationCode::new("blnk")).await.unwrap();
    assert_eq!(resolution, Resolution::NotFound);
    assert_eq!(fetcher.call_count(), 0);
}

#[tokio::test]
async fn test_no_keyword_search_without_display_name() {
    let fetcher = Arc::new(StubFetcher::new().with_json(
        "/recareas/5555/facilities",
        recdata(vec![facility("102", "Upper Pines", "Campground")]),
    ));
    let planner = planner(&fetcher);
    let area = AreaRef::new(LocationCode::new("xxxx"), RemoteAreaId::new("5555"));

    let trails = planner
        .list_trails(&area, &TrailFilter::default(), &FetchScope::new())
        .await
        .unwrap();
    assert!(trails.is_empty());
    assert_eq!(fetcher.calls_matching("/facilities?query="), 0);
    assert_eq!(fetcher.call_count(), 1);
}

#[tokio::test]
async fn test_failed_keyword_search_yields_no_trails() {
    let fetcher = Arc::new(
        StubFetcher::new()
            .with_json(
                "/recareas/2991/facilities",
                recdata(vec![facility("102", "Upper Pines", "Campground")]),
            )
            .with_status("/facilities?query=", 503),
    );
    let planner = planner(&fetcher);

    let trails = planner
        .list_trails(&yosemite(), &TrailFilter::default(), &FetchScope::new())
        .await
        .unwrap();
    assert!(trails.is_empty());
    assert_eq!(fetcher.calls_matching("/facilities?query="), 1);
}
