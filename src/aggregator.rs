//! Trail aggregation
//!
//! Lists the trail-like facilities of an area and enriches each one with its
//! decoded detail record. Only the facility list is a primary call; a failed
//! detail fetch leaves that trail with base fields only.

use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::catalog::Catalog;
use crate::decoder::{AttributeDecoder, TrailScalars};
use crate::models::{AreaRef, Enrichment, LocationCode, Trail, TrailFilter};
use crate::providers::{FacilityRecord, RidbClient};

/// Upper bound on concurrent detail fetches regardless of configuration
pub const MAX_FAN_OUT: usize = 10;

/// Lifetime of a fan-out: cancelled explicitly or by deadline
#[derive(Debug, Clone, Default)]
pub struct FetchScope {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl FetchScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope driven by an externally owned token
    #[must_use]
    pub fn with_token(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    /// Expire `timeout` from now
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolves once the scope is cancelled or its deadline passes
    pub async fn expired(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    () = self.cancel.cancelled() => {}
                    () = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }
}

/// Service for listing and enriching trails
pub struct TrailAggregator {
    ridb: Arc<RidbClient>,
    catalog: Arc<Catalog>,
    decoder: AttributeDecoder,
    max_concurrency: usize,
}

impl TrailAggregator {
    #[must_use]
    pub fn new(ridb: Arc<RidbClient>, catalog: Arc<Catalog>, max_concurrency: usize) -> Self {
        Self {
            ridb,
            decoder: AttributeDecoder::new(Arc::clone(&catalog)),
            catalog,
            max_concurrency: max_concurrency.clamp(1, MAX_FAN_OUT),
        }
    }

    /// Trails of an area, enriched and filtered
    ///
    /// The result never holds more trails than there were trail candidates,
    /// however many detail fetches failed. An `id` criterion is applied to
    /// the candidates before any detail is fetched.
    #[instrument(skip(self, filter, scope), fields(area = %area.id, code = %area.code))]
    pub async fn list_trails(
        &self,
        area: &AreaRef,
        filter: &TrailFilter,
        scope: &FetchScope,
    ) -> Result<Vec<Trail>> {
        let facilities = self.ridb.area_facilities(&area.id).await?;
        let mut candidates = select_trails(facilities);

        if candidates.is_empty() {
            candidates = self.fallback_candidates(&area.code).await;
        }

        if let Some(id) = &filter.id {
            candidates.retain(|record| record.id == *id);
        }

        let candidate_count = candidates.len();
        let trails = self.enrich_all(candidates, &area.code, scope).await;
        let degraded = trails.iter().filter(|t| t.is_degraded()).count();

        let trails: Vec<Trail> = trails.into_iter().filter(|t| filter.matches(t)).collect();
        info!(
            "{} trail candidates for {}, {} degraded, {} after filtering",
            candidate_count,
            area.code,
            degraded,
            trails.len()
        );
        Ok(trails)
    }

    /// One keyword search for "`<display name>` trail"; failures degrade to empty
    async fn fallback_candidates(&self, code: &LocationCode) -> Vec<FacilityRecord> {
        let Some(display_name) = self.catalog.display_name(code) else {
            debug!("No trail candidates and no display name for {}", code);
            return Vec::new();
        };
        let query = format!("{display_name} trail");
        debug!("No trail candidates for {}, searching '{}'", code, query);
        match self.ridb.search_facilities(&query).await {
            Ok(results) => select_trails(results),
            Err(e) => {
                warn!("Fallback trail search '{}' failed: {}", query, e);
                Vec::new()
            }
        }
    }

    /// Bounded fan-out over detail fetches, results in candidate order
    async fn enrich_all(
        &self,
        candidates: Vec<FacilityRecord>,
        code: &LocationCode,
        scope: &FetchScope,
    ) -> Vec<Trail> {
        futures::stream::iter(candidates)
            .map(|record| self.enrich(record, code, scope))
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    async fn enrich(&self, record: FacilityRecord, code: &LocationCode, scope: &FetchScope) -> Trail {
        if scope.is_expired() {
            return base_trail(&record, code, Enrichment::Skipped);
        }

        let detail = tokio::select! {
            biased;
            () = scope.expired() => {
                debug!("Detail fetch for {} abandoned", record.id);
                return base_trail(&record, code, Enrichment::Skipped);
            }
            detail = self.ridb.facility_detail(&record.id) => detail,
        };

        match detail {
            Ok(raw) => {
                let (attributes, scalars) = self.decoder.decode_trail(&raw);
                let mut trail = base_trail(&record, code, Enrichment::Enriched);
                apply_scalars(&mut trail, scalars);
                trail.attributes = Some(attributes);
                trail
            }
            Err(e) => {
                warn!("Detail fetch for facility {} failed: {}", record.id, e);
                base_trail(
                    &record,
                    code,
                    Enrichment::Failed {
                        reason: e.to_string(),
                    },
                )
            }
        }
    }
}

/// Keep facilities whose type or name signals a trail
#[must_use]
pub fn select_trails(facilities: Vec<FacilityRecord>) -> Vec<FacilityRecord> {
    facilities
        .into_iter()
        .filter(FacilityRecord::signals_trail)
        .collect()
}

fn base_trail(record: &FacilityRecord, code: &LocationCode, enrichment: Enrichment) -> Trail {
    Trail {
        id: record.id.clone(),
        name: record.name.trim().to_string(),
        location: code.clone(),
        coordinates: record.coordinates(),
        facility_type: record.type_label(),
        description: record.description_text(),
        length_miles: None,
        difficulty: None,
        elevation_gain_ft: None,
        surface: None,
        attributes: None,
        enrichment,
    }
}

fn apply_scalars(trail: &mut Trail, scalars: TrailScalars) {
    trail.length_miles = scalars.length_miles;
    trail.difficulty = scalars.difficulty;
    trail.elevation_gain_ft = scalars.elevation_gain_ft;
    trail.surface = scalars.surface;
}
