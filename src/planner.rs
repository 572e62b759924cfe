//! Visit planning service
//!
//! Entry point tying the resolver, aggregator, scorer and report composer to
//! the provider clients.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::aggregator::{FetchScope, TrailAggregator};
use crate::catalog::Catalog;
use crate::config::TrailPlannerConfig;
use crate::models::{
    AreaRef, DayScore, ForecastDay, LocationCode, ParkSummary, Trail, TrailFilter, TripWindow,
    VisitReport,
};
use crate::providers::{NpsClient, OpenMeteoClient, RidbClient};
use crate::report::{Subsources, compose_visit_report};
use crate::resolver::{IdentifierResolver, Resolution};
use crate::transport::{HttpFetcher, ReqwestFetcher};
use crate::{Result, TrailPlannerError, scorer};

/// Service for planning park visits
pub struct VisitPlanner {
    catalog: Arc<Catalog>,
    resolver: IdentifierResolver,
    aggregator: TrailAggregator,
    nps: NpsClient,
    weather: OpenMeteoClient,
    top_days: usize,
    enrichment_deadline: Option<Duration>,
}

impl VisitPlanner {
    /// Build a planner talking to the real upstream services
    pub fn from_config(config: &TrailPlannerConfig) -> Result<Self> {
        let catalog = Catalog::load(config.catalog.path.as_deref())?;
        let fetcher: Arc<dyn HttpFetcher> = Arc::new(ReqwestFetcher::new(&config.providers)?);
        Ok(Self::with_fetcher(config, catalog, fetcher))
    }

    /// Build a planner over any transport
    #[must_use]
    pub fn with_fetcher(
        config: &TrailPlannerConfig,
        catalog: Arc<Catalog>,
        fetcher: Arc<dyn HttpFetcher>,
    ) -> Self {
        let ridb = Arc::new(RidbClient::new(Arc::clone(&fetcher), &config.providers));
        Self {
            resolver: IdentifierResolver::new(Arc::clone(&catalog), Arc::clone(&ridb)),
            aggregator: TrailAggregator::new(
                ridb,
                Arc::clone(&catalog),
                config.aggregation.max_concurrent_fetches,
            ),
            nps: NpsClient::new(Arc::clone(&fetcher), &config.providers),
            weather: OpenMeteoClient::new(fetcher, &config.providers),
            catalog,
            top_days: config.aggregation.top_days,
            enrichment_deadline: config
                .aggregation
                .enrichment_deadline_seconds
                .map(Duration::from_secs),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// A fresh scope carrying the configured enrichment deadline
    #[must_use]
    pub fn scope(&self) -> FetchScope {
        match self.enrichment_deadline {
            Some(deadline) => FetchScope::new().with_timeout(deadline),
            None => FetchScope::new(),
        }
    }

    /// Map a park code to its facility area id
    pub async fn resolve(&self, code: &LocationCode) -> Result<Resolution> {
        ensure_code(code)?;
        self.resolver.resolve(code).await
    }

    /// Trails of an already resolved area
    pub async fn list_trails(
        &self,
        area: &AreaRef,
        filter: &TrailFilter,
        scope: &FetchScope,
    ) -> Result<Vec<Trail>> {
        self.aggregator.list_trails(area, filter, scope).await
    }

    /// Resolve a park code, then list its trails. An unresolvable code has no trails.
    pub async fn trails_for_code(
        &self,
        code: &LocationCode,
        filter: &TrailFilter,
        scope: &FetchScope,
    ) -> Result<Vec<Trail>> {
        let Resolution::Found(id) = self.resolve(code).await? else {
            info!("No facility area for {}", code);
            return Ok(Vec::new());
        };
        let area = AreaRef::new(code.clone(), id);
        self.list_trails(&area, filter, scope).await
    }

    /// Score and rank forecast days
    #[must_use]
    pub fn score(&self, days: &[ForecastDay]) -> Vec<DayScore> {
        scorer::score(days)
    }

    /// Fetch everything known about a park and compose the report
    ///
    /// Park metadata is the only primary call. Alerts, events, campgrounds and
    /// the forecast are fetched concurrently and degrade independently.
    #[instrument(skip(self, scope), fields(park = %code))]
    pub async fn plan_visit(
        &self,
        code: &LocationCode,
        trip: Option<TripWindow>,
        scope: &FetchScope,
    ) -> Result<VisitReport> {
        ensure_code(code)?;
        let park = self.park_summary(code).await?;

        let forecast = async {
            match park.coordinates {
                Some(point) => self.weather.daily_forecast(point).await,
                None => Err(TrailPlannerError::validation(format!(
                    "no coordinates known for {}",
                    park.code
                ))),
            }
        };

        let (alerts, events, campgrounds, forecast) = tokio::join!(
            within(scope, self.nps.alerts(code)),
            within(scope, self.nps.events(code)),
            within(scope, self.nps.campgrounds(code)),
            within(scope, forecast),
        );

        let subsources = Subsources {
            alerts,
            events,
            campgrounds,
            forecast,
        };
        let report = compose_visit_report(park, trip, subsources, self.top_days);
        info!(
            "Visit report for {}: {} closures, {} best days",
            code,
            report.closures.items().len(),
            report.best_days.len()
        );
        Ok(report)
    }

    async fn park_summary(&self, code: &LocationCode) -> Result<ParkSummary> {
        if let Some(park) = self.nps.park(code).await? {
            return Ok(park);
        }
        match self.catalog.display_name(code) {
            Some(name) => {
                warn!("Park service has no record for {}, using catalog name", code);
                Ok(ParkSummary::named(code.clone(), name))
            }
            None => Err(TrailPlannerError::validation(format!(
                "unknown park code '{code}'"
            ))),
        }
    }
}

fn ensure_code(code: &LocationCode) -> Result<()> {
    if code.is_empty() {
        return Err(TrailPlannerError::validation("park code cannot be empty"));
    }
    Ok(())
}

/// Run a subsource fetch unless the scope expires first
async fn within<T>(scope: &FetchScope, fetch: impl Future<Output = Result<T>>) -> Result<T> {
    if scope.is_expired() {
        return Err(TrailPlannerError::Cancelled);
    }
    tokio::select! {
        biased;
        () = scope.expired() => {
            debug!("Subsource fetch abandoned");
            Err(TrailPlannerError::Cancelled)
        }
        result = fetch => result,
    }
}
