//! Visit report composition
//!
//! Combines park metadata with the results of the degradable subsources into
//! a single [`VisitReport`]. Composition is pure and never fails: a missing
//! or failed subsource becomes a "not available" section.

use chrono::Utc;
use tracing::warn;

use crate::Result;
use crate::models::{
    Alert, Campground, ForecastDay, ParkEvent, ParkSummary, Section, TripOutlook, TripWindow,
    VisitReport,
};
use crate::scorer;

/// Default number of best days in a report
pub const DEFAULT_TOP_DAYS: usize = 3;

/// Raw outcome of each degradable subsource fetch
#[derive(Debug)]
pub struct Subsources {
    pub alerts: Result<Vec<Alert>>,
    pub events: Result<Vec<ParkEvent>>,
    pub campgrounds: Result<Vec<Campground>>,
    pub forecast: Result<Vec<ForecastDay>>,
}

/// Build the report for a park
#[must_use]
pub fn compose_visit_report(
    park: ParkSummary,
    trip: Option<TripWindow>,
    subsources: Subsources,
    top_n: usize,
) -> VisitReport {
    let closures = section("alerts", subsources.alerts).map_items(closure_alerts);
    let events = section("events", subsources.events);
    let campgrounds = section("campgrounds", subsources.campgrounds);
    let forecast = section("forecast", subsources.forecast);

    let best_days = scorer::top_days(forecast.items(), top_n);
    let trip = trip.map(|window| trip_outlook(window, &forecast));

    VisitReport {
        park,
        closures,
        events,
        campgrounds,
        forecast,
        best_days,
        trip,
        generated_at: Utc::now(),
    }
}

/// Alerts whose title or category mentions a closure
#[must_use]
pub fn closure_alerts(alerts: Vec<Alert>) -> Vec<Alert> {
    alerts.into_iter().filter(Alert::is_closure).collect()
}

/// Compare a trip window against the forecast section
#[must_use]
pub fn trip_outlook(trip: TripWindow, forecast: &Section<ForecastDay>) -> TripOutlook {
    let days = match forecast {
        Section::Available { items } => items,
        Section::NotAvailable { reason } => {
            return TripOutlook::NotAvailable {
                trip,
                reason: reason.clone(),
            };
        }
    };
    let Some(window) = TripWindow::spanning(days) else {
        return TripOutlook::NotAvailable {
            trip,
            reason: "forecast not available".to_string(),
        };
    };

    if trip.overlaps(&window) {
        TripOutlook::Overlapping {
            trip,
            days: days
                .iter()
                .filter(|day| trip.contains(day.date))
                .cloned()
                .collect(),
        }
    } else {
        TripOutlook::OutsideForecast {
            trip,
            forecast: window,
            message: format!(
                "Trip dates {} to {} are outside the forecast window {} to {}",
                trip.start, trip.end, window.start, window.end
            ),
        }
    }
}

fn section<T>(name: &str, result: Result<Vec<T>>) -> Section<T> {
    match result {
        Ok(items) if items.is_empty() => Section::NotAvailable {
            reason: format!("no {name} reported"),
        },
        Ok(items) => Section::Available { items },
        Err(e) => {
            warn!("{} not available: {}", name, e);
            Section::NotAvailable {
                reason: format!("{name} not available: {}", e.user_message()),
            }
        }
    }
}

impl<T> Section<T> {
    /// Transform the items of an available section. A transformation that
    /// leaves nothing keeps the section available with no items.
    fn map_items<U>(self, f: impl FnOnce(Vec<T>) -> Vec<U>) -> Section<U> {
        match self {
            Self::Available { items } => Section::Available { items: f(items) },
            Self::NotAvailable { reason } => Section::NotAvailable { reason },
        }
    }
}
