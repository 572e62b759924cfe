//! Composite visit report

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::forecast::{DayScore, ForecastDay, TripWindow};
use super::park::{Alert, Campground, ParkEvent, ParkSummary};

/// A report section whose upstream source may be missing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "availability", rename_all = "snake_case")]
pub enum Section<T> {
    Available { items: Vec<T> },
    NotAvailable { reason: String },
}

impl<T> Section<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Available { items } => items,
            Self::NotAvailable { .. } => &[],
        }
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }
}

/// How a requested trip window relates to the forecast window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outlook", rename_all = "snake_case")]
pub enum TripOutlook {
    /// Forecast days falling inside the trip window
    Overlapping {
        trip: TripWindow,
        days: Vec<ForecastDay>,
    },
    /// Trip dates lie entirely outside the forecast window
    OutsideForecast {
        trip: TripWindow,
        forecast: TripWindow,
        message: String,
    },
    /// No forecast was available to compare against
    NotAvailable { trip: TripWindow, reason: String },
}

/// Everything known about a planned visit, built once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitReport {
    pub park: ParkSummary,
    /// Alerts mentioning closures
    pub closures: Section<Alert>,
    pub events: Section<ParkEvent>,
    pub campgrounds: Section<Campground>,
    pub forecast: Section<ForecastDay>,
    /// Best days first
    pub best_days: Vec<DayScore>,
    pub trip: Option<TripOutlook>,
    pub generated_at: DateTime<Utc>,
}
