//! Daily forecast, day scores and trip windows

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::TrailPlannerError;

/// One day of a weather forecast, temperatures in Fahrenheit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temp_f: f64,
    pub max_temp_f: f64,
    /// Chance of rain, 0-100
    pub chance_of_rain: u8,
    /// Human-readable description of weather conditions
    pub condition: String,
}

impl ForecastDay {
    #[must_use]
    pub fn average_temp_f(&self) -> f64 {
        (self.min_temp_f + self.max_temp_f) / 2.0
    }

    /// Format temperature range with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.0}–{:.0}°F", self.min_temp_f, self.max_temp_f)
    }
}

/// Visit suitability of a single forecast day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayScore {
    pub date: NaiveDate,
    /// 0-8, higher is better
    pub score: u8,
    pub summary: String,
}

/// Inclusive date range a visitor intends to travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl TripWindow {
    /// Create a window, rejecting an end date before the start date
    pub fn new(start: NaiveDate, end: NaiveDate) -> crate::Result<Self> {
        if end < start {
            return Err(TrailPlannerError::validation(format!(
                "trip end date {end} is before start date {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Closed-interval overlap test
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Window spanned by a forecast, `None` when there are no days
    #[must_use]
    pub fn spanning(days: &[ForecastDay]) -> Option<Self> {
        let start = days.iter().map(|d| d.date).min()?;
        let end = days.iter().map(|d| d.date).max()?;
        Some(Self { start, end })
    }
}
