//! Data models for the `TrailPlanner` engine
//!
//! This module contains the core domain models organized by concern:
//! - Location: canonical codes, remote ids and coordinates
//! - Attributes: the normalised attribute/capability record
//! - Trail: facility records and post-decode filters
//! - Forecast: daily forecasts, day scores and trip windows
//! - Park / Report: subsources and the composed visit report

pub mod attributes;
pub mod forecast;
pub mod location;
pub mod park;
pub mod report;
pub mod trail;

// Re-export all public types for convenient access
pub use attributes::{AttributeSet, AttributeValue};
pub use forecast::{DayScore, ForecastDay, TripWindow};
pub use location::{AreaRef, GeoPoint, LocationCode, RemoteAreaId};
pub use park::{Alert, Campground, ParkEvent, ParkSummary};
pub use report::{Section, TripOutlook, VisitReport};
pub use trail::{Enrichment, Trail, TrailFilter};
