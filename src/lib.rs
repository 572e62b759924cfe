//! `TrailPlanner` - Park, trail and weather aggregation for visit planning
//!
//! This library resolves park codes to recreation areas, aggregates and
//! enriches trail records, scores forecast days and composes visit reports.

pub mod aggregator;
pub mod catalog;
pub mod config;
pub mod decoder;
pub mod error;
pub mod logging;
pub mod models;
pub mod planner;
pub mod providers;
pub mod report;
pub mod resolver;
pub mod scorer;
#[doc(hidden)]
pub mod test_support;
pub mod transport;

// Re-export core types for public API
pub use aggregator::{FetchScope, TrailAggregator};
pub use catalog::Catalog;
pub use config::TrailPlannerConfig;
pub use decoder::AttributeDecoder;
pub use error::TrailPlannerError;
pub use models::{
    AreaRef, AttributeSet, DayScore, ForecastDay, LocationCode, RemoteAreaId, Trail, TrailFilter,
    TripWindow, VisitReport,
};
pub use planner::VisitPlanner;
pub use report::{Subsources, compose_visit_report};
pub use resolver::{IdentifierResolver, Resolution};
pub use scorer::score;
pub use transport::{HttpFetcher, ReqwestFetcher};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TrailPlannerError>;
