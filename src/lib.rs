// Library interface for periodrs
// Pure, synchronous cycle analytics over in-memory record snapshots

pub mod analytics;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod dates;
pub mod error;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod prediction;
pub mod report;
pub mod statistics;
pub mod validation;

// Re-export commonly used types for convenience
pub use models::*;
pub use analytics::{
    compute_analytics, compute_cycle_analysis, generate_calendar_events, generate_report,
    AnalyticsConfig, CycleAnalyzer,
};
pub use cache::{AnalyticsCache, CacheMetrics};
pub use calendar::CalendarEventGenerator;
pub use config::AppConfig;
pub use prediction::{Prediction, ASSUMED_LUTEAL_PHASE_DAYS};
pub use validation::{
    has_overlap, validate_daily_record, validate_period_record, validate_period_record_against,
    RecordValidator, ValidationIssue,
    ValidationResult,
};
pub use error::{PeriodRsError, Result};
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
