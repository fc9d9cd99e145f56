pub mod api;
pub mod bucketing;
pub mod cli;
pub mod collector;
pub mod config;
pub mod engine;
pub mod error;
pub mod fetch;
pub mod fetch_api;
pub mod fit;
pub mod metrics;
pub mod percentages;
pub mod planner;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use api::{overlay_json, summarize_request_json, SummaryRequest};
pub use bucketing::{bucket_for, group_observations};
pub use collector::{collect_window, collect_window_concurrent, CollectedWindow, FailedDay};
pub use config::{load_config, save_config, EngineConfig};
pub use engine::HeartRateEngine;
pub use error::{HrError, Result};
pub use fetch::{parse_day_payload, DayFetcher, StaticDayFetcher};
pub use fetch_api::HttpDayFetcher;
pub use fit::{fit_lognormal, fit_overlay, HistogramMode, LognormalParams, OverlayCurve};
pub use metrics::Metrics;
pub use percentages::{calculate_percentages, summarize};
pub use planner::{explicit_range, plan, weeks_back, PlanRequest};
pub use types::{
    BucketKey, DateWindow, GroupedData, Observation, Percentages, RawReading, WindowOutcome,
    WindowResult,
};
