//! Configuration loading and management for the Workforce Analytics Engine.
//!
//! This module loads the analytics policies (score weights, forecast windows,
//! anomaly and burnout thresholds, payroll constants, request limits) from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use workforce_analytics::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/default").unwrap();
//! println!("Anomaly window: {} days", config.config().anomaly().lookback_days);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AnalyticsConfig, AnomalyPolicy, BurnoutPolicy, DetectionPolicy, ForecastPolicy,
    PayrollPolicy, RequestLimits, SalaryBand, ScoreWeights, ScoringPolicy,
};
