//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading analytics
//! policies from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{AnalyticsError, AnalyticsResult};

use super::types::{
    AnalyticsConfig, DetectionPolicy, ForecastPolicy, PayrollPolicy, RequestLimits, ScoringPolicy,
};

/// Loads and provides access to analytics configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── scoring.yaml      # Performance score weights and bands
/// ├── forecasting.yaml  # Forecast windows and insight thresholds
/// ├── detection.yaml    # Anomaly and burnout thresholds
/// ├── payroll.yaml      # Payroll constants and salary bands
/// └── limits.yaml       # Bounds on request windows
/// ```
///
/// # Example
///
/// ```no_run
/// use workforce_analytics::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default").unwrap();
/// println!("Scoring window: {} days", loader.config().scoring().lookback_days);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AnalyticsConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The score weights do not sum to one
    pub fn load<P: AsRef<Path>>(path: P) -> AnalyticsResult<Self> {
        let path = path.as_ref();

        let scoring = Self::load_yaml::<ScoringPolicy>(&path.join("scoring.yaml"))?;
        let forecasting = Self::load_yaml::<ForecastPolicy>(&path.join("forecasting.yaml"))?;
        let detection = Self::load_yaml::<DetectionPolicy>(&path.join("detection.yaml"))?;
        let payroll = Self::load_yaml::<PayrollPolicy>(&path.join("payroll.yaml"))?;
        let limits = Self::load_yaml::<RequestLimits>(&path.join("limits.yaml"))?;

        let weight_total = scoring.weights.total();
        if weight_total != rust_decimal::Decimal::ONE {
            return Err(AnalyticsError::ConfigParseError {
                path: path.join("scoring.yaml").display().to_string(),
                message: format!("score weights must sum to 1, got {}", weight_total),
            });
        }
        if payroll.working_days_per_month <= rust_decimal::Decimal::ZERO {
            return Err(AnalyticsError::ConfigParseError {
                path: path.join("payroll.yaml").display().to_string(),
                message: "working_days_per_month must be positive".to_string(),
            });
        }

        if limits.max_window_days == 0 || limits.default_trend_days > limits.max_window_days {
            return Err(AnalyticsError::ConfigParseError {
                path: path.join("limits.yaml").display().to_string(),
                message: "max_window_days must be positive and cover default_trend_days"
                    .to_string(),
            });
        }

        debug!(path = %path.display(), "Loaded analytics configuration");

        Ok(Self {
            config: AnalyticsConfig::new(scoring, forecasting, detection, payroll, limits),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> AnalyticsResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| AnalyticsError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| AnalyticsError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying analytics configuration.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/default"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
    }

    #[test]
    fn test_loaded_scoring_policy_matches_reference_values() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let scoring = loader.config().scoring();
        assert_eq!(scoring.lookback_days, 90);
        assert_eq!(scoring.weights.attendance, dec("0.35"));
        assert_eq!(scoring.weights.total(), Decimal::ONE);
        assert_eq!(
            scoring.on_time_cutoff,
            NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
        assert_eq!(scoring.ideal_hours_min, dec("7.5"));
    }

    #[test]
    fn test_loaded_detection_policy() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let anomaly = loader.config().anomaly();
        assert_eq!(anomaly.lookback_days, 30);
        assert_eq!(anomaly.late_ratio, dec("0.7"));
        assert_eq!(anomaly.late_after, NaiveTime::from_hms_opt(9, 30, 0).unwrap());

        let burnout = loader.config().burnout();
        assert_eq!(burnout.long_hours_points, 40);
        assert_eq!(burnout.high_threshold, 70);
    }

    #[test]
    fn test_loaded_payroll_policy() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let payroll = loader.config().payroll();
        assert_eq!(payroll.working_days_per_month, dec("22"));
        assert_eq!(payroll.salary_bands.len(), 5);
        assert!(payroll.salary_bands[4].max.is_none());
        assert!(payroll.salary_bands[1].contains(dec("30000")));
        assert!(!payroll.salary_bands[1].contains(dec("50000")));
    }

    #[test]
    fn test_loaded_request_limits() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let limits = loader.config().limits();
        assert_eq!(limits.max_window_days, 1096);
        assert_eq!(limits.default_trend_days, 30);
    }

    #[test]
    fn test_missing_directory_reports_config_not_found() {
        let err = ConfigLoader::load("./config/does_not_exist").unwrap_err();
        match err {
            AnalyticsError::ConfigNotFound { path } => assert!(path.contains("scoring.yaml")),
            other => panic!("Expected ConfigNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_defaults_match_loaded_files() {
        let loaded = ConfigLoader::load(config_path()).unwrap();
        let defaults = ConfigLoader::default();
        assert_eq!(
            loaded.config().forecasting().default_attendance_rate,
            defaults.config().forecasting().default_attendance_rate
        );
        assert_eq!(
            loaded.config().anomaly().cluster_min_count,
            defaults.config().anomaly().cluster_min_count
        );
        assert_eq!(
            loaded.config().burnout().rest_days_limit,
            defaults.config().burnout().rest_days_limit
        );
    }
}
