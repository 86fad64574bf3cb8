//! Error types for the Workforce Analytics Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while compiling analytics and reports.
//! Empty datasets are deliberately absent: a window without records resolves
//! every metric to its documented default instead of failing.

use thiserror::Error;

/// The main error type for the Workforce Analytics Engine.
///
/// # Example
///
/// ```
/// use workforce_analytics::error::AnalyticsError;
///
/// let error = AnalyticsError::ConfigNotFound {
///     path: "/missing/scoring.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/scoring.yaml");
/// ```
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A reporting window was malformed or inverted.
    #[error("Invalid window: {message}")]
    InvalidWindow {
        /// A description of what made the window invalid.
        message: String,
    },

    /// A request parameter could not be interpreted.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// A description of the problem.
        message: String,
    },

    /// A single record carried inconsistent data.
    #[error("Invalid record '{record}': {message}")]
    InvalidRecord {
        /// Identifier of the offending record.
        record: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// The record repository failed to answer a query.
    #[error("Repository error: {message}")]
    Repository {
        /// A description of the failure.
        message: String,
    },

    /// Rendering a tabular export failed.
    #[error("Export error: {message}")]
    Export {
        /// A description of the failure.
        message: String,
    },
}

impl From<csv::Error> for AnalyticsError {
    fn from(err: csv::Error) -> Self {
        AnalyticsError::Export {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return AnalyticsError.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = AnalyticsError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = AnalyticsError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_window_displays_message() {
        let error = AnalyticsError::InvalidWindow {
            message: "end date 2026-01-01 is before start date 2026-02-01".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid window: end date 2026-01-01 is before start date 2026-02-01"
        );
    }

    #[test]
    fn test_invalid_parameter_displays_name_and_message() {
        let error = AnalyticsError::InvalidParameter {
            name: "type".to_string(),
            message: "unknown graph type 'pie'".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid parameter 'type': unknown graph type 'pie'"
        );
    }

    #[test]
    fn test_invalid_record_displays_record_and_message() {
        let error = AnalyticsError::InvalidRecord {
            record: "leave_017".to_string(),
            message: "end date before start date".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid record 'leave_017': end date before start date"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<AnalyticsError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_repository_error() -> AnalyticsResult<()> {
            Err(AnalyticsError::Repository {
                message: "snapshot unavailable".to_string(),
            })
        }

        fn propagates_error() -> AnalyticsResult<()> {
            returns_repository_error()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
