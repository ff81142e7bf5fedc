//! Categorized application errors
//!
//! Workflows return [`AppError`]. Each error maps to an [`ErrorCategory`] so
//! frontends can pick a treatment and show a resolution hint without matching
//! on every variant.

use crate::core::TransitionError;
use crate::data_source::DataSourceError;
use std::fmt;
use thiserror::Error;

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed operator or wire input (correctable by the caller)
    Input,
    /// Missing wiring or settings (correctable by configuration)
    Config,
    /// Requested entity does not exist
    NotFound,
    /// Backend unreachable (often transient)
    Network,
    /// Backend answered with unusable data
    Data,
}

impl ErrorCategory {
    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Data => "Data",
        }
    }

    /// Get a hint for the operator on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Input => "Check your input and try again",
            Self::Config => "Review your configuration settings",
            Self::NotFound => "The requested record could not be found",
            Self::Network => "Check your network connection and retry",
            Self::Data => "The backend returned data that could not be read",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Error returned by workflows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// The core was built without a data source
    #[error("No data source attached")]
    NoDataSource,

    /// A fetch failed; the failure is also recorded in the state tree
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    /// A wire-form transition was rejected
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl AppError {
    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::DataSource(DataSourceError::network(message))
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::DataSource(DataSourceError::not_found(what))
    }

    /// Category for frontend treatment.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoDataSource => ErrorCategory::Config,
            Self::DataSource(err) => err.category(),
            Self::Transition(_) => ErrorCategory::Input,
        }
    }

    /// Get a hint for the operator on how to resolve this error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        self.category().resolution_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_routing() {
        assert_eq!(AppError::NoDataSource.category(), ErrorCategory::Config);
        assert_eq!(AppError::network("down").category(), ErrorCategory::Network);
        assert_eq!(
            AppError::from(TransitionError::UnknownTransition {
                kind: "x".to_string()
            })
            .category(),
            ErrorCategory::Input
        );
    }

    #[test]
    fn test_transparent_display() {
        assert_eq!(
            AppError::not_found("address a1").to_string(),
            "address a1 not found"
        );
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ErrorCategory::NotFound.to_string(), "Not Found");
        assert_eq!(
            AppError::NoDataSource.resolution_hint(),
            "Review your configuration settings"
        );
    }
}
