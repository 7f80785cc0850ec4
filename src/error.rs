//! # Error Types
//!
//! Structured error handling for the freight core using thiserror.
//! Lower layers return typed errors; the orchestration layer is the only
//! place that decides whether an error is fatal for the current operation.

use thiserror::Error;

/// Errors produced by the freight core.
#[derive(Error, Debug)]
pub enum FreightError {
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Mapping failed at {path}: {detail}")]
    Mapping { path: String, detail: String },

    #[error("TMS authentication failed{}: {message}", fmt_status(.status))]
    Authentication { status: Option<u16>, message: String },

    #[error("TMS request failed{}: {message}", fmt_status(.status))]
    RemoteService { status: Option<u16>, message: String },

    #[error("Persistence failure during {operation}: {message}")]
    Persistence { operation: String, message: String },

    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (status {code})"),
        None => String::new(),
    }
}

impl FreightError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a mapping error naming the offending payload path
    pub fn mapping(path: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Mapping {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Create an authentication error carrying the provider response
    pub fn authentication(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Authentication {
            status,
            message: message.into(),
        }
    }

    /// Create a remote service error carrying the provider response
    pub fn remote_service(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::RemoteService {
            status,
            message: message.into(),
        }
    }

    /// Create a persistence error with operation context
    pub fn persistence(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Persistence {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP-equivalent status for callers translating errors at the edge.
    ///
    /// Validation and mapping failures are caller-data faults (4xx);
    /// authentication failures mean the external dependency is unavailable
    /// (503); persistence failures are server-side (5xx).
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation { .. } | Self::Mapping { .. } => 400,
            Self::NotFound { .. } => 404,
            Self::Authentication { .. } => 503,
            Self::RemoteService { .. } => 502,
            Self::Persistence { .. } | Self::Configuration { .. } => 500,
        }
    }

    /// Whether a caller-driven retry of the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::RemoteService { .. } | Self::Persistence { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FreightError>;
