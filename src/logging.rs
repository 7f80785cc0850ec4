//! # Structured Logging Module
//!
//! Environment-aware structured logging for tracing orchestration flows
//! and outbound TMS traffic.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let filter = EnvFilter::new(log_level);

        // JSON output in production, human-readable everywhere else.
        let initialized = if environment == "production" {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true)
                        .with_filter(filter),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_filter(filter),
                )
                .try_init()
        };

        // A global subscriber may already be set by the embedding process.
        if initialized.is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }

        tracing::info!(environment = %environment, "Structured logging initialized");
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level from `LOG_LEVEL`, defaulting per environment
fn get_log_level(environment: &str) -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| match environment {
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    })
}

/// Log structured data for load operations
pub fn log_load_operation(
    operation: &str,
    load_id: Option<&str>,
    freight_load_id: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        load_id = load_id,
        freight_load_id = freight_load_id,
        status = %status,
        details = details,
        "LOAD_OPERATION"
    );
}

/// Log structured data for outbound TMS operations
pub fn log_tms_operation(
    operation: &str,
    shipment_id: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        shipment_id = shipment_id,
        status = %status,
        details = details,
        "TMS_OPERATION"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("development"), "debug");
        assert_eq!(get_log_level("test"), "debug");
    }

    #[test]
    fn test_operation_helpers_emit_without_subscriber() {
        log_load_operation("create_load", Some("id"), Some("FL-1"), "synced", None);
        log_load_operation("retry_remote_sync", Some("id"), None, "synced", Some("555"));
        log_tms_operation("create_shipment", Some("555"), "created", None);
        log_tms_operation("delete_shipment", None, "deleted", None);
    }
}
