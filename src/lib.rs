#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Freight Core
//!
//! Core library for a freight brokerage backend: accepts load records,
//! persists them locally, and mirrors each into an external Transportation
//! Management System (TMS) as a shipment, translating between the two
//! independently-evolving schemas.
//!
//! ## Architecture
//!
//! - [`tms::token`] — session/token lifecycle for the external API, with
//!   single-flight refresh
//! - [`tms::mapper`] — pure schema adapter from loosely-typed load payloads
//!   to the provider's wire format
//! - [`tms::client`] — HTTP transport exposing shipment CRUD
//! - [`orchestration`] — the create-load state machine and read paths
//! - [`repository`] — persistence boundary for the [`models::Load`] entity
//!
//! ## Consistency Model
//!
//! No transaction spans the local store and the remote TMS. A load always
//! exists locally once creation succeeds; when the remote mirror fails the
//! load is persisted with an empty external id and reconciled later via
//! `LoadOrchestrator::retry_remote_sync`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use freight_core::config::FreightConfig;
//! use freight_core::orchestration::LoadOrchestrator;
//! use freight_core::repository::PgLoadRepository;
//! use freight_core::tms::{MappingStrategy, ShipmentMapper, TmsClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = FreightConfig::from_env()?;
//! let pool = sqlx::PgPool::connect(&config.database.url()).await?;
//!
//! let repository = Arc::new(PgLoadRepository::new(pool));
//! repository.ensure_schema().await?;
//!
//! let mapper = ShipmentMapper::new(config.tms.time_zone.clone(), MappingStrategy::Full);
//! let tms = Arc::new(TmsClient::new(config.tms)?);
//!
//! let orchestrator = LoadOrchestrator::new(tms, repository, mapper);
//! # let _ = orchestrator;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod repository;
pub mod tms;

pub use config::{DatabaseConfig, FreightConfig, TmsConfig};
pub use error::{FreightError, Result};
pub use models::{Load, LoadStatus, NewLoad, StatusCode};
pub use orchestration::{CreateLoadRequest, ListLoadsResponse, LoadOrchestrator, LoadResponse};
pub use repository::{LoadRepository, PgLoadRepository};
pub use tms::{MappingStrategy, ShipmentMapper, TmsClient, TmsService, TokenManager};
