//! # Load Orchestration
//!
//! Coordinates the two-step create flow: remote shipment creation against
//! the external TMS followed by local persistence, plus the read paths and
//! the reconciliation hook for loads whose remote mirror is still pending.

pub mod load_orchestrator;
pub mod types;

pub use load_orchestrator::LoadOrchestrator;
pub use types::{CreateLoadRequest, ListLoadsResponse, LoadResponse};
