//! # Load Model
//!
//! The locally owned, authoritative record of a freight shipment.
//!
//! A `Load` always exists locally once creation succeeds, whether or not the
//! external TMS mirror was created. A non-empty `external_tms_load_id` marks
//! a confirmed remote mirror; an empty one marks the load as pending
//! reconciliation.
//!
//! The party fields (`customer`, `bill_to`, `pickup`, `consignee`, `carrier`,
//! `rate_data`, `specifications`) are opaque attribute bags persisted
//! verbatim as JSONB. The schema adapter in [`crate::tms::mapper`] is the
//! only place that reads inside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Composite load status: a coded key/value pair plus free-text notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStatus {
    #[serde(default)]
    pub code: StatusCode,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCode {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// A persisted freight load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Load {
    pub id: Uuid,
    /// Identifier assigned by the external TMS; empty until the remote
    /// mirror is confirmed, set at most once afterwards.
    pub external_tms_load_id: String,
    /// Caller-supplied business identifier.
    pub freight_load_id: String,
    pub status: Value,
    pub customer: Value,
    pub bill_to: Value,
    pub pickup: Value,
    pub consignee: Value,
    pub carrier: Value,
    pub rate_data: Value,
    pub specifications: Value,
    pub in_pallet_count: i32,
    pub out_pallet_count: i32,
    pub num_commodities: i32,
    pub total_weight: f64,
    pub billable_weight: f64,
    pub po_nums: String,
    pub operator: String,
    pub route_miles: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New Load for creation (without repository-generated fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLoad {
    pub external_tms_load_id: String,
    pub freight_load_id: String,
    pub status: Value,
    pub customer: Value,
    pub bill_to: Value,
    pub pickup: Value,
    pub consignee: Value,
    pub carrier: Value,
    pub rate_data: Value,
    pub specifications: Value,
    pub in_pallet_count: i32,
    pub out_pallet_count: i32,
    pub num_commodities: i32,
    pub total_weight: f64,
    pub billable_weight: f64,
    pub po_nums: String,
    pub operator: String,
    pub route_miles: f64,
}

impl Load {
    /// Whether the external TMS mirror has been confirmed.
    pub fn is_synced(&self) -> bool {
        !self.external_tms_load_id.is_empty()
    }

    /// Parse the persisted status bag back into its typed form.
    ///
    /// Missing fields fall back to their defaults; the bag shape is owned
    /// by this crate so a stricter failure mode buys nothing.
    pub fn status_parsed(&self) -> LoadStatus {
        serde_json::from_value(self.status.clone()).unwrap_or_default()
    }
}
