//! Request and response shapes for the load orchestration surface.
//!
//! These mirror the inbound JSON contract: the two load identifiers keep
//! their historical `...LoadID` casing, everything else is camelCase.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{Load, LoadStatus, NewLoad};

/// Inbound load-creation payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoadRequest {
    #[serde(default, rename = "externalTMSLoadID")]
    pub external_tms_load_id: String,
    #[serde(rename = "freightLoadID")]
    pub freight_load_id: String,
    #[serde(default)]
    pub status: LoadStatus,
    #[serde(default)]
    pub customer: Value,
    #[serde(default)]
    pub bill_to: Value,
    #[serde(default)]
    pub pickup: Value,
    #[serde(default)]
    pub consignee: Value,
    #[serde(default)]
    pub carrier: Value,
    #[serde(default)]
    pub rate_data: Value,
    #[serde(default)]
    pub specifications: Value,
    #[serde(default)]
    pub in_pallet_count: i32,
    #[serde(default)]
    pub out_pallet_count: i32,
    #[serde(default)]
    pub num_commodities: i32,
    #[serde(default)]
    pub total_weight: f64,
    #[serde(default)]
    pub billable_weight: f64,
    #[serde(default)]
    pub po_nums: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub route_miles: f64,
}

impl CreateLoadRequest {
    /// Build the persistable entity, stamping in whatever external id the
    /// remote create produced (empty when the mirror is pending).
    pub fn into_new_load(self, external_tms_load_id: String) -> NewLoad {
        NewLoad {
            external_tms_load_id,
            freight_load_id: self.freight_load_id,
            status: serde_json::to_value(&self.status).unwrap_or(Value::Null),
            customer: self.customer,
            bill_to: self.bill_to,
            pickup: self.pickup,
            consignee: self.consignee,
            carrier: self.carrier,
            rate_data: self.rate_data,
            specifications: self.specifications,
            in_pallet_count: self.in_pallet_count,
            out_pallet_count: self.out_pallet_count,
            num_commodities: self.num_commodities,
            total_weight: self.total_weight,
            billable_weight: self.billable_weight,
            po_nums: self.po_nums,
            operator: self.operator,
            route_miles: self.route_miles,
        }
    }
}

/// Outbound representation of a persisted load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResponse {
    pub id: String,
    #[serde(rename = "externalTMSLoadID")]
    pub external_tms_load_id: String,
    #[serde(rename = "freightLoadID")]
    pub freight_load_id: String,
    pub status: LoadStatus,
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
    pub created_at: String,
    pub updated_at: String,
}

impl LoadResponse {
    pub fn from_load(load: Load) -> Self {
        let status = load.status_parsed();
        Self {
            id: load.id.to_string(),
            external_tms_load_id: load.external_tms_load_id,
            freight_load_id: load.freight_load_id,
            status,
            customer: load.customer,
            bill_to: load.bill_to,
            pickup: load.pickup,
            consignee: load.consignee,
            carrier: load.carrier,
            rate_data: load.rate_data,
            specifications: load.specifications,
            in_pallet_count: load.in_pallet_count,
            out_pallet_count: load.out_pallet_count,
            num_commodities: load.num_commodities,
            total_weight: load.total_weight,
            billable_weight: load.billable_weight,
            po_nums: load.po_nums,
            operator: load.operator,
            route_miles: load.route_miles,
            created_at: load.created_at.to_rfc3339(),
            updated_at: load.updated_at.to_rfc3339(),
        }
    }
}

/// One page of loads plus the total count across all pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListLoadsResponse {
    pub loads: Vec<LoadResponse>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}
