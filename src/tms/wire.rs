//! # TMS Wire Schema
//!
//! External wire representations for the TMS provider's OAuth and shipment
//! APIs. These types are derived per call and never persisted; field names
//! follow the provider's JSON contract exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// OAuth
// ---------------------------------------------------------------------------

/// Body of `POST /oauth/token`. The provider's password grant uses
/// snake_case field names, unlike the shipment API.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest {
    pub grant_type: String,
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub scope: String,
    #[serde(rename = "type")]
    pub account_type: String,
}

/// Token endpoint response. A refresh token is returned but the refresh
/// grant is never used; re-authentication always runs the password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub tenant_ref: String,
}

// ---------------------------------------------------------------------------
// Shipment create/update request
// ---------------------------------------------------------------------------

/// Provider code table entry: a numeric key (as string) plus display value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeValue {
    pub key: String,
    pub value: String,
}

impl CodeValue {
    pub fn from_pair((key, value): (&str, &str)) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInfo {
    pub date: DateTime<Utc>,
    pub time_zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShipmentStatus {
    #[serde(default)]
    pub code: Option<CodeValue>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(rename = "_operation")]
    pub operation: i32,
    #[serde(rename = "type")]
    pub equipment_type: CodeValue,
    pub size: CodeValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeInfo {
    #[serde(rename = "_operation")]
    pub operation: i32,
    pub source_segment_sequence: String,
    pub mode: CodeValue,
    pub service_type: CodeValue,
}

/// Appointment window carried by each route stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub date: DateTime<Utc>,
    pub time_zone: String,
    /// Flex window in seconds around the appointment.
    pub flex: i64,
    pub has_time: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopContact {
    pub name: String,
    pub phone: String,
}

/// One stop on the shipment's global route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub name: String,
    pub sequence: i32,
    pub stop_type: CodeValue,
    pub scheduling_type: CodeValue,
    pub appointment: Appointment,
    pub state: String,
    pub contact: StopContact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub account_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOrder {
    pub customer_order_source_id: String,
    pub customer: CustomerRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarrierRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scac: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarrierOrder {
    pub carrier_order_source_id: String,
    pub carrier: CarrierRef,
}

/// `POST /shipments` request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRequest {
    pub ltl_shipment: bool,
    pub start_date: DateInfo,
    pub end_date: DateInfo,
    pub status: ShipmentStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub equipment: Vec<Equipment>,
    pub lane: Lane,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub global_route: Vec<RouteStop>,
    pub skip_distance_calculation: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mode_info: Vec<ModeInfo>,
    pub customer_order: Vec<CustomerOrder>,
    pub carrier_order: Vec<CarrierOrder>,
    #[serde(rename = "use_routing_guide")]
    pub use_routing_guide: bool,
}

// ---------------------------------------------------------------------------
// Shipment responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyEcho {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerOrderEcho {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub customer: PartyEcho,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarrierOrderEcho {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub carrier: PartyEcho,
}

/// Shipment as echoed back by the provider. Only `id` is consumed by the
/// orchestrator; the order echoes are decoded for logging and diagnostics.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentResponse {
    pub id: i64,
    #[serde(default)]
    pub custom_id: String,
    #[serde(default)]
    pub status: ShipmentStatus,
    #[serde(default)]
    pub customer_order: Vec<CustomerOrderEcho>,
    #[serde(default)]
    pub carrier_order: Vec<CarrierOrderEcho>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPagination {
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub total_records_in_page: i64,
    #[serde(default)]
    pub more_available: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListShipmentsDetails {
    #[serde(default)]
    pub pagination: ListPagination,
    #[serde(default)]
    pub shipments: Vec<ShipmentResponse>,
}

/// `GET /shipments/list` envelope. The provider capitalizes `Status` here,
/// unlike every other field in its API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListShipmentsResponse {
    #[serde(default, rename = "Status")]
    pub status: String,
    #[serde(default)]
    pub details: ListShipmentsDetails,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_auth_request_wire_names() {
        let req = AuthRequest {
            grant_type: "password".to_string(),
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
            username: "user".to_string(),
            password: "pass".to_string(),
            scope: "read+trust+write".to_string(),
            account_type: "business".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["grant_type"], "password");
        assert_eq!(json["type"], "business");
        assert!(json.get("account_type").is_none());
    }

    #[test]
    fn test_auth_response_tolerates_missing_optionals() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"access_token": "tok", "expires_in": 3600}"#).unwrap();
        assert_eq!(resp.access_token, "tok");
        assert_eq!(resp.expires_in, 3600);
        assert!(resp.refresh_token.is_empty());
    }

    #[test]
    fn test_shipment_request_wire_names() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let req = ShipmentRequest {
            ltl_shipment: false,
            start_date: DateInfo {
                date,
                time_zone: "America/New_York".to_string(),
            },
            end_date: DateInfo {
                date,
                time_zone: "America/New_York".to_string(),
            },
            status: ShipmentStatus::default(),
            equipment: vec![Equipment {
                operation: 0,
                equipment_type: CodeValue::from_pair(("1200", "Van")),
                size: CodeValue::from_pair(("1308", "53 ft")),
            }],
            lane: Lane {
                start: "Chicago, IL, 60601".to_string(),
                end: "Detroit, MI, 48201".to_string(),
            },
            global_route: vec![],
            skip_distance_calculation: false,
            mode_info: vec![],
            customer_order: vec![],
            carrier_order: vec![],
            use_routing_guide: false,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["ltlShipment"], false);
        assert_eq!(json["equipment"][0]["_operation"], 0);
        assert_eq!(json["equipment"][0]["type"]["key"], "1200");
        assert_eq!(json["use_routing_guide"], false);
        assert!(json.get("globalRoute").is_none());
    }

    #[test]
    fn test_shipment_response_decodes_id() {
        let resp: ShipmentResponse = serde_json::from_str(
            r#"{"id": 555, "customId": "S-555", "customerOrder": [{"id": 1, "customer": {"id": 9, "name": "Acme"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.id, 555);
        assert_eq!(resp.customer_order[0].customer.name, "Acme");
    }
}
