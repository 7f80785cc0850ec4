//! # Shipment Mapper
//!
//! Deterministic transformation from a load's loosely-typed attribute bags
//! into the provider's shipment-create request, and from the provider's
//! response back to the local external id.
//!
//! Every field the mapper needs is a required-path extraction: an absent or
//! mistyped path fails with a [`FreightError::Mapping`] naming the dotted
//! path, never a silent default and never a panic. The mapper is pure —
//! timestamps come from the payload and the time zone from the constructor,
//! so identical input always yields an identical request.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::constants::{tms_codes, STOP_FLEX_SECS, STOP_STATE_OPEN};
use crate::error::{FreightError, Result};
use crate::models::LoadStatus;
use crate::tms::wire::{
    Appointment, CarrierOrder, CarrierRef, CodeValue, CustomerOrder, CustomerRef, DateInfo,
    Equipment, Lane, ModeInfo, RouteStop, ShipmentRequest, ShipmentResponse, ShipmentStatus,
    StopContact,
};

/// Named mapping strategies.
///
/// `Full` is the standard truckload mapping with route, equipment, and mode
/// segments. `Ltl` is the legacy simplified mapping: `ltlShipment = true`,
/// a city/state-only lane, and no route or equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingStrategy {
    #[default]
    Full,
    Ltl,
}

/// Borrowed view of the load fields the mapper reads. Built by the
/// orchestrator from either an inbound creation payload or a persisted
/// load awaiting reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct LoadSnapshot<'a> {
    pub freight_load_id: &'a str,
    pub status: &'a LoadStatus,
    pub customer: &'a Value,
    pub pickup: &'a Value,
    pub consignee: &'a Value,
    pub carrier: &'a Value,
}

/// Pure load-to-shipment schema adapter.
#[derive(Debug, Clone)]
pub struct ShipmentMapper {
    time_zone: String,
    strategy: MappingStrategy,
}

// Typed boundary structs parsed out of the attribute bags. Parsing happens
// once per mapping; everything downstream works on checked data.

#[derive(Debug)]
struct Address {
    city: String,
    state: String,
    zip_code: String,
}

#[derive(Debug)]
struct StopDetails {
    facility_name: String,
    scheduled_time: DateTime<Utc>,
    address: Address,
    contact: StopContact,
}

#[derive(Debug)]
struct CustomerDetails {
    name: String,
    account_number: String,
}

#[derive(Debug)]
struct CarrierDetails {
    name: String,
    scac: String,
    equipment_length: String,
}

impl ShipmentMapper {
    pub fn new(time_zone: impl Into<String>, strategy: MappingStrategy) -> Self {
        Self {
            time_zone: time_zone.into(),
            strategy,
        }
    }

    pub fn strategy(&self) -> MappingStrategy {
        self.strategy
    }

    /// Build the shipment-create request for the configured strategy.
    pub fn to_shipment_request(&self, load: &LoadSnapshot<'_>) -> Result<ShipmentRequest> {
        match self.strategy {
            MappingStrategy::Full => self.map_full(load),
            MappingStrategy::Ltl => self.map_ltl(load),
        }
    }

    /// Reverse mapping: the provider's numeric shipment id becomes the
    /// load's external TMS id.
    pub fn external_load_id(response: &ShipmentResponse) -> String {
        response.id.to_string()
    }

    fn map_full(&self, load: &LoadSnapshot<'_>) -> Result<ShipmentRequest> {
        let pickup = parse_stop(load.pickup, "pickup")?;
        let consignee = parse_stop(load.consignee, "consignee")?;
        let customer = parse_customer(load.customer)?;
        let carrier = parse_carrier(load.carrier)?;

        let equipment = vec![Equipment {
            operation: 0,
            equipment_type: CodeValue::from_pair(tms_codes::EQUIPMENT_TYPE_VAN),
            size: CodeValue {
                key: tms_codes::EQUIPMENT_SIZE_KEY.to_string(),
                value: format!("{} ft", carrier.equipment_length),
            },
        }];

        let mode_info = vec![ModeInfo {
            operation: 0,
            source_segment_sequence: "1".to_string(),
            mode: CodeValue::from_pair(tms_codes::MODE_TL),
            service_type: CodeValue::from_pair(tms_codes::SERVICE_TYPE_ANY),
        }];

        let global_route = vec![
            self.route_stop(&pickup, 0, tms_codes::STOP_TYPE_PICKUP),
            self.route_stop(&consignee, 1, tms_codes::STOP_TYPE_DELIVERY),
        ];

        Ok(ShipmentRequest {
            ltl_shipment: false,
            start_date: self.date_info(pickup.scheduled_time),
            end_date: self.date_info(consignee.scheduled_time),
            status: map_status(load.status),
            equipment,
            lane: Lane {
                start: full_lane_point(&pickup.address),
                end: full_lane_point(&consignee.address),
            },
            global_route,
            skip_distance_calculation: false,
            mode_info,
            customer_order: vec![CustomerOrder {
                customer_order_source_id: load.freight_load_id.to_string(),
                customer: CustomerRef {
                    name: customer.name,
                    account_number: customer.account_number,
                },
            }],
            carrier_order: vec![CarrierOrder {
                carrier_order_source_id: load.freight_load_id.to_string(),
                carrier: CarrierRef {
                    name: carrier.name,
                    scac: carrier.scac,
                },
            }],
            use_routing_guide: false,
        })
    }

    /// Legacy simplified mapping: no route, equipment, or mode segments,
    /// and the lane carries city/state only.
    fn map_ltl(&self, load: &LoadSnapshot<'_>) -> Result<ShipmentRequest> {
        let pickup_time = require_timestamp(load.pickup, "pickup", &["scheduledTime"])?;
        let delivery_time = require_timestamp(load.consignee, "consignee", &["scheduledTime"])?;
        let pickup_address = parse_address(load.pickup, "pickup")?;
        let consignee_address = parse_address(load.consignee, "consignee")?;
        let customer_name = require_str(load.customer, "customer", &["name"])?;

        Ok(ShipmentRequest {
            ltl_shipment: true,
            start_date: self.date_info(pickup_time),
            end_date: self.date_info(delivery_time),
            status: map_status(load.status),
            equipment: vec![],
            lane: Lane {
                start: short_lane_point(&pickup_address),
                end: short_lane_point(&consignee_address),
            },
            global_route: vec![],
            skip_distance_calculation: false,
            mode_info: vec![],
            customer_order: vec![CustomerOrder {
                customer_order_source_id: load.freight_load_id.to_string(),
                customer: CustomerRef {
                    name: customer_name,
                    account_number: String::new(),
                },
            }],
            carrier_order: vec![],
            use_routing_guide: false,
        })
    }

    fn date_info(&self, date: DateTime<Utc>) -> DateInfo {
        DateInfo {
            date,
            time_zone: self.time_zone.clone(),
        }
    }

    fn route_stop(&self, stop: &StopDetails, sequence: i32, stop_type: (&str, &str)) -> RouteStop {
        RouteStop {
            name: stop.facility_name.clone(),
            sequence,
            stop_type: CodeValue::from_pair(stop_type),
            scheduling_type: CodeValue::from_pair(tms_codes::SCHEDULING_BY_APPOINTMENT),
            appointment: Appointment {
                date: stop.scheduled_time,
                time_zone: self.time_zone.clone(),
                flex: STOP_FLEX_SECS,
                has_time: true,
            },
            state: STOP_STATE_OPEN.to_string(),
            contact: stop.contact.clone(),
        }
    }
}

fn map_status(status: &LoadStatus) -> ShipmentStatus {
    let code = if status.code.key.is_empty() && status.code.value.is_empty() {
        None
    } else {
        Some(CodeValue {
            key: status.code.key.clone(),
            value: status.code.value.clone(),
        })
    };
    ShipmentStatus {
        code,
        notes: status.notes.clone(),
        description: status.description.clone(),
    }
}

fn full_lane_point(address: &Address) -> String {
    format!("{}, {}, {}", address.city, address.state, address.zip_code)
}

fn short_lane_point(address: &Address) -> String {
    format!("{}, {}", address.city, address.state)
}

fn parse_address(bag: &Value, root: &str) -> Result<Address> {
    Ok(Address {
        city: require_str(bag, root, &["address", "city"])?,
        state: require_str(bag, root, &["address", "state"])?,
        zip_code: require_str(bag, root, &["address", "zipCode"])?,
    })
}

fn parse_stop(bag: &Value, root: &str) -> Result<StopDetails> {
    Ok(StopDetails {
        facility_name: require_str(bag, root, &["facilityName"])?,
        scheduled_time: require_timestamp(bag, root, &["scheduledTime"])?,
        address: parse_address(bag, root)?,
        contact: StopContact {
            name: require_str(bag, root, &["contact", "name"])?,
            phone: require_str(bag, root, &["contact", "phone"])?,
        },
    })
}

fn parse_customer(bag: &Value) -> Result<CustomerDetails> {
    Ok(CustomerDetails {
        name: require_str(bag, "customer", &["name"])?,
        account_number: require_str(bag, "customer", &["accountNumber"])?,
    })
}

fn parse_carrier(bag: &Value) -> Result<CarrierDetails> {
    Ok(CarrierDetails {
        name: require_str(bag, "carrier", &["name"])?,
        scac: require_str(bag, "carrier", &["scac"])?,
        equipment_length: require_length(bag, "carrier", &["equipment", "length"])?,
    })
}

/// Walk `segments` into `bag`, failing with the full dotted path of the
/// first missing or non-object hop.
fn require_value<'a>(bag: &'a Value, root: &str, segments: &[&str]) -> Result<&'a Value> {
    let mut current = bag;
    let mut path = root.to_string();
    for segment in segments {
        let object = current
            .as_object()
            .ok_or_else(|| FreightError::mapping(path.clone(), "expected an object"))?;
        path = format!("{path}.{segment}");
        current = object
            .get(*segment)
            .ok_or_else(|| FreightError::mapping(path.clone(), "path is missing"))?;
    }
    Ok(current)
}

fn require_str(bag: &Value, root: &str, segments: &[&str]) -> Result<String> {
    let value = require_value(bag, root, segments)?;
    let text = value
        .as_str()
        .ok_or_else(|| FreightError::mapping(dotted(root, segments), "expected a string"))?;
    if text.is_empty() {
        return Err(FreightError::mapping(dotted(root, segments), "is empty"));
    }
    Ok(text.to_string())
}

fn require_timestamp(bag: &Value, root: &str, segments: &[&str]) -> Result<DateTime<Utc>> {
    let text = require_str(bag, root, segments)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            FreightError::mapping(
                dotted(root, segments),
                format!("expected an ISO-8601 timestamp: {e}"),
            )
        })
}

/// Equipment length: accepted as a JSON number or a numeric string, since
/// upstream systems disagree on which they send.
fn require_length(bag: &Value, root: &str, segments: &[&str]) -> Result<String> {
    let value = require_value(bag, root, segments)?;
    if let Some(n) = value.as_i64() {
        return Ok(n.to_string());
    }
    if let Some(f) = value.as_f64() {
        if f.fract() == 0.0 {
            return Ok(format!("{}", f as i64));
        }
        return Ok(f.to_string());
    }
    if let Some(s) = value.as_str() {
        if !s.trim().is_empty() && s.trim().parse::<f64>().is_ok() {
            return Ok(s.trim().to_string());
        }
    }
    Err(FreightError::mapping(
        dotted(root, segments),
        "expected a number",
    ))
}

fn dotted(root: &str, segments: &[&str]) -> String {
    let mut path = root.to_string();
    for segment in segments {
        path.push('.');
        path.push_str(segment);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusCode;
    use serde_json::json;

    fn pickup_bag() -> Value {
        json!({
            "facilityName": "Chicago DC",
            "scheduledTime": "2024-03-01T09:00:00Z",
            "address": {"city": "Chicago", "state": "IL", "zipCode": "60601"},
            "contact": {"name": "Dock Office", "phone": "312-555-0100"}
        })
    }

    fn consignee_bag() -> Value {
        json!({
            "facilityName": "Detroit Yard",
            "scheduledTime": "2024-03-02T15:30:00Z",
            "address": {"city": "Detroit", "state": "MI", "zipCode": "48201"},
            "contact": {"name": "Receiving", "phone": "313-555-0200"}
        })
    }

    fn customer_bag() -> Value {
        json!({"name": "Acme Foods", "accountNumber": "AC-9001"})
    }

    fn carrier_bag() -> Value {
        json!({"name": "Fast Freight", "scac": "FSTF", "equipment": {"length": 53}})
    }

    fn status() -> LoadStatus {
        LoadStatus {
            code: StatusCode {
                key: "2102".to_string(),
                value: "Tendered".to_string(),
            },
            notes: String::new(),
            description: String::new(),
        }
    }

    fn snapshot<'a>(
        status: &'a LoadStatus,
        customer: &'a Value,
        pickup: &'a Value,
        consignee: &'a Value,
        carrier: &'a Value,
    ) -> LoadSnapshot<'a> {
        LoadSnapshot {
            freight_load_id: "FL-100",
            status,
            customer,
            pickup,
            consignee,
            carrier,
        }
    }

    fn full_mapper() -> ShipmentMapper {
        ShipmentMapper::new("America/New_York", MappingStrategy::Full)
    }

    #[test]
    fn test_full_mapping_code_tables() {
        let (status, customer, pickup, consignee, carrier) = (
            status(),
            customer_bag(),
            pickup_bag(),
            consignee_bag(),
            carrier_bag(),
        );
        let req = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap();

        assert!(!req.ltl_shipment);
        assert_eq!(req.equipment[0].equipment_type.key, "1200");
        assert_eq!(req.equipment[0].equipment_type.value, "Van");
        assert_eq!(req.equipment[0].size.key, "1308");
        assert_eq!(req.equipment[0].size.value, "53 ft");
        assert_eq!(req.mode_info[0].mode.key, "24105");
        assert_eq!(req.mode_info[0].mode.value, "TL");
        assert_eq!(req.mode_info[0].service_type.key, "24304");
        assert_eq!(req.mode_info[0].service_type.value, "Any");
    }

    #[test]
    fn test_full_mapping_route() {
        let (status, customer, pickup, consignee, carrier) = (
            status(),
            customer_bag(),
            pickup_bag(),
            consignee_bag(),
            carrier_bag(),
        );
        let req = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap();

        assert_eq!(req.global_route.len(), 2);

        let origin = &req.global_route[0];
        assert_eq!(origin.sequence, 0);
        assert_eq!(origin.stop_type.key, "1500");
        assert_eq!(origin.scheduling_type.key, "9401");
        assert_eq!(origin.scheduling_type.value, "By appointment");
        assert_eq!(origin.name, "Chicago DC");
        assert_eq!(origin.state, "OPEN");
        assert_eq!(origin.appointment.flex, 3600);
        assert!(origin.appointment.has_time);
        assert_eq!(origin.contact.name, "Dock Office");
        assert_eq!(origin.contact.phone, "312-555-0100");

        let destination = &req.global_route[1];
        assert_eq!(destination.sequence, 1);
        assert_eq!(destination.stop_type.key, "1501");
        assert_eq!(destination.stop_type.value, "Delivery");
    }

    #[test]
    fn test_full_mapping_lane_and_orders() {
        let (status, customer, pickup, consignee, carrier) = (
            status(),
            customer_bag(),
            pickup_bag(),
            consignee_bag(),
            carrier_bag(),
        );
        let req = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap();

        assert_eq!(req.lane.start, "Chicago, IL, 60601");
        assert_eq!(req.lane.end, "Detroit, MI, 48201");
        assert_eq!(req.customer_order[0].customer_order_source_id, "FL-100");
        assert_eq!(req.customer_order[0].customer.name, "Acme Foods");
        assert_eq!(req.customer_order[0].customer.account_number, "AC-9001");
        assert_eq!(req.carrier_order[0].carrier_order_source_id, "FL-100");
        assert_eq!(req.carrier_order[0].carrier.scac, "FSTF");
    }

    #[test]
    fn test_mapping_is_pure() {
        let (status, customer, pickup, consignee, carrier) = (
            status(),
            customer_bag(),
            pickup_bag(),
            consignee_bag(),
            carrier_bag(),
        );
        let snap = snapshot(&status, &customer, &pickup, &consignee, &carrier);
        let mapper = full_mapper();
        let first = mapper.to_shipment_request(&snap).unwrap();
        let second = mapper.to_shipment_request(&snap).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_missing_city_names_path() {
        let (status, customer, consignee, carrier) =
            (status(), customer_bag(), consignee_bag(), carrier_bag());
        let pickup = json!({
            "facilityName": "Chicago DC",
            "scheduledTime": "2024-03-01T09:00:00Z",
            "address": {"state": "IL", "zipCode": "60601"},
            "contact": {"name": "Dock Office", "phone": "312-555-0100"}
        });

        let err = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap_err();

        match err {
            FreightError::Mapping { ref path, .. } => assert_eq!(path, "pickup.address.city"),
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_timestamp_is_mapping_error() {
        let (status, customer, consignee, carrier) =
            (status(), customer_bag(), consignee_bag(), carrier_bag());
        let mut pickup = pickup_bag();
        pickup["scheduledTime"] = json!(12345);

        let err = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap_err();

        match err {
            FreightError::Mapping { ref path, .. } => assert_eq!(path, "pickup.scheduledTime"),
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_carrier_scac_names_path() {
        let (status, customer, pickup, consignee) =
            (status(), customer_bag(), pickup_bag(), consignee_bag());
        let carrier = json!({"name": "Fast Freight", "equipment": {"length": 53}});

        let err = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap_err();

        match err {
            FreightError::Mapping { ref path, .. } => assert_eq!(path, "carrier.scac"),
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_equipment_length_accepts_numeric_string() {
        let (status, customer, pickup, consignee) =
            (status(), customer_bag(), pickup_bag(), consignee_bag());
        let carrier = json!({"name": "Fast Freight", "scac": "FSTF", "equipment": {"length": "48"}});

        let req = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap();
        assert_eq!(req.equipment[0].size.value, "48 ft");
    }

    #[test]
    fn test_equipment_length_rejects_garbage() {
        let (status, customer, pickup, consignee) =
            (status(), customer_bag(), pickup_bag(), consignee_bag());
        let carrier =
            json!({"name": "Fast Freight", "scac": "FSTF", "equipment": {"length": "long"}});

        let err = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap_err();
        match err {
            FreightError::Mapping { ref path, .. } => assert_eq!(path, "carrier.equipment.length"),
            other => panic!("expected mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_ltl_strategy() {
        let (status, customer, pickup, consignee, carrier) = (
            status(),
            customer_bag(),
            pickup_bag(),
            consignee_bag(),
            carrier_bag(),
        );
        let mapper = ShipmentMapper::new("America/New_York", MappingStrategy::Ltl);
        let req = mapper
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap();

        assert!(req.ltl_shipment);
        assert_eq!(req.lane.start, "Chicago, IL");
        assert_eq!(req.lane.end, "Detroit, MI");
        assert!(req.equipment.is_empty());
        assert!(req.global_route.is_empty());
        assert!(req.mode_info.is_empty());
        assert!(req.carrier_order.is_empty());
        assert_eq!(req.customer_order[0].customer.name, "Acme Foods");
    }

    #[test]
    fn test_status_without_code_is_omitted() {
        let status = LoadStatus::default();
        let (customer, pickup, consignee, carrier) = (
            customer_bag(),
            pickup_bag(),
            consignee_bag(),
            carrier_bag(),
        );
        let req = full_mapper()
            .to_shipment_request(&snapshot(&status, &customer, &pickup, &consignee, &carrier))
            .unwrap();
        assert!(req.status.code.is_none());
    }

    #[test]
    fn test_external_load_id() {
        let resp: ShipmentResponse = serde_json::from_str(r#"{"id": 555}"#).unwrap();
        assert_eq!(ShipmentMapper::external_load_id(&resp), "555");
    }
}
