//! # Load Orchestrator
//!
//! Drives the create flow `Validating → AuthenticatingIfNeeded →
//! CreatingRemoteShipment → PersistingLocal → Done` and the read paths.
//!
//! Partial-failure policy: a remote shipment-creation failure is recorded
//! and the flow proceeds to local persistence with the external id left
//! empty, so a create never disappears just because the third party is
//! down. The load is then flagged as pending reconciliation and can be
//! completed later through [`LoadOrchestrator::retry_remote_sync`].
//! Authentication and local persistence failures remain fatal.
//!
//! This is also the only layer translating typed errors into
//! caller-visible outcomes; lower layers never log-and-swallow.

use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::constants::pagination;
use crate::error::{FreightError, Result};
use crate::logging::log_load_operation;
use crate::orchestration::types::{CreateLoadRequest, ListLoadsResponse, LoadResponse};
use crate::repository::LoadRepository;
use crate::tms::mapper::{LoadSnapshot, ShipmentMapper};
use crate::tms::TmsService;

/// Coordinates load creation across the external TMS and the local store.
pub struct LoadOrchestrator {
    tms: Arc<dyn TmsService>,
    repository: Arc<dyn LoadRepository>,
    mapper: ShipmentMapper,
}

impl LoadOrchestrator {
    pub fn new(
        tms: Arc<dyn TmsService>,
        repository: Arc<dyn LoadRepository>,
        mapper: ShipmentMapper,
    ) -> Self {
        Self {
            tms,
            repository,
            mapper,
        }
    }

    /// Create a load locally, mirroring it into the external TMS.
    ///
    /// On success the load always exists locally; `externalTMSLoadID` is
    /// empty when the remote mirror could not be created.
    #[instrument(skip(self, request), fields(freight_load_id = %request.freight_load_id))]
    pub async fn create_load(&self, request: CreateLoadRequest) -> Result<LoadResponse> {
        validate_create(&request)?;

        self.tms.ensure_authenticated().await?;

        // Mapping failures are caller-data faults and abort before any
        // side effect; only a failure of the remote call itself falls
        // under the proceed-and-reconcile policy.
        let snapshot = LoadSnapshot {
            freight_load_id: &request.freight_load_id,
            status: &request.status,
            customer: &request.customer,
            pickup: &request.pickup,
            consignee: &request.consignee,
            carrier: &request.carrier,
        };
        let shipment_request = self.mapper.to_shipment_request(&snapshot)?;

        let external_id = match self.tms.create_shipment(&shipment_request).await {
            Ok(response) => {
                info!(shipment_id = response.id, "Remote shipment created");
                ShipmentMapper::external_load_id(&response)
            }
            Err(e) => {
                // Persisted with an empty id so the load is always visible
                // as pending reconciliation, even when the caller supplied
                // an id of its own.
                warn!(error = %e, "Remote shipment creation failed; persisting load for later reconciliation");
                String::new()
            }
        };

        let load = self
            .repository
            .save(request.into_new_load(external_id))
            .await?;

        if !load.is_synced() {
            warn!(load_id = %load.id, "Load persisted without external TMS id; pending reconciliation");
        }
        log_load_operation(
            "create_load",
            Some(&load.id.to_string()),
            Some(&load.freight_load_id),
            if load.is_synced() {
                "synced"
            } else {
                "pending_reconciliation"
            },
            None,
        );

        Ok(LoadResponse::from_load(load))
    }

    /// Fetch a single load by id.
    pub async fn get_load(&self, id: &str) -> Result<LoadResponse> {
        let load = self.repository.find_by_id(parse_load_id(id)?).await?;
        Ok(LoadResponse::from_load(load))
    }

    /// List loads with `page ≥ 1` and `1 ≤ size ≤ 100`, returning the
    /// total count alongside the page.
    pub async fn list_loads(&self, page: i64, size: i64) -> Result<ListLoadsResponse> {
        if page < pagination::MIN_PAGE {
            return Err(FreightError::validation(
                "Page must be a positive integer",
            ));
        }
        if size < pagination::MIN_PAGE_SIZE || size > pagination::MAX_PAGE_SIZE {
            return Err(FreightError::validation(
                "Size must be a positive integer between 1 and 100",
            ));
        }

        let offset = (page - 1)
            .checked_mul(size)
            .ok_or_else(|| FreightError::validation("Page is out of range"))?;
        let (total, loads) = futures::try_join!(
            self.repository.count(),
            self.repository.find_page(offset, size)
        )?;

        Ok(ListLoadsResponse {
            loads: loads.into_iter().map(LoadResponse::from_load).collect(),
            total,
            page,
            size,
        })
    }

    /// Reconciliation hook: retry the remote mirror for a load persisted
    /// without an external TMS id. A load that is already synced is
    /// returned unchanged.
    #[instrument(skip(self))]
    pub async fn retry_remote_sync(&self, load_id: &str) -> Result<LoadResponse> {
        let id = parse_load_id(load_id)?;
        let load = self.repository.find_by_id(id).await?;

        if load.is_synced() {
            return Ok(LoadResponse::from_load(load));
        }

        let status = load.status_parsed();
        let snapshot = LoadSnapshot {
            freight_load_id: &load.freight_load_id,
            status: &status,
            customer: &load.customer,
            pickup: &load.pickup,
            consignee: &load.consignee,
            carrier: &load.carrier,
        };
        let shipment_request = self.mapper.to_shipment_request(&snapshot)?;

        self.tms.ensure_authenticated().await?;
        let response = self.tms.create_shipment(&shipment_request).await?;
        let external_id = ShipmentMapper::external_load_id(&response);

        self.repository.update_external_id(id, &external_id).await?;
        info!(load_id = %id, external_id = %external_id, "Load reconciled with external TMS");
        log_load_operation(
            "retry_remote_sync",
            Some(&id.to_string()),
            Some(&load.freight_load_id),
            "synced",
            Some(&external_id),
        );

        let refreshed = self.repository.find_by_id(id).await?;
        Ok(LoadResponse::from_load(refreshed))
    }
}

fn parse_load_id(id: &str) -> Result<Uuid> {
    Uuid::parse_str(id)
        .map_err(|_| FreightError::validation("Load ID must be a valid UUID"))
}

fn validate_create(request: &CreateLoadRequest) -> Result<()> {
    if request.freight_load_id.is_empty() {
        return Err(FreightError::validation("freight load ID is required"));
    }
    if request.customer.is_null() {
        return Err(FreightError::validation("customer information is required"));
    }
    if request.pickup.is_null() {
        return Err(FreightError::validation("pickup information is required"));
    }
    if request.consignee.is_null() {
        return Err(FreightError::validation(
            "consignee information is required",
        ));
    }

    let counts = [
        ("inPalletCount", i64::from(request.in_pallet_count)),
        ("outPalletCount", i64::from(request.out_pallet_count)),
        ("numCommodities", i64::from(request.num_commodities)),
    ];
    for (name, value) in counts {
        if value < 0 {
            return Err(FreightError::validation(format!(
                "{name} must be non-negative"
            )));
        }
    }
    let weights = [
        ("totalWeight", request.total_weight),
        ("billableWeight", request.billable_weight),
        ("routeMiles", request.route_miles),
    ];
    for (name, value) in weights {
        if value < 0.0 {
            return Err(FreightError::validation(format!(
                "{name} must be non-negative"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> CreateLoadRequest {
        CreateLoadRequest {
            freight_load_id: "FL-100".to_string(),
            customer: json!({"name": "Acme"}),
            pickup: json!({"city": "Chicago"}),
            consignee: json!({"city": "Detroit"}),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        assert!(validate_create(&valid_request()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_freight_load_id() {
        let mut request = valid_request();
        request.freight_load_id = String::new();
        let err = validate_create(&request).unwrap_err();
        assert!(matches!(err, FreightError::Validation { .. }));
    }

    #[test]
    fn test_validate_rejects_missing_parties() {
        for field in ["customer", "pickup", "consignee"] {
            let mut request = valid_request();
            match field {
                "customer" => request.customer = serde_json::Value::Null,
                "pickup" => request.pickup = serde_json::Value::Null,
                _ => request.consignee = serde_json::Value::Null,
            }
            let err = validate_create(&request).unwrap_err();
            assert!(matches!(err, FreightError::Validation { .. }), "{field}");
        }
    }

    #[test]
    fn test_validate_rejects_negative_numerics() {
        let mut request = valid_request();
        request.total_weight = -1.0;
        assert!(validate_create(&request).is_err());

        let mut request = valid_request();
        request.in_pallet_count = -4;
        assert!(validate_create(&request).is_err());
    }

    #[test]
    fn test_parse_load_id_rejects_garbage() {
        let err = parse_load_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, FreightError::Validation { .. }));
        assert!(parse_load_id("7f8e2f18-33cd-4f26-9d74-07e53d2f43a0").is_ok());
    }
}
