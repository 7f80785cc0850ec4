//! # Constants
//!
//! Fixed values shared across the freight core: TMS wire code tables,
//! token lifecycle margins, and pagination bounds.

/// Safety margin subtracted from token expiry: a token expiring within
/// this window is treated as already stale.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 5 * 60;

/// Fixed timeout applied to every outbound TMS call, independent of any
/// caller deadline.
pub const TMS_HTTP_TIMEOUT_SECS: u64 = 30;

/// Flex window attached to every route stop appointment.
pub const STOP_FLEX_SECS: i64 = 3600;

/// Route stop state for newly created shipments.
pub const STOP_STATE_OPEN: &str = "OPEN";

/// Time zone applied to appointment timestamps when none is configured.
pub const DEFAULT_TIME_ZONE: &str = "America/New_York";

/// Pagination bounds for load listing.
pub mod pagination {
    pub const MIN_PAGE: i64 = 1;
    pub const MIN_PAGE_SIZE: i64 = 1;
    pub const MAX_PAGE_SIZE: i64 = 100;
}

/// TMS provider base URLs, selected by the sandbox flag.
pub mod tms_urls {
    pub const SANDBOX_BASE: &str = "https://my-sandbox-publicapi.turvo.com/v1";
    pub const PRODUCTION_BASE: &str = "https://publicapi.turvo.com/v1";
    pub const OAUTH_TOKEN_PATH: &str = "/oauth/token";
    pub const SHIPMENTS_PATH: &str = "/shipments";
}

/// OAuth grant parameters required by the provider's password grant.
pub mod tms_auth {
    pub const GRANT_TYPE: &str = "password";
    pub const SCOPE: &str = "read+trust+write";
    pub const ACCOUNT_TYPE: &str = "business";
}

/// Provider code tables. These key/value pairs are part of the wire
/// contract and must match the TMS exactly.
pub mod tms_codes {
    /// Scheduling type applied to appointment-based stops.
    pub const SCHEDULING_BY_APPOINTMENT: (&str, &str) = ("9401", "By appointment");
    /// Stop type for the origin stop.
    pub const STOP_TYPE_PICKUP: (&str, &str) = ("1500", "Pickup");
    /// Stop type for the destination stop.
    pub const STOP_TYPE_DELIVERY: (&str, &str) = ("1501", "Delivery");
    /// Equipment type for full truckload vans.
    pub const EQUIPMENT_TYPE_VAN: (&str, &str) = ("1200", "Van");
    /// Equipment size key; the value is derived from the carrier's
    /// equipment length as `"<length> ft"`.
    pub const EQUIPMENT_SIZE_KEY: &str = "1308";
    /// Transport mode for full truckload.
    pub const MODE_TL: (&str, &str) = ("24105", "TL");
    /// Service type attached to the mode segment.
    pub const SERVICE_TYPE_ANY: (&str, &str) = ("24304", "Any");
}
