//! # TMS Integration
//!
//! Everything that talks to the external Transportation Management System:
//! session/token lifecycle ([`token`]), the wire schema ([`wire`]), the
//! load-to-shipment adapter ([`mapper`]), and the HTTP transport
//! ([`client`]).

pub mod client;
pub mod mapper;
pub mod token;
pub mod wire;

pub use client::{TmsClient, TmsService};
pub use mapper::{LoadSnapshot, MappingStrategy, ShipmentMapper};
pub use token::TokenManager;
