//! # thermocheck-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Thermostat`: read and write one thermostat's state
//!   - `Controller`: connect, load the device database, list areas
//!   - `Settle`: wait for a device to reflect a commanded change
//! - Define **driving/inbound ports** as use-case structs:
//!   - `VerificationSequencer`: drive one thermostat through a test plan
//!   - `ThermostatSurvey`: verify every thermostat a controller exposes
//! - Orchestrate domain objects without knowing *how* devices are reached
//!
//! ## Dependency rule
//! Depends on `thermocheck-domain` only (plus `tokio::time` for the settle wait).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
