//! # thermocheck-domain
//!
//! Pure domain model for thermostat verification.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Thermostats** (identity, modes, fan modes, setpoints, readings)
//! - Define **Areas** (rooms or zones published by the controller)
//! - Define **Snapshots** (state captured before a run, restored after it)
//! - Define **Test plans** (ordered state changes) and their **Expectations**
//! - Define **Reports** (assertions recorded per step and after restoration)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod area;
pub mod connection;
pub mod expectation;
pub mod plan;
pub mod report;
pub mod snapshot;
pub mod thermostat;
