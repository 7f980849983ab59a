//! Thermostat: the controllable HVAC device under verification.
//!
//! The domain only describes what a thermostat *reports*; reading and
//! writing live behind the `Thermostat` port in the app crate.

mod mode;
mod setpoint;

pub use mode::{FanMode, ThermostatMode};
pub use setpoint::SetpointChange;

use serde::{Deserialize, Serialize};

use crate::id::IntegrationId;

/// Identity of a thermostat as published by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThermostatInfo {
    pub id: IntegrationId,
    pub name: String,
}

impl ThermostatInfo {
    #[must_use]
    pub fn new(id: IntegrationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ThermostatInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.name, self.id)
    }
}

/// Everything a thermostat reports at one point in time.
///
/// Fields are `None` until the controller has reported them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThermostatReading {
    pub temperature: Option<f64>,
    pub mode: Option<ThermostatMode>,
    pub fan_mode: Option<FanMode>,
    pub heat_setpoint: Option<f64>,
    pub cool_setpoint: Option<f64>,
}
