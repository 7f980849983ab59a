//! Setpoint changes: partial updates of the heat and cool targets.

use serde::{Deserialize, Serialize};

use crate::error::{ThermoError, ValidationError};

/// A request to move the heat and/or cool setpoint.
///
/// `None` leaves that side untouched on the thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SetpointChange {
    pub heat: Option<f64>,
    pub cool: Option<f64>,
}

impl SetpointChange {
    #[must_use]
    pub fn heat(value: f64) -> Self {
        Self {
            heat: Some(value),
            cool: None,
        }
    }

    #[must_use]
    pub fn cool(value: f64) -> Self {
        Self {
            heat: None,
            cool: Some(value),
        }
    }

    #[must_use]
    pub fn both(heat: f64, cool: f64) -> Self {
        Self {
            heat: Some(heat),
            cool: Some(cool),
        }
    }

    /// Whether neither side is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heat.is_none() && self.cool.is_none()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Validation`] when both sides are unset or a set
    /// value is not finite.
    pub fn validate(&self) -> Result<(), ThermoError> {
        if self.is_empty() {
            return Err(ValidationError::EmptySetpointChange.into());
        }
        for value in [self.heat, self.cool].into_iter().flatten() {
            if !value.is_finite() {
                return Err(ValidationError::NonFiniteSetpoint(value).into());
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for SetpointChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.heat, self.cool) {
            (Some(heat), Some(cool)) => write!(f, "heat={heat}, cool={cool}"),
            (Some(heat), None) => write!(f, "heat={heat}"),
            (None, Some(cool)) => write!(f, "cool={cool}"),
            (None, None) => f.write_str("no change"),
        }
    }
}
