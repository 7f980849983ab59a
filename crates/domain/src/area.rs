//! Area: a room or zone of the controller that may contain thermostats.

use serde::{Deserialize, Serialize};

use crate::error::{ThermoError, ValidationError};

/// A named area as published by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub name: String,
}

impl Area {
    /// Create an area, validating that the name is not blank.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Validation`] when `name` is empty or whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, ThermoError> {
        let area = Self { name: name.into() };
        area.validate()?;
        Ok(area)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Validation`] when `name` is empty or whitespace.
    pub fn validate(&self) -> Result<(), ThermoError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        Ok(())
    }
}

impl std::fmt::Display for Area {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
