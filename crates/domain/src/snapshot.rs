//! Snapshot: thermostat state captured before a verification run.
//!
//! Captured at run start, applied at run end regardless of outcome, then
//! discarded.

use serde::{Deserialize, Serialize};

use crate::expectation::Expectation;
use crate::thermostat::{FanMode, SetpointChange, ThermostatMode, ThermostatReading};

/// Restorable subset of a thermostat's state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub mode: Option<ThermostatMode>,
    pub fan_mode: Option<FanMode>,
    pub heat_setpoint: Option<f64>,
    pub cool_setpoint: Option<f64>,
}

impl Snapshot {
    /// Setpoints to write back, or `None` when neither was known.
    #[must_use]
    pub fn setpoint_change(&self) -> Option<SetpointChange> {
        let change = SetpointChange {
            heat: self.heat_setpoint,
            cool: self.cool_setpoint,
        };
        (!change.is_empty()).then_some(change)
    }

    /// Post-conditions that hold once the snapshot has been restored.
    ///
    /// Unknown fields are not restored and therefore not expected.
    #[must_use]
    pub fn expectations(&self) -> Vec<Expectation> {
        let mut out = Vec::with_capacity(4);
        if let Some(mode) = self.mode {
            out.push(Expectation::Mode(mode));
        }
        if let Some(fan) = self.fan_mode {
            out.push(Expectation::FanMode(fan));
        }
        if let Some(heat) = self.heat_setpoint {
            out.push(Expectation::HeatSetpoint(heat));
        }
        if let Some(cool) = self.cool_setpoint {
            out.push(Expectation::CoolSetpoint(cool));
        }
        out
    }
}

impl From<ThermostatReading> for Snapshot {
    fn from(reading: ThermostatReading) -> Self {
        Self {
            mode: reading.mode,
            fan_mode: reading.fan_mode,
            heat_setpoint: reading.heat_setpoint,
            cool_setpoint: reading.cool_setpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_drop_temperature_when_built_from_reading() {
        let reading = ThermostatReading {
            temperature: Some(69.5),
            mode: Some(ThermostatMode::Cool),
            fan_mode: Some(FanMode::Auto),
            heat_setpoint: Some(68.0),
            cool_setpoint: Some(75.0),
        };
        let snapshot = Snapshot::from(reading);
        assert_eq!(snapshot.mode, Some(ThermostatMode::Cool));
        assert_eq!(snapshot.cool_setpoint, Some(75.0));
    }

    #[test]
    fn should_skip_setpoint_change_when_both_unknown() {
        let snapshot = Snapshot {
            mode: Some(ThermostatMode::Off),
            ..Snapshot::default()
        };
        assert!(snapshot.setpoint_change().is_none());
    }

    #[test]
    fn should_keep_unknown_side_untouched_in_setpoint_change() {
        let snapshot = Snapshot {
            heat_setpoint: Some(68.0),
            ..Snapshot::default()
        };
        assert_eq!(snapshot.setpoint_change(), Some(SetpointChange::heat(68.0)));
    }

    #[test]
    fn should_expect_only_known_fields() {
        let snapshot = Snapshot {
            mode: Some(ThermostatMode::Heat),
            fan_mode: None,
            heat_setpoint: Some(68.0),
            cool_setpoint: None,
        };
        assert_eq!(
            snapshot.expectations(),
            vec![
                Expectation::Mode(ThermostatMode::Heat),
                Expectation::HeatSetpoint(68.0),
            ]
        );
    }
}
