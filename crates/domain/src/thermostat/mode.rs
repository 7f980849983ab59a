//! Operating modes a thermostat can be commanded into.

use serde::{Deserialize, Serialize};

/// HVAC operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermostatMode {
    Off,
    Heat,
    Cool,
    Auto,
    EmergencyHeat,
}

impl ThermostatMode {
    /// Upper-case name as shown on controller keypads.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
            Self::Auto => "AUTO",
            Self::EmergencyHeat => "EM_HEAT",
        }
    }
}

impl std::fmt::Display for ThermostatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fan operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FanMode {
    Auto,
    On,
}

impl FanMode {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::On => "ON",
        }
    }
}

impl std::fmt::Display for FanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_upper_case_mode_name() {
        assert_eq!(ThermostatMode::Heat.to_string(), "HEAT");
        assert_eq!(ThermostatMode::EmergencyHeat.to_string(), "EM_HEAT");
        assert_eq!(FanMode::On.to_string(), "ON");
    }

    #[test]
    fn should_roundtrip_mode_through_serde_json() {
        let json = serde_json::to_string(&ThermostatMode::EmergencyHeat).unwrap();
        assert_eq!(json, "\"emergency_heat\"");
        let parsed: ThermostatMode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ThermostatMode::EmergencyHeat);
    }

    #[test]
    fn should_deserialize_lowercase_fan_mode() {
        let parsed: FanMode = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(parsed, FanMode::Auto);
    }
}
