//! Virtual controller configuration: the simulated device database.

use std::path::Path;

use serde::Deserialize;
use thermocheck_domain::thermostat::{FanMode, ThermostatMode};

use crate::error::VirtualError;

/// Areas and thermostats the virtual controller publishes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    pub areas: Vec<VirtualAreaConfig>,
}

/// One area of the virtual database.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualAreaConfig {
    pub name: String,
    #[serde(default)]
    pub thermostats: Vec<VirtualThermostatConfig>,
}

/// Initial state of one simulated thermostat.
///
/// Omitted values start out unreported.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualThermostatConfig {
    /// Integration id, unique across the database.
    pub id: u32,
    pub name: String,
    pub temperature: Option<f64>,
    pub mode: Option<ThermostatMode>,
    pub fan_mode: Option<FanMode>,
    pub heat_setpoint: Option<f64>,
    pub cool_setpoint: Option<f64>,
    #[serde(default)]
    pub faults: VirtualFaults,
}

/// Misbehaviour injected into a simulated thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct VirtualFaults {
    /// Every getter fails.
    pub fail_reads: bool,
    /// Every setter fails.
    pub fail_writes: bool,
    /// `set_mode` is accepted but has no effect.
    pub ignore_mode_changes: bool,
    /// Added to reported setpoints. Stored setpoints are unaffected, so a
    /// caller that writes back what it read moves them by the offset.
    pub setpoint_offset: f64,
}

impl VirtualConfig {
    /// Read a cached database written in the same layout.
    ///
    /// Returns `Ok(None)` when nothing is cached at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`VirtualError::CacheRead`] when the file exists but cannot be
    /// read, and [`VirtualError::CacheParse`] when it is malformed.
    pub fn from_cache(path: &Path) -> Result<Option<Self>, VirtualError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .map(Some)
                .map_err(|source| VirtualError::CacheParse {
                    path: path.to_path_buf(),
                    source,
                }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(VirtualError::CacheRead {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl Default for VirtualConfig {
    fn default() -> Self {
        Self {
            areas: vec![VirtualAreaConfig {
                name: "Living Room".to_string(),
                thermostats: vec![VirtualThermostatConfig {
                    id: 1,
                    name: "Main Thermostat".to_string(),
                    temperature: Some(70.5),
                    mode: Some(ThermostatMode::Heat),
                    fan_mode: Some(FanMode::Auto),
                    heat_setpoint: Some(68.0),
                    cool_setpoint: Some(75.0),
                    faults: VirtualFaults::default(),
                }],
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_one_area_with_one_thermostat() {
        let config = VirtualConfig::default();
        assert_eq!(config.areas.len(), 1);
        assert_eq!(config.areas[0].name, "Living Room");
        assert_eq!(config.areas[0].thermostats[0].id, 1);
        assert_eq!(config.areas[0].thermostats[0].faults, VirtualFaults::default());
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            [[areas]]
            name = "Upstairs"

            [[areas.thermostats]]
            id = 42
            name = "Hall"
            temperature = 71.0
            mode = "cool"
            fan_mode = "on"
            heat_setpoint = 66.0
            cool_setpoint = 74.0

            [areas.thermostats.faults]
            ignore_mode_changes = true

            [[areas]]
            name = "Garage"
        "#;
        let config: VirtualConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.areas.len(), 2);
        let hall = &config.areas[0].thermostats[0];
        assert_eq!(hall.id, 42);
        assert_eq!(hall.mode, Some(ThermostatMode::Cool));
        assert_eq!(hall.fan_mode, Some(FanMode::On));
        assert!(hall.faults.ignore_mode_changes);
        assert!(!hall.faults.fail_writes);
        assert!(config.areas[1].thermostats.is_empty());
    }

    #[test]
    fn should_leave_omitted_state_unreported() {
        let toml = r#"
            [[areas]]
            name = "Den"
            [[areas.thermostats]]
            id = 3
            name = "Den"
        "#;
        let config: VirtualConfig = toml::from_str(toml).unwrap();
        let den = &config.areas[0].thermostats[0];
        assert!(den.mode.is_none());
        assert!(den.heat_setpoint.is_none());
    }

    #[test]
    fn should_read_cached_database_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lutron_db.xml");
        std::fs::write(
            &path,
            "[[areas]]\nname = \"Loft\"\n[[areas.thermostats]]\nid = 8\nname = \"Loft\"\n",
        )
        .unwrap();

        let config = VirtualConfig::from_cache(&path).unwrap().unwrap();

        assert_eq!(config.areas[0].name, "Loft");
        assert_eq!(config.areas[0].thermostats[0].id, 8);
    }

    #[test]
    fn should_return_none_when_cache_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cached = VirtualConfig::from_cache(&dir.path().join("missing.xml")).unwrap();
        assert!(cached.is_none());
    }

    #[test]
    fn should_reject_malformed_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lutron_db.xml");
        std::fs::write(&path, "<Project></Project>").unwrap();

        let err = VirtualConfig::from_cache(&path).unwrap_err();

        assert!(matches!(err, VirtualError::CacheParse { .. }));
        assert!(err.to_string().starts_with("invalid cached database"));
    }

    #[test]
    fn should_use_defaults_for_empty_document() {
        let config: VirtualConfig = toml::from_str("").unwrap();
        assert_eq!(config.areas.len(), 1);
    }
}
