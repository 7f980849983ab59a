//! # thermocheck-adapter-virtual
//!
//! Virtual controller that publishes simulated thermostats, for
//! demonstration and for exercising the verification flow without hardware.
//!
//! ## Behaviour
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | `connect` | Validates the settings and records the host |
//! | `load_database` | Builds areas and thermostats from the cache file if present, else from [`VirtualConfig`] |
//! | setters | Apply immediately, unless a [`VirtualFaults`] entry says otherwise |
//!
//! ## Dependency rule
//!
//! Depends on `thermocheck-app` (port traits) and `thermocheck-domain` only.

mod config;
mod error;
mod thermostat;

pub use config::{VirtualAreaConfig, VirtualConfig, VirtualFaults, VirtualThermostatConfig};
pub use error::VirtualError;
pub use thermostat::VirtualThermostat;

use std::collections::HashSet;
use std::path::Path;

use thermocheck_app::ports::{AreaThermostats, Controller, Thermostat};
use thermocheck_domain::area::Area;
use thermocheck_domain::connection::ConnectionSettings;
use thermocheck_domain::error::{NotFoundError, ThermoError};
use thermocheck_domain::id::IntegrationId;

/// Simulated controller backed by a [`VirtualConfig`] database.
pub struct VirtualController {
    config: VirtualConfig,
    connected_host: Option<String>,
    areas: Vec<AreaThermostats<VirtualThermostat>>,
}

impl VirtualController {
    #[must_use]
    pub fn new(config: VirtualConfig) -> Self {
        Self {
            config,
            connected_host: None,
            areas: Vec::new(),
        }
    }

    /// Host recorded by the last successful `connect`.
    #[must_use]
    pub fn connected_host(&self) -> Option<&str> {
        self.connected_host.as_deref()
    }

    /// Look up a loaded thermostat by its integration id.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::NotFound`] when no loaded thermostat has `id`.
    pub fn thermostat(&self, id: IntegrationId) -> Result<&VirtualThermostat, ThermoError> {
        self.areas
            .iter()
            .flat_map(|entry| &entry.thermostats)
            .find(|t| t.info().id == id)
            .ok_or_else(|| {
                NotFoundError {
                    entity: "Thermostat",
                    id: id.to_string(),
                }
                .into()
            })
    }
}

fn build_areas(
    database: &VirtualConfig,
) -> Result<Vec<AreaThermostats<VirtualThermostat>>, VirtualError> {
    let mut seen = HashSet::new();
    let mut areas = Vec::with_capacity(database.areas.len());

    for area_config in &database.areas {
        let area = Area::new(area_config.name.clone()).map_err(VirtualError::Domain)?;
        let mut thermostats = Vec::with_capacity(area_config.thermostats.len());
        for thermostat_config in &area_config.thermostats {
            let id = IntegrationId::new(thermostat_config.id);
            if !seen.insert(id) {
                return Err(VirtualError::DuplicateIntegrationId(id));
            }
            thermostats.push(VirtualThermostat::from_config(thermostat_config));
        }
        areas.push(AreaThermostats { area, thermostats });
    }

    Ok(areas)
}

impl Default for VirtualController {
    fn default() -> Self {
        Self::new(VirtualConfig::default())
    }
}

impl Controller for VirtualController {
    type Thermostat = VirtualThermostat;

    fn name(&self) -> &'static str {
        "virtual"
    }

    async fn connect(&mut self, settings: &ConnectionSettings) -> Result<(), ThermoError> {
        settings.validate()?;
        tracing::info!(
            host = %settings.host,
            user = %settings.user,
            "virtual controller connected"
        );
        self.connected_host = Some(settings.host.clone());
        Ok(())
    }

    async fn load_database(&mut self, cache_path: &Path) -> Result<(), ThermoError> {
        if self.connected_host.is_none() {
            return Err(VirtualError::NotConnected.into());
        }
        self.areas = match VirtualConfig::from_cache(cache_path)? {
            Some(cached) => {
                tracing::info!(path = %cache_path.display(), "loading cached database");
                build_areas(&cached)?
            }
            None => {
                tracing::debug!(path = %cache_path.display(), "no cached database");
                build_areas(&self.config)?
            }
        };
        tracing::info!(
            areas = self.areas.len(),
            thermostats = self.areas.iter().map(|a| a.thermostats.len()).sum::<usize>(),
            "virtual database loaded"
        );
        Ok(())
    }

    fn areas(&self) -> &[AreaThermostats<VirtualThermostat>] {
        &self.areas
    }

    async fn disconnect(&mut self) -> Result<(), ThermoError> {
        self.connected_host = None;
        self.areas.clear();
        tracing::info!("virtual controller disconnected");
        Ok(())
    }
}
