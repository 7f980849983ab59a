//! Controller port: lifecycle of the lighting/HVAC controller connection.
//!
//! A controller bridges an external system (a real processor, a simulator,
//! …) into thermocheck. The survey calls the lifecycle methods in order:
//!
//! 1. [`connect`](Controller::connect): reach the controller and log in
//! 2. [`load_database`](Controller::load_database): fetch the device layout,
//!    or read it from the local cache file
//! 3. [`areas`](Controller::areas): walk areas and their thermostats
//! 4. [`disconnect`](Controller::disconnect): release the connection

use std::future::Future;
use std::path::Path;

use thermocheck_domain::area::Area;
use thermocheck_domain::connection::ConnectionSettings;
use thermocheck_domain::error::ThermoError;

use super::thermostat::Thermostat;

/// An area and the thermostats it contains.
#[derive(Debug, Clone)]
pub struct AreaThermostats<T> {
    pub area: Area,
    pub thermostats: Vec<T>,
}

/// A pluggable controller integration.
pub trait Controller: Send + Sync {
    type Thermostat: Thermostat;

    /// Short name identifying the backend (e.g. `"virtual"`).
    fn name(&self) -> &'static str;

    /// Open the connection and authenticate.
    fn connect(
        &mut self,
        settings: &ConnectionSettings,
    ) -> impl Future<Output = Result<(), ThermoError>> + Send;

    /// Load the controller's configuration database (areas and devices).
    ///
    /// `cache_path` names a local copy of the database. Implementations read
    /// it when present and fall back to their own source otherwise.
    fn load_database(
        &mut self,
        cache_path: &Path,
    ) -> impl Future<Output = Result<(), ThermoError>> + Send;

    /// Areas known from the loaded database, including those without
    /// thermostats. Empty until [`load_database`](Self::load_database) ran.
    fn areas(&self) -> &[AreaThermostats<Self::Thermostat>];

    /// Close the connection. The default implementation is a no-op.
    fn disconnect(&mut self) -> impl Future<Output = Result<(), ThermoError>> + Send {
        async { Ok(()) }
    }
}
