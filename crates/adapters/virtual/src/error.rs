//! Virtual adapter error types.

use std::path::PathBuf;

use thermocheck_domain::error::ThermoError;
use thermocheck_domain::id::IntegrationId;

/// Errors specific to the virtual controller.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// `load_database` was called before `connect`.
    #[error("virtual controller not connected")]
    NotConnected,

    /// Injected read fault.
    #[error("simulated read failure on thermostat {0}")]
    ReadFailed(IntegrationId),

    /// Injected write fault.
    #[error("simulated write failure on thermostat {0}")]
    WriteFailed(IntegrationId),

    /// The cached database exists but could not be read.
    #[error("failed to read cached database {}", path.display())]
    CacheRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cached database is not a valid virtual database.
    #[error("invalid cached database {}", path.display())]
    CacheParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Two configured thermostats share an integration id.
    #[error("duplicate integration id {0} in virtual database")]
    DuplicateIntegrationId(IntegrationId),

    /// A domain-level error (validation, not-found, etc.).
    #[error("domain error")]
    Domain(#[source] ThermoError),
}

impl VirtualError {
    /// Convert into a [`ThermoError::Communication`] for propagation across
    /// port boundaries.
    #[must_use]
    pub fn into_domain(self) -> ThermoError {
        match self {
            Self::Domain(err) => err,
            other => ThermoError::Communication(Box::new(other)),
        }
    }
}

impl From<VirtualError> for ThermoError {
    fn from(err: VirtualError) -> Self {
        err.into_domain()
    }
}
