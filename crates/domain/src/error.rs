//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`ThermoError`]
//! via `#[from]` (domain errors) or an `into_domain` helper (adapter errors).

use crate::expectation::Assertion;
use crate::report::VerificationReport;

/// Top-level error returned by domain operations and port implementations.
#[derive(Debug, thiserror::Error)]
pub enum ThermoError {
    /// A domain invariant was violated.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// A looked-up item does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// Reading from or writing to the controller failed.
    #[error("communication error")]
    Communication(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Observed thermostat state did not match the requested state.
    #[error("verification failed")]
    VerificationFailed(#[from] VerificationFailure),
}

/// Invariant violations detected while building domain values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("setpoint change must set at least one of heat or cool")]
    EmptySetpointChange,

    #[error("setpoint must be a finite number, got {0}")]
    NonFiniteSetpoint(f64),

    #[error("tolerance must be finite and strictly positive, got {0}")]
    InvalidTolerance(f64),

    #[error("name must not be empty")]
    EmptyName,

    #[error("controller host must not be empty")]
    EmptyHost,

    #[error("controller user must not be empty")]
    EmptyUser,
}

/// Something looked up by identifier was not there.
#[derive(Debug, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// The first failed assertion of an aborted run.
#[derive(Debug, Clone, thiserror::Error)]
#[error("step {step}: {assertion}")]
pub struct VerificationFailure {
    /// Zero-based index of the plan step that failed.
    pub step: usize,
    pub assertion: Assertion,
    /// Steps checked up to the failure, plus the restoration read-back.
    pub report: Box<VerificationReport>,
}

/// Render an error and its whole `source()` chain as `outer: inner: root`.
#[must_use]
pub fn display_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
