//! Expectations: post-conditions checked against a thermostat after a change.
//!
//! Enumerated fields must match exactly. Setpoints match when the absolute
//! difference is strictly below the configured [`Tolerance`].

use serde::{Deserialize, Serialize};

use crate::error::{ThermoError, ValidationError};
use crate::thermostat::{FanMode, ThermostatMode, ThermostatReading};

/// Absolute tolerance, in degrees, for setpoint comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    pub const DEFAULT: Self = Self(0.1);

    /// Build a tolerance, rejecting zero, negative and non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Validation`] when `value` is not finite or `<= 0`.
    pub fn new(value: f64) -> Result<Self, ThermoError> {
        Ok(Self::try_from(value)?)
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// `|observed - expected| < tolerance`
    #[must_use]
    pub fn matches(self, expected: f64, observed: f64) -> bool {
        (observed - expected).abs() < self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = ValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value.is_finite() && value > 0.0 {
            Ok(Self(value))
        } else {
            Err(ValidationError::InvalidTolerance(value))
        }
    }
}

impl From<Tolerance> for f64 {
    fn from(value: Tolerance) -> Self {
        value.0
    }
}

/// A single observable field of a thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    Mode,
    FanMode,
    HeatSetpoint,
    CoolSetpoint,
}

impl std::fmt::Display for StateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mode => f.write_str("mode"),
            Self::FanMode => f.write_str("fan mode"),
            Self::HeatSetpoint => f.write_str("heat setpoint"),
            Self::CoolSetpoint => f.write_str("cool setpoint"),
        }
    }
}

/// The value a field is expected to hold after settling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum Expectation {
    Mode(ThermostatMode),
    FanMode(FanMode),
    HeatSetpoint(f64),
    CoolSetpoint(f64),
}

impl Expectation {
    #[must_use]
    pub fn field(&self) -> StateField {
        match self {
            Self::Mode(_) => StateField::Mode,
            Self::FanMode(_) => StateField::FanMode,
            Self::HeatSetpoint(_) => StateField::HeatSetpoint,
            Self::CoolSetpoint(_) => StateField::CoolSetpoint,
        }
    }

    /// Extract the value this expectation looks at from a reading.
    #[must_use]
    pub fn observe(&self, reading: &ThermostatReading) -> Observed {
        match self {
            Self::Mode(_) => Observed::Mode(reading.mode),
            Self::FanMode(_) => Observed::FanMode(reading.fan_mode),
            Self::HeatSetpoint(_) => Observed::Setpoint(reading.heat_setpoint),
            Self::CoolSetpoint(_) => Observed::Setpoint(reading.cool_setpoint),
        }
    }

    /// Compare against a reading. An unreported field never matches.
    #[must_use]
    pub fn evaluate(&self, reading: &ThermostatReading, tolerance: Tolerance) -> Assertion {
        let observed = self.observe(reading);
        let passed = match (self, observed) {
            (Self::Mode(expected), Observed::Mode(Some(actual))) => *expected == actual,
            (Self::FanMode(expected), Observed::FanMode(Some(actual))) => *expected == actual,
            (
                Self::HeatSetpoint(expected) | Self::CoolSetpoint(expected),
                Observed::Setpoint(Some(actual)),
            ) => tolerance.matches(*expected, actual),
            _ => false,
        };
        Assertion {
            expected: *self,
            observed,
            passed,
        }
    }
}

impl std::fmt::Display for Expectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mode(mode) => write!(f, "{mode}"),
            Self::FanMode(mode) => write!(f, "{mode}"),
            Self::HeatSetpoint(value) | Self::CoolSetpoint(value) => write!(f, "{value}"),
        }
    }
}

/// What the thermostat actually reported for a field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Observed {
    Mode(Option<ThermostatMode>),
    FanMode(Option<FanMode>),
    Setpoint(Option<f64>),
}

impl std::fmt::Display for Observed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mode(Some(mode)) => write!(f, "{mode}"),
            Self::FanMode(Some(mode)) => write!(f, "{mode}"),
            Self::Setpoint(Some(value)) => write!(f, "{value}"),
            Self::Mode(None) | Self::FanMode(None) | Self::Setpoint(None) => {
                f.write_str("nothing")
            }
        }
    }
}

/// Outcome of checking one [`Expectation`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assertion {
    pub expected: Expectation,
    pub observed: Observed,
    pub passed: bool,
}

impl std::fmt::Display for Assertion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} expected {}, got {}",
            self.expected.field(),
            self.expected,
            self.observed
        )
    }
}
