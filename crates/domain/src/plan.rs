//! Test plan: the ordered state changes a thermostat is driven through.

use serde::{Deserialize, Serialize};

use crate::error::ThermoError;
use crate::expectation::Expectation;
use crate::thermostat::{FanMode, SetpointChange, ThermostatMode};

/// Heat setpoint used by the standard plan when the current one is unknown.
pub const FALLBACK_HEAT_SETPOINT: f64 = 72.0;
/// Cool setpoint used by the standard plan when the current one is unknown.
pub const FALLBACK_COOL_SETPOINT: f64 = 76.0;
/// How far the standard plan nudges a known setpoint.
pub const SETPOINT_NUDGE: f64 = 2.0;

/// One state change and, implicitly, its expected post-condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanStep {
    SetMode { mode: ThermostatMode },
    SetFanMode { fan_mode: FanMode },
    SetSetpoints { setpoints: SetpointChange },
}

impl PlanStep {
    /// What must be observed once the change has settled.
    #[must_use]
    pub fn expectations(&self) -> Vec<Expectation> {
        match self {
            Self::SetMode { mode } => vec![Expectation::Mode(*mode)],
            Self::SetFanMode { fan_mode } => vec![Expectation::FanMode(*fan_mode)],
            Self::SetSetpoints { setpoints } => {
                let mut out = Vec::with_capacity(2);
                if let Some(heat) = setpoints.heat {
                    out.push(Expectation::HeatSetpoint(heat));
                }
                if let Some(cool) = setpoints.cool {
                    out.push(Expectation::CoolSetpoint(cool));
                }
                out
            }
        }
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Validation`] for an invalid setpoint change.
    pub fn validate(&self) -> Result<(), ThermoError> {
        match self {
            Self::SetSetpoints { setpoints } => setpoints.validate(),
            Self::SetMode { .. } | Self::SetFanMode { .. } => Ok(()),
        }
    }
}

impl std::fmt::Display for PlanStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetMode { mode } => write!(f, "set mode {mode}"),
            Self::SetFanMode { fan_mode } => write!(f, "set fan mode {fan_mode}"),
            Self::SetSetpoints { setpoints } => write!(f, "set setpoints {setpoints}"),
        }
    }
}

/// Ordered sequence of [`PlanStep`]s.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TestPlan {
    steps: Vec<PlanStep>,
}

impl TestPlan {
    #[must_use]
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self { steps }
    }

    /// The heat / cool / fan / auto sweep run against every thermostat.
    ///
    /// Known setpoints are nudged by [`SETPOINT_NUDGE`] (heat up, cool down);
    /// unknown ones fall back to fixed values.
    #[must_use]
    pub fn standard(current_heat: Option<f64>, current_cool: Option<f64>) -> Self {
        let heat = current_heat.map_or(FALLBACK_HEAT_SETPOINT, |h| h + SETPOINT_NUDGE);
        let cool = current_cool.map_or(FALLBACK_COOL_SETPOINT, |c| c - SETPOINT_NUDGE);

        Self::new(vec![
            PlanStep::SetMode {
                mode: ThermostatMode::Heat,
            },
            PlanStep::SetSetpoints {
                setpoints: SetpointChange::heat(heat),
            },
            PlanStep::SetMode {
                mode: ThermostatMode::Cool,
            },
            PlanStep::SetSetpoints {
                setpoints: SetpointChange::cool(cool),
            },
            PlanStep::SetFanMode {
                fan_mode: FanMode::On,
            },
            PlanStep::SetMode {
                mode: ThermostatMode::Auto,
            },
            PlanStep::SetSetpoints {
                setpoints: SetpointChange::both(70.0, 76.0),
            },
        ])
    }

    #[must_use]
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Validate every step.
    ///
    /// # Errors
    ///
    /// Returns the first step's validation error.
    pub fn validate(&self) -> Result<(), ThermoError> {
        self.steps.iter().try_for_each(PlanStep::validate)
    }
}

impl FromIterator<PlanStep> for TestPlan {
    fn from_iter<I: IntoIterator<Item = PlanStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
