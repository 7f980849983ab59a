//! Verification sequencer: drives one thermostat through a test plan.
//!
//! For each step the sequencer applies the change, waits the configured
//! settle delay, reads back the fields the step's expectations name, and
//! records the resulting assertions. The snapshot captured before the first
//! step is written back afterwards whether the plan succeeded or not.

use std::time::Duration;

use serde::Deserialize;
use thermocheck_domain::error::{ThermoError, VerificationFailure, display_chain};
use thermocheck_domain::expectation::{Assertion, Expectation, StateField, Tolerance};
use thermocheck_domain::id::RunId;
use thermocheck_domain::plan::{PlanStep, TestPlan};
use thermocheck_domain::report::{StepReport, VerificationReport};
use thermocheck_domain::snapshot::Snapshot;
use thermocheck_domain::time::now;

use crate::ports::{Settle, Thermostat};

const SNAPSHOT_FIELDS: [StateField; 4] = [
    StateField::Mode,
    StateField::FanMode,
    StateField::HeatSetpoint,
    StateField::CoolSetpoint,
];

/// What to do once a step's read-back does not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failed assertion and run the remaining steps.
    #[default]
    Continue,
    /// Stop at the first failed assertion and return
    /// [`ThermoError::VerificationFailed`] after restoring.
    Abort,
}

/// Tunables of a [`VerificationSequencer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerSettings {
    /// Pause between applying a change and reading it back.
    pub settle_delay: Duration,
    pub tolerance: Tolerance,
    pub policy: FailurePolicy,
}

impl Default for SequencerSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(1),
            tolerance: Tolerance::DEFAULT,
            policy: FailurePolicy::default(),
        }
    }
}

/// Application service running test plans against thermostats.
pub struct VerificationSequencer<S> {
    settle: S,
    settings: SequencerSettings,
}

impl<S: Settle> VerificationSequencer<S> {
    /// Create a new sequencer waiting through `settle` between steps.
    pub fn new(settle: S, settings: SequencerSettings) -> Self {
        Self { settle, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &SequencerSettings {
        &self.settings
    }

    /// Run `plan` against `thermostat`, then restore its prior state.
    ///
    /// Restoration runs once the snapshot has been captured, whatever the
    /// plan's outcome. With [`FailurePolicy::Continue`] mismatches are only
    /// recorded in the returned report.
    ///
    /// # Errors
    ///
    /// - [`ThermoError::Validation`] if the plan is invalid (nothing is touched).
    /// - [`ThermoError::Communication`] if a read or write fails.
    /// - [`ThermoError::VerificationFailed`] on the first mismatch under
    ///   [`FailurePolicy::Abort`]. The failure carries the partial report,
    ///   including the restoration read-back.
    ///
    /// A restoration error takes precedence over an earlier plan error.
    pub async fn run<T: Thermostat>(
        &self,
        thermostat: &T,
        plan: &TestPlan,
    ) -> Result<VerificationReport, ThermoError> {
        plan.validate()?;

        let info = thermostat.info().clone();
        let run_id = RunId::new();
        let snapshot = Snapshot::from(thermostat.read_fields(&SNAPSHOT_FIELDS).await?);

        tracing::info!(
            %run_id,
            thermostat = %info,
            steps = plan.len(),
            "verification started"
        );

        let mut report = VerificationReport::start(run_id, info, snapshot);
        let outcome = self.execute(thermostat, plan, &mut report).await;
        let restored = self.restore(thermostat, &snapshot, &mut report).await;
        report.finish(now());

        match (outcome, restored) {
            (outcome, Err(err)) => {
                match outcome {
                    Err(plan_err) => tracing::warn!(
                        %run_id,
                        error = %display_chain(&plan_err),
                        "plan error superseded by restoration failure"
                    ),
                    Ok(Some((step, assertion))) => tracing::warn!(
                        %run_id,
                        step,
                        %assertion,
                        "aborted run superseded by restoration failure"
                    ),
                    Ok(None) => {}
                }
                tracing::error!(%run_id, error = %display_chain(&err), "restoration failed");
                Err(err)
            }
            (Err(err), Ok(())) => {
                tracing::warn!(
                    %run_id,
                    error = %display_chain(&err),
                    "verification stopped early"
                );
                Err(err)
            }
            (Ok(Some((step, assertion))), Ok(())) => {
                tracing::warn!(%run_id, step, %assertion, "verification aborted");
                Err(VerificationFailure {
                    step,
                    assertion,
                    report: Box::new(report),
                }
                .into())
            }
            (Ok(None), Ok(())) => {
                tracing::info!(
                    %run_id,
                    success = report.is_success(),
                    assertions = report.assertion_count(),
                    duration_ms = report.duration().map_or(0, |d| d.as_millis()),
                    "verification finished"
                );
                Ok(report)
            }
        }
    }

    /// Run the plan's steps, returning the first mismatch when the policy
    /// says to abort on it.
    async fn execute<T: Thermostat>(
        &self,
        thermostat: &T,
        plan: &TestPlan,
        report: &mut VerificationReport,
    ) -> Result<Option<(usize, Assertion)>, ThermoError> {
        let run_id = report.run_id;

        for (index, step) in plan.steps().iter().enumerate() {
            tracing::debug!(%run_id, step = index, action = %step, "applying step");
            apply(thermostat, step).await?;

            let assertions = self.settle_and_check(thermostat, &step.expectations()).await?;
            let step_report = StepReport {
                index,
                step: *step,
                assertions,
                checked_at: now(),
            };
            let failure = step_report.first_failure().copied();
            report.steps.push(step_report);

            if let Some(assertion) = failure {
                tracing::warn!(%run_id, step = index, %assertion, "read-back mismatch");
                if self.settings.policy == FailurePolicy::Abort {
                    return Ok(Some((index, assertion)));
                }
            }
        }

        Ok(None)
    }

    async fn restore<T: Thermostat>(
        &self,
        thermostat: &T,
        snapshot: &Snapshot,
        report: &mut VerificationReport,
    ) -> Result<(), ThermoError> {
        tracing::debug!(run_id = %report.run_id, ?snapshot, "restoring snapshot");

        if let Some(mode) = snapshot.mode {
            thermostat.set_mode(mode).await?;
        }
        if let Some(fan_mode) = snapshot.fan_mode {
            thermostat.set_fan_mode(fan_mode).await?;
        }
        if let Some(setpoints) = snapshot.setpoint_change() {
            thermostat.set_setpoints(setpoints).await?;
        }

        let expectations = snapshot.expectations();
        if expectations.is_empty() {
            return Ok(());
        }
        report.restoration = self.settle_and_check(thermostat, &expectations).await?;
        if report.restoration.iter().any(|a| !a.passed) {
            tracing::warn!(run_id = %report.run_id, "restored state does not match snapshot");
        }
        Ok(())
    }

    async fn settle_and_check<T: Thermostat>(
        &self,
        thermostat: &T,
        expectations: &[Expectation],
    ) -> Result<Vec<Assertion>, ThermoError> {
        self.settle.settle(self.settings.settle_delay).await;

        let fields: Vec<StateField> = expectations.iter().map(Expectation::field).collect();
        let reading = thermostat.read_fields(&fields).await?;

        Ok(expectations
            .iter()
            .map(|e| e.evaluate(&reading, self.settings.tolerance))
            .collect())
    }
}

async fn apply<T: Thermostat>(thermostat: &T, step: &PlanStep) -> Result<(), ThermoError> {
    match step {
        PlanStep::SetMode { mode } => thermostat.set_mode(*mode).await,
        PlanStep::SetFanMode { fan_mode } => thermostat.set_fan_mode(*fan_mode).await,
        PlanStep::SetSetpoints { setpoints } => thermostat.set_setpoints(*setpoints).await,
    }
}
