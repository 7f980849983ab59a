//! Verification reports: what was requested, what was observed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::expectation::Assertion;
use crate::id::RunId;
use crate::plan::PlanStep;
use crate::snapshot::Snapshot;
use crate::thermostat::ThermostatInfo;
use crate::time::{Timestamp, elapsed, now};

/// Checks performed after one plan step settled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// Zero-based position in the plan.
    pub index: usize,
    pub step: PlanStep,
    pub assertions: Vec<Assertion>,
    pub checked_at: Timestamp,
}

impl StepReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.assertions.iter().all(|a| a.passed)
    }

    /// First assertion that did not hold, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&Assertion> {
        self.assertions.iter().find(|a| !a.passed)
    }
}

/// Full record of one sequencer run against one thermostat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub run_id: RunId,
    pub thermostat: ThermostatInfo,
    pub snapshot: Snapshot,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub steps: Vec<StepReport>,
    /// Read-back of the restored snapshot.
    pub restoration: Vec<Assertion>,
}

impl VerificationReport {
    /// Start a report for a run that has just captured `snapshot`.
    #[must_use]
    pub fn start(run_id: RunId, thermostat: ThermostatInfo, snapshot: Snapshot) -> Self {
        Self {
            run_id,
            thermostat,
            snapshot,
            started_at: now(),
            finished_at: None,
            steps: Vec::new(),
            restoration: Vec::new(),
        }
    }

    pub fn finish(&mut self, at: Timestamp) {
        self.finished_at = Some(at);
    }

    /// Time from start to finish, `None` while the run is in progress.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at.map(|end| elapsed(self.started_at, end))
    }

    /// Total number of assertions, steps and restoration combined.
    #[must_use]
    pub fn assertion_count(&self) -> usize {
        self.steps.iter().map(|s| s.assertions.len()).sum::<usize>() + self.restoration.len()
    }

    /// Every failed assertion with the step index it belongs to.
    ///
    /// Restoration failures carry `None`.
    #[must_use]
    pub fn failures(&self) -> Vec<(Option<usize>, &Assertion)> {
        let steps = self.steps.iter().flat_map(|s| {
            s.assertions
                .iter()
                .filter(|a| !a.passed)
                .map(move |a| (Some(s.index), a))
        });
        let restoration = self
            .restoration
            .iter()
            .filter(|a| !a.passed)
            .map(|a| (None, a));
        steps.chain(restoration).collect()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.steps.iter().all(StepReport::passed) && self.restoration.iter().all(|a| a.passed)
    }
}
