//! Survey: verify every thermostat a controller exposes.
//!
//! Connection and database errors abort the survey. Anything that goes wrong
//! with a single thermostat is recorded in its [`ThermostatOutcome`] and the
//! survey moves on to the next one.

use std::path::Path;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use thermocheck_domain::area::Area;
use thermocheck_domain::connection::ConnectionSettings;
use thermocheck_domain::error::{ThermoError, display_chain};
use thermocheck_domain::plan::TestPlan;
use thermocheck_domain::report::VerificationReport;
use thermocheck_domain::thermostat::{ThermostatInfo, ThermostatReading};

use crate::ports::{Controller, Settle, Thermostat};
use crate::services::sequencer::VerificationSequencer;

/// Result of verifying one thermostat.
#[derive(Debug)]
pub struct ThermostatOutcome {
    pub area: Area,
    pub thermostat: ThermostatInfo,
    /// State read before the run, when it could be read.
    pub reading: Option<ThermostatReading>,
    pub result: Result<VerificationReport, ThermoError>,
}

impl ThermostatOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(VerificationReport::is_success)
    }

    /// Report of a run that stopped at its first mismatch.
    #[must_use]
    pub fn partial_report(&self) -> Option<&VerificationReport> {
        match &self.result {
            Err(ThermoError::VerificationFailed(failure)) => Some(&*failure.report),
            _ => None,
        }
    }
}

impl Serialize for ThermostatOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ThermostatOutcome", 5)?;
        state.serialize_field("area", &self.area)?;
        state.serialize_field("thermostat", &self.thermostat)?;
        state.serialize_field("reading", &self.reading)?;
        match &self.result {
            Ok(report) => {
                state.serialize_field("report", report)?;
                state.serialize_field("error", &None::<String>)?;
            }
            Err(err) => {
                state.serialize_field("report", &self.partial_report())?;
                state.serialize_field("error", &Some(display_chain(err)))?;
            }
        }
        state.end()
    }
}

/// All outcomes of one survey, in controller order.
#[derive(Debug, Default, Serialize)]
pub struct SurveyReport {
    pub outcomes: Vec<ThermostatOutcome>,
}

impl SurveyReport {
    /// Thermostats whose run completed with every assertion holding.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Thermostats whose run completed with at least one failed assertion.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.result.as_ref().is_ok_and(|r| !r.is_success()))
            .count()
    }

    /// Thermostats whose run ended with an error.
    #[must_use]
    pub fn errored(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Application service walking a controller's thermostats.
pub struct ThermostatSurvey<S> {
    sequencer: VerificationSequencer<S>,
}

impl<S: Settle> ThermostatSurvey<S> {
    pub fn new(sequencer: VerificationSequencer<S>) -> Self {
        Self { sequencer }
    }

    /// Connect, load the database (from `cache_path` when the controller has
    /// it cached), and verify every thermostat.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Validation`] for unusable connection settings,
    /// or whatever the controller returns from `connect` / `load_database`.
    /// Per-thermostat failures are reported in the outcomes instead.
    pub async fn run<C: Controller>(
        &self,
        controller: &mut C,
        settings: &ConnectionSettings,
        cache_path: &Path,
    ) -> Result<SurveyReport, ThermoError> {
        settings.validate()?;

        tracing::info!(
            controller = controller.name(),
            host = %settings.host,
            "connecting to controller"
        );
        controller.connect(settings).await?;
        controller.load_database(cache_path).await?;

        let areas: Vec<_> = controller
            .areas()
            .iter()
            .filter(|entry| !entry.thermostats.is_empty())
            .collect();
        tracing::info!(count = areas.len(), "found areas with thermostats");

        let mut report = SurveyReport::default();
        for entry in areas {
            tracing::info!(
                area = %entry.area,
                thermostats = entry.thermostats.len(),
                "surveying area"
            );
            for thermostat in &entry.thermostats {
                report.outcomes.push(self.verify(&entry.area, thermostat).await);
            }
        }

        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            errored = report.errored(),
            "survey complete"
        );
        Ok(report)
    }

    async fn verify<T: Thermostat>(&self, area: &Area, thermostat: &T) -> ThermostatOutcome {
        let info = thermostat.info().clone();

        let reading = match thermostat.read_state().await {
            Ok(reading) => reading,
            Err(err) => {
                tracing::error!(
                    thermostat = %info,
                    error = %display_chain(&err),
                    "failed to read thermostat"
                );
                return ThermostatOutcome {
                    area: area.clone(),
                    thermostat: info,
                    reading: None,
                    result: Err(err),
                };
            }
        };
        tracing::info!(
            thermostat = %info,
            temperature = ?reading.temperature,
            mode = ?reading.mode,
            fan_mode = ?reading.fan_mode,
            heat_setpoint = ?reading.heat_setpoint,
            cool_setpoint = ?reading.cool_setpoint,
            "current state"
        );

        let plan = TestPlan::standard(reading.heat_setpoint, reading.cool_setpoint);
        let result = self.sequencer.run(thermostat, &plan).await;
        if let Err(err) = &result {
            tracing::error!(
                thermostat = %info,
                error = %display_chain(err),
                "error testing thermostat"
            );
        }

        ThermostatOutcome {
            area: area.clone(),
            thermostat: info,
            reading: Some(reading),
            result,
        }
    }
}
