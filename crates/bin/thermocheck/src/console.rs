//! Human-readable rendering of a survey for the terminal.

use std::fmt;

use thermocheck_app::services::survey::{SurveyReport, ThermostatOutcome};
use thermocheck_domain::area::Area;
use thermocheck_domain::error::display_chain;
use thermocheck_domain::report::VerificationReport;
use thermocheck_domain::thermostat::ThermostatReading;

/// Console view of a [`SurveyReport`].
pub struct ConsoleReport<'a>(pub &'a SurveyReport);

impl fmt::Display for ConsoleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let mut areas: Vec<&Area> = Vec::new();
        for outcome in &report.outcomes {
            if !areas.contains(&&outcome.area) {
                areas.push(&outcome.area);
            }
        }
        writeln!(f, "Found {} areas with thermostats", areas.len())?;

        let mut current: Option<&Area> = None;
        for outcome in &report.outcomes {
            if current != Some(&outcome.area) {
                writeln!(f)?;
                writeln!(f, "Area: {}", outcome.area)?;
                current = Some(&outcome.area);
            }
            write_outcome(f, outcome)?;
        }

        writeln!(f)?;
        write!(
            f,
            "Summary: {} passed, {} failed, {} errors",
            report.passed(),
            report.failed(),
            report.errored()
        )
    }
}

fn write_outcome(f: &mut fmt::Formatter<'_>, outcome: &ThermostatOutcome) -> fmt::Result {
    writeln!(
        f,
        "  Thermostat: {} (integration id {})",
        outcome.thermostat.name, outcome.thermostat.id
    )?;
    if let Some(reading) = &outcome.reading {
        write_reading(f, reading)?;
    }
    match &outcome.result {
        Ok(report) => write_report(f, report),
        Err(err) => {
            if let Some(report) = outcome.partial_report() {
                write_report(f, report)?;
            }
            writeln!(f, "    Error testing thermostat: {}", display_chain(err))
        }
    }
}

fn write_reading(f: &mut fmt::Formatter<'_>, reading: &ThermostatReading) -> fmt::Result {
    writeln!(f, "    Temperature: {}", Unknown(reading.temperature))?;
    writeln!(f, "    Mode: {}", Unknown(reading.mode))?;
    writeln!(f, "    Fan mode: {}", Unknown(reading.fan_mode))?;
    writeln!(
        f,
        "    Setpoints: heat {}, cool {}",
        Unknown(reading.heat_setpoint),
        Unknown(reading.cool_setpoint)
    )
}

fn write_report(f: &mut fmt::Formatter<'_>, report: &VerificationReport) -> fmt::Result {
    for step in &report.steps {
        match step.first_failure() {
            None => writeln!(f, "    [PASS] step {}: {}", step.index + 1, step.step)?,
            Some(failure) => writeln!(
                f,
                "    [FAIL] step {}: {} ({failure})",
                step.index + 1,
                step.step
            )?,
        }
    }
    match report.restoration.iter().find(|a| !a.passed) {
        None => writeln!(f, "    Restored original settings"),
        Some(failure) => writeln!(f, "    [FAIL] restore: {failure}"),
    }
}

/// Displays `unknown` for fields the thermostat did not report.
struct Unknown<T>(Option<T>);

impl<T: fmt::Display> fmt::Display for Unknown<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermocheck_domain::error::{ThermoError, VerificationFailure};
    use thermocheck_domain::expectation::{Expectation, Tolerance};
    use thermocheck_domain::id::{IntegrationId, RunId};
    use thermocheck_domain::plan::PlanStep;
    use thermocheck_domain::report::StepReport;
    use thermocheck_domain::snapshot::Snapshot;
    use thermocheck_domain::thermostat::{FanMode, ThermostatInfo, ThermostatMode};
    use thermocheck_domain::time::now;

    fn reading() -> ThermostatReading {
        ThermostatReading {
            temperature: Some(70.5),
            mode: Some(ThermostatMode::Heat),
            fan_mode: None,
            heat_setpoint: Some(68.0),
            cool_setpoint: Some(75.0),
        }
    }

    fn report(observed_mode: ThermostatMode) -> VerificationReport {
        let info = ThermostatInfo::new(IntegrationId::new(3), "Hall");
        let mut report = VerificationReport::start(RunId::new(), info, Snapshot::default());
        let expected = Expectation::Mode(ThermostatMode::Cool);
        let observed = ThermostatReading {
            mode: Some(observed_mode),
            ..ThermostatReading::default()
        };
        report.steps.push(StepReport {
            index: 0,
            step: PlanStep::SetMode {
                mode: ThermostatMode::Cool,
            },
            assertions: vec![expected.evaluate(&observed, Tolerance::DEFAULT)],
            checked_at: now(),
        });
        report.restoration.push(
            Expectation::FanMode(FanMode::Auto).evaluate(
                &ThermostatReading {
                    fan_mode: Some(FanMode::Auto),
                    ..ThermostatReading::default()
                },
                Tolerance::DEFAULT,
            ),
        );
        report
    }

    fn outcome(area: &str, result: Result<VerificationReport, ThermoError>) -> ThermostatOutcome {
        ThermostatOutcome {
            area: Area::new(area).unwrap(),
            thermostat: ThermostatInfo::new(IntegrationId::new(3), "Hall"),
            reading: Some(reading()),
            result,
        }
    }

    #[test]
    fn should_render_passing_thermostat() {
        let survey = SurveyReport {
            outcomes: vec![outcome("Hallway", Ok(report(ThermostatMode::Cool)))],
        };

        let text = ConsoleReport(&survey).to_string();

        assert!(text.starts_with("Found 1 areas with thermostats"));
        assert!(text.contains("Area: Hallway"));
        assert!(text.contains("Thermostat: Hall (integration id 3)"));
        assert!(text.contains("Temperature: 70.5"));
        assert!(text.contains("Fan mode: unknown"));
        assert!(text.contains("Setpoints: heat 68, cool 75"));
        assert!(text.contains("[PASS] step 1: set mode COOL"));
        assert!(text.contains("Restored original settings"));
        assert!(text.ends_with("Summary: 1 passed, 0 failed, 0 errors"));
    }

    #[test]
    fn should_render_failed_step_with_observed_value() {
        let survey = SurveyReport {
            outcomes: vec![outcome("Hallway", Ok(report(ThermostatMode::Off)))],
        };

        let text = ConsoleReport(&survey).to_string();

        assert!(text.contains("[FAIL] step 1: set mode COOL (mode expected COOL, got OFF)"));
        assert!(text.ends_with("Summary: 0 passed, 1 failed, 0 errors"));
    }

    #[test]
    fn should_render_error_and_group_by_area() {
        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "no response");
        let survey = SurveyReport {
            outcomes: vec![
                outcome("Upstairs", Ok(report(ThermostatMode::Cool))),
                outcome("Upstairs", Err(ThermoError::Communication(Box::new(err)))),
                outcome("Basement", Ok(report(ThermostatMode::Cool))),
            ],
        };

        let text = ConsoleReport(&survey).to_string();

        assert!(text.starts_with("Found 2 areas with thermostats"));
        assert_eq!(text.matches("Area: Upstairs").count(), 1);
        assert!(text.contains("Error testing thermostat: communication error: no response"));
        assert!(text.ends_with("Summary: 2 passed, 0 failed, 1 errors"));
    }

    #[test]
    fn should_render_checked_steps_of_aborted_run() {
        let partial = report(ThermostatMode::Off);
        let failure = VerificationFailure {
            step: 0,
            assertion: partial.steps[0].assertions[0],
            report: Box::new(partial),
        };
        let survey = SurveyReport {
            outcomes: vec![outcome("Hallway", Err(failure.into()))],
        };

        let text = ConsoleReport(&survey).to_string();

        assert!(text.contains("[FAIL] step 1: set mode COOL"));
        assert!(text.contains("Restored original settings"));
        assert!(text.contains(
            "Error testing thermostat: verification failed: step 0: mode expected COOL, got OFF"
        ));
        assert!(text.ends_with("Summary: 0 passed, 0 failed, 1 errors"));
    }

    #[test]
    fn should_render_empty_survey() {
        let text = ConsoleReport(&SurveyReport::default()).to_string();
        assert!(text.starts_with("Found 0 areas with thermostats"));
        assert!(text.ends_with("Summary: 0 passed, 0 failed, 0 errors"));
    }
}
