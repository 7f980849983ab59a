//! # thermocheck
//!
//! Composition root that wires the controller adapter to the survey service
//! and prints the results.
//!
//! ## Responsibilities
//! - Load configuration (`thermocheck.toml`, env vars)
//! - Install the tracing subscriber
//! - Construct the controller adapter and application services
//! - Run the survey and render it to stdout
//! - Optionally write the JSON report
//! - Wait for Enter before exiting, on success and on every error path
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! No domain logic belongs here.

mod config;
mod console;

use std::io::BufRead;
use std::path::Path;

use anyhow::Context;
use thermocheck_adapter_virtual::VirtualController;
use thermocheck_app::ports::{Controller, TokioSettle};
use thermocheck_app::services::sequencer::VerificationSequencer;
use thermocheck_app::services::survey::{SurveyReport, ThermostatSurvey};
use thermocheck_domain::error::{ThermoError, display_chain};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::console::ConsoleReport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            println!("Error: {}", display_chain(&err));
            pause_before_exit(None);
            return Err(err).context("failed to load configuration");
        }
    };
    init_tracing(&config.logging.filter);
    tracing::debug!(?config, "configuration loaded");

    let outcome = survey(&config).await;

    let result = match &outcome {
        Ok(report) => {
            println!("{}", ConsoleReport(report));
            match &config.report.path {
                Some(path) => write_report(path, report),
                None => Ok(()),
            }
        }
        Err(err) => {
            println!("Error: {}", display_chain(err));
            Ok(())
        }
    };

    pause_before_exit(Some(&config));

    result?;
    outcome.context("survey did not complete")?;
    Ok(())
}

fn init_tracing(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn survey(config: &Config) -> Result<SurveyReport, ThermoError> {
    let mut controller = VirtualController::new(config.virtual_controller.clone());
    let sequencer = VerificationSequencer::new(TokioSettle, config.sequencer_settings());
    let survey = ThermostatSurvey::new(sequencer);

    let result = survey
        .run(
            &mut controller,
            &config.connection_settings(),
            &config.controller.cache_path,
        )
        .await;
    if let Err(err) = controller.disconnect().await {
        tracing::warn!(
            error = %display_chain(&err),
            "failed to disconnect from controller"
        );
    }
    result
}

fn write_report(path: &Path, report: &SurveyReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(())
}

/// Whether to wait for Enter before exiting. Without a loaded
/// configuration the default applies.
fn should_pause(config: Option<&Config>) -> bool {
    config.map_or_else(|| Config::default().pause_on_exit, |c| c.pause_on_exit)
}

fn pause_before_exit(config: Option<&Config>) {
    if should_pause(config) {
        wait_for_enter();
    }
}

fn wait_for_enter() {
    println!();
    println!("Press Enter to exit...");
    let mut line = String::new();
    if let Err(err) = std::io::stdin().lock().read_line(&mut line) {
        tracing::debug!(error = %err, "failed to read from stdin");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_pause_when_configuration_failed_to_load() {
        assert!(should_pause(None));
    }

    #[test]
    fn should_follow_configured_pause_setting() {
        let mut config = Config::default();
        assert!(should_pause(Some(&config)));
        config.pause_on_exit = false;
        assert!(!should_pause(Some(&config)));
    }
}
