//! Thermostat port: reads and writes one thermostat's state.
//!
//! The controller library behind this port owns the protocol. Every getter
//! returns `None` for a value the controller has not reported yet; every
//! failure to reach the device surfaces as [`ThermoError::Communication`].

use std::future::Future;

use thermocheck_domain::error::ThermoError;
use thermocheck_domain::expectation::StateField;
use thermocheck_domain::thermostat::{
    FanMode, SetpointChange, ThermostatInfo, ThermostatMode, ThermostatReading,
};

/// A thermostat capability exposed by a controller adapter.
pub trait Thermostat: Send + Sync {
    /// Name and integration id.
    fn info(&self) -> &ThermostatInfo;

    /// Current measured temperature, in degrees.
    fn temperature(&self) -> impl Future<Output = Result<Option<f64>, ThermoError>> + Send;

    fn mode(&self) -> impl Future<Output = Result<Option<ThermostatMode>, ThermoError>> + Send;

    fn fan_mode(&self) -> impl Future<Output = Result<Option<FanMode>, ThermoError>> + Send;

    fn heat_setpoint(&self) -> impl Future<Output = Result<Option<f64>, ThermoError>> + Send;

    fn cool_setpoint(&self) -> impl Future<Output = Result<Option<f64>, ThermoError>> + Send;

    fn set_mode(&self, mode: ThermostatMode)
    -> impl Future<Output = Result<(), ThermoError>> + Send;

    fn set_fan_mode(&self, fan_mode: FanMode)
    -> impl Future<Output = Result<(), ThermoError>> + Send;

    /// Move the heat and/or cool setpoint. Unset sides stay untouched.
    fn set_setpoints(
        &self,
        setpoints: SetpointChange,
    ) -> impl Future<Output = Result<(), ThermoError>> + Send;

    /// Convenience: read every reported value.
    fn read_state(&self) -> impl Future<Output = Result<ThermostatReading, ThermoError>> + Send {
        async move {
            Ok(ThermostatReading {
                temperature: self.temperature().await?,
                mode: self.mode().await?,
                fan_mode: self.fan_mode().await?,
                heat_setpoint: self.heat_setpoint().await?,
                cool_setpoint: self.cool_setpoint().await?,
            })
        }
    }

    /// Convenience: read only `fields`, leaving the rest of the reading unset.
    fn read_fields(
        &self,
        fields: &[StateField],
    ) -> impl Future<Output = Result<ThermostatReading, ThermoError>> + Send {
        async move {
            let mut reading = ThermostatReading::default();
            for field in fields {
                match field {
                    StateField::Mode => reading.mode = self.mode().await?,
                    StateField::FanMode => reading.fan_mode = self.fan_mode().await?,
                    StateField::HeatSetpoint => {
                        reading.heat_setpoint = self.heat_setpoint().await?;
                    }
                    StateField::CoolSetpoint => {
                        reading.cool_setpoint = self.cool_setpoint().await?;
                    }
                }
            }
            Ok(reading)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use thermocheck_domain::id::IntegrationId;

    struct CountingThermostat {
        info: ThermostatInfo,
        reads: Mutex<Vec<&'static str>>,
    }

    impl CountingThermostat {
        fn new() -> Self {
            Self {
                info: ThermostatInfo::new(IntegrationId::new(1), "Office"),
                reads: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, what: &'static str) {
            self.reads.lock().unwrap().push(what);
        }
    }

    impl Thermostat for CountingThermostat {
        fn info(&self) -> &ThermostatInfo {
            &self.info
        }

        async fn temperature(&self) -> Result<Option<f64>, ThermoError> {
            self.record("temperature");
            Ok(Some(70.0))
        }

        async fn mode(&self) -> Result<Option<ThermostatMode>, ThermoError> {
            self.record("mode");
            Ok(Some(ThermostatMode::Heat))
        }

        async fn fan_mode(&self) -> Result<Option<FanMode>, ThermoError> {
            self.record("fan_mode");
            Ok(None)
        }

        async fn heat_setpoint(&self) -> Result<Option<f64>, ThermoError> {
            self.record("heat_setpoint");
            Ok(Some(68.0))
        }

        async fn cool_setpoint(&self) -> Result<Option<f64>, ThermoError> {
            self.record("cool_setpoint");
            Ok(Some(75.0))
        }

        async fn set_mode(&self, _mode: ThermostatMode) -> Result<(), ThermoError> {
            Ok(())
        }

        async fn set_fan_mode(&self, _fan_mode: FanMode) -> Result<(), ThermoError> {
            Ok(())
        }

        async fn set_setpoints(&self, _setpoints: SetpointChange) -> Result<(), ThermoError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn should_read_every_field_in_read_state() {
        let thermostat = CountingThermostat::new();
        let reading = thermostat.read_state().await.unwrap();
        assert_eq!(reading.temperature, Some(70.0));
        assert_eq!(reading.mode, Some(ThermostatMode::Heat));
        assert_eq!(reading.fan_mode, None);
        assert_eq!(reading.cool_setpoint, Some(75.0));
        assert_eq!(thermostat.reads.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn should_read_only_requested_fields() {
        let thermostat = CountingThermostat::new();
        let reading = thermostat
            .read_fields(&[StateField::HeatSetpoint])
            .await
            .unwrap();
        assert_eq!(reading.heat_setpoint, Some(68.0));
        assert!(reading.mode.is_none());
        assert!(reading.temperature.is_none());
        assert_eq!(*thermostat.reads.lock().unwrap(), vec!["heat_setpoint"]);
    }
}
