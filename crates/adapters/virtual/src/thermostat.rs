//! Virtual thermostat: holds its state in memory and applies writes
//! immediately.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thermocheck_app::ports::Thermostat;
use thermocheck_domain::error::ThermoError;
use thermocheck_domain::id::IntegrationId;
use thermocheck_domain::thermostat::{
    FanMode, SetpointChange, ThermostatInfo, ThermostatMode, ThermostatReading,
};

use crate::config::{VirtualFaults, VirtualThermostatConfig};
use crate::error::VirtualError;

/// A simulated thermostat.
pub struct VirtualThermostat {
    info: ThermostatInfo,
    state: Mutex<ThermostatReading>,
    faults: VirtualFaults,
}

impl VirtualThermostat {
    #[must_use]
    pub fn new(info: ThermostatInfo, initial: ThermostatReading, faults: VirtualFaults) -> Self {
        Self {
            info,
            state: Mutex::new(initial),
            faults,
        }
    }

    /// Build from its database entry.
    #[must_use]
    pub fn from_config(config: &VirtualThermostatConfig) -> Self {
        Self::new(
            ThermostatInfo::new(IntegrationId::new(config.id), config.name.clone()),
            ThermostatReading {
                temperature: config.temperature,
                mode: config.mode,
                fan_mode: config.fan_mode,
                heat_setpoint: config.heat_setpoint,
                cool_setpoint: config.cool_setpoint,
            },
            config.faults,
        )
    }

    /// Raw internal state, bypassing faults.
    #[must_use]
    pub fn state(&self) -> ThermostatReading {
        *self.lock_state()
    }

    fn lock_state(&self) -> MutexGuard<'_, ThermostatReading> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn read<V>(&self, f: impl FnOnce(&ThermostatReading) -> V) -> Result<V, ThermoError> {
        if self.faults.fail_reads {
            return Err(VirtualError::ReadFailed(self.info.id).into());
        }
        Ok(f(&self.lock_state()))
    }

    fn write(&self, f: impl FnOnce(&mut ThermostatReading)) -> Result<(), ThermoError> {
        if self.faults.fail_writes {
            return Err(VirtualError::WriteFailed(self.info.id).into());
        }
        f(&mut self.lock_state());
        Ok(())
    }

    fn offset(&self, value: Option<f64>) -> Option<f64> {
        value.map(|v| v + self.faults.setpoint_offset)
    }
}

impl Thermostat for VirtualThermostat {
    fn info(&self) -> &ThermostatInfo {
        &self.info
    }

    async fn temperature(&self) -> Result<Option<f64>, ThermoError> {
        self.read(|s| s.temperature)
    }

    async fn mode(&self) -> Result<Option<ThermostatMode>, ThermoError> {
        self.read(|s| s.mode)
    }

    async fn fan_mode(&self) -> Result<Option<FanMode>, ThermoError> {
        self.read(|s| s.fan_mode)
    }

    async fn heat_setpoint(&self) -> Result<Option<f64>, ThermoError> {
        let raw = self.read(|s| s.heat_setpoint)?;
        Ok(self.offset(raw))
    }

    async fn cool_setpoint(&self) -> Result<Option<f64>, ThermoError> {
        let raw = self.read(|s| s.cool_setpoint)?;
        Ok(self.offset(raw))
    }

    async fn set_mode(&self, mode: ThermostatMode) -> Result<(), ThermoError> {
        tracing::debug!(thermostat = %self.info, %mode, "set mode");
        let ignore = self.faults.ignore_mode_changes;
        self.write(|s| {
            if !ignore {
                s.mode = Some(mode);
            }
        })
    }

    async fn set_fan_mode(&self, fan_mode: FanMode) -> Result<(), ThermoError> {
        tracing::debug!(thermostat = %self.info, %fan_mode, "set fan mode");
        self.write(|s| s.fan_mode = Some(fan_mode))
    }

    async fn set_setpoints(&self, setpoints: SetpointChange) -> Result<(), ThermoError> {
        setpoints.validate()?;
        tracing::debug!(thermostat = %self.info, %setpoints, "set setpoints");
        self.write(|s| {
            if let Some(heat) = setpoints.heat {
                s.heat_setpoint = Some(heat);
            }
            if let Some(cool) = setpoints.cool {
                s.cool_setpoint = Some(cool);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermocheck_domain::error::ValidationError;

    fn thermostat(faults: VirtualFaults) -> VirtualThermostat {
        VirtualThermostat::new(
            ThermostatInfo::new(IntegrationId::new(5), "Study"),
            ThermostatReading {
                temperature: Some(70.0),
                mode: Some(ThermostatMode::Off),
                fan_mode: Some(FanMode::Auto),
                heat_setpoint: Some(68.0),
                cool_setpoint: Some(75.0),
            },
            faults,
        )
    }

    #[tokio::test]
    async fn should_report_initial_state() {
        let t = thermostat(VirtualFaults::default());
        let reading = t.read_state().await.unwrap();
        assert_eq!(reading, t.state());
        assert_eq!(reading.temperature, Some(70.0));
    }

    #[tokio::test]
    async fn should_apply_mode_and_fan_mode() {
        let t = thermostat(VirtualFaults::default());
        t.set_mode(ThermostatMode::Cool).await.unwrap();
        t.set_fan_mode(FanMode::On).await.unwrap();
        assert_eq!(t.mode().await.unwrap(), Some(ThermostatMode::Cool));
        assert_eq!(t.fan_mode().await.unwrap(), Some(FanMode::On));
    }

    #[tokio::test]
    async fn should_leave_unset_setpoint_untouched() {
        let t = thermostat(VirtualFaults::default());
        t.set_setpoints(SetpointChange::heat(71.0)).await.unwrap();
        assert_eq!(t.heat_setpoint().await.unwrap(), Some(71.0));
        assert_eq!(t.cool_setpoint().await.unwrap(), Some(75.0));
    }

    #[tokio::test]
    async fn should_reject_empty_setpoint_change() {
        let t = thermostat(VirtualFaults::default());
        let result = t.set_setpoints(SetpointChange::default()).await;
        assert!(matches!(
            result,
            Err(ThermoError::Validation(ValidationError::EmptySetpointChange))
        ));
    }

    #[tokio::test]
    async fn should_fail_reads_when_fault_injected() {
        let t = thermostat(VirtualFaults {
            fail_reads: true,
            ..VirtualFaults::default()
        });
        assert!(matches!(
            t.mode().await,
            Err(ThermoError::Communication(_))
        ));
    }

    #[tokio::test]
    async fn should_fail_writes_without_changing_state() {
        let t = thermostat(VirtualFaults {
            fail_writes: true,
            ..VirtualFaults::default()
        });
        let result = t.set_mode(ThermostatMode::Heat).await;
        assert!(matches!(result, Err(ThermoError::Communication(_))));
        assert_eq!(t.state().mode, Some(ThermostatMode::Off));
    }

    #[tokio::test]
    async fn should_ignore_mode_changes_when_fault_injected() {
        let t = thermostat(VirtualFaults {
            ignore_mode_changes: true,
            ..VirtualFaults::default()
        });
        t.set_mode(ThermostatMode::Heat).await.unwrap();
        assert_eq!(t.mode().await.unwrap(), Some(ThermostatMode::Off));
    }

    #[tokio::test]
    async fn should_offset_reported_setpoints_only() {
        let t = thermostat(VirtualFaults {
            setpoint_offset: 0.5,
            ..VirtualFaults::default()
        });
        assert_eq!(t.heat_setpoint().await.unwrap(), Some(68.5));
        assert_eq!(t.state().heat_setpoint, Some(68.0));
    }
}
