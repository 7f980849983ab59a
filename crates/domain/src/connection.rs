//! Connection settings for reaching a controller.

use crate::error::{ThermoError, ValidationError};

/// Host and integration credentials of a controller.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub user: String,
    pub password: String,
}

impl ConnectionSettings {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ThermoError::Validation`] when host or user is blank.
    pub fn validate(&self) -> Result<(), ThermoError> {
        if self.host.trim().is_empty() {
            return Err(ValidationError::EmptyHost.into());
        }
        if self.user.trim().is_empty() {
            return Err(ValidationError::EmptyUser.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ConnectionSettings {
        ConnectionSettings {
            host: "192.168.1.160".to_string(),
            user: "lutron".to_string(),
            password: "integration".to_string(),
        }
    }

    #[test]
    fn should_accept_complete_settings() {
        assert!(settings().validate().is_ok());
    }

    #[test]
    fn should_reject_blank_host() {
        let mut s = settings();
        s.host = String::new();
        assert!(matches!(
            s.validate(),
            Err(ThermoError::Validation(ValidationError::EmptyHost))
        ));
    }

    #[test]
    fn should_reject_blank_user() {
        let mut s = settings();
        s.user = " ".to_string();
        assert!(matches!(
            s.validate(),
            Err(ThermoError::Validation(ValidationError::EmptyUser))
        ));
    }

    #[test]
    fn should_redact_password_in_debug_output() {
        let debug = format!("{:?}", settings());
        assert!(debug.contains("192.168.1.160"));
        assert!(!debug.contains("integration"));
    }
}
