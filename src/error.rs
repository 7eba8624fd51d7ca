use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::timeoff::{HrGatewayError, NotifyError};
use std::fmt;

/// Errors that abort the run before the pipeline starts. Stage-level
/// failures inside the pipeline degrade to empty results instead and are
/// carried on the run report.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Hr(HrGatewayError),
    Notify(NotifyError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Hr(err) => write!(f, "HR client error: {}", err),
            AppError::Notify(err) => write!(f, "webhook client error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Hr(err) => Some(err),
            AppError::Notify(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<HrGatewayError> for AppError {
    fn from(value: HrGatewayError) -> Self {
        Self::Hr(value)
    }
}

impl From<NotifyError> for AppError {
    fn from(value: NotifyError) -> Self {
        Self::Notify(value)
    }
}
