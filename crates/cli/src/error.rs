//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that schedulers can use to distinguish failures.
//! - Map connector, configuration and client errors to those codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//! - Signal handling (see cancellation.rs for SIGINT handling).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.
//! - Exit code 130 is reserved for SIGINT (Unix standard: 128 + SIGINT).

use lastpass_client::ClientError;
use lastpass_config::ConfigError;
use lastpass_connector::ConnectorError;

/// Structured exit codes for lastpass-collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,

    /// Unhandled or generic failure, including checkpoint I/O.
    GeneralError = 1,

    /// The vendor rejected the customer ID or provisioning hash.
    AuthenticationFailed = 2,

    /// Network trouble or server errors that outlasted every retry.
    ///
    /// Schedulers may retry on the next cycle.
    ConnectionError = 3,

    /// The API answered with something unusable: a rejected command,
    /// a malformed payload, or more pages than allowed.
    ApiError = 4,

    /// Missing or invalid configuration or credentials.
    ///
    /// Fix the settings; retrying will not help.
    ConfigurationError = 5,

    /// HTTP 429 persisted through every retry.
    RateLimited = 7,

    /// The event sink (HEC or stdout) could not take the batch.
    SinkUnavailable = 8,

    /// Interrupted - SIGINT/Ctrl+C (Unix standard: 128 + 2).
    Interrupted = 130,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }

    /// Returns true if a later attempt may succeed without changes.
    #[allow(dead_code)]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            ExitCode::ConnectionError | ExitCode::RateLimited | ExitCode::SinkUnavailable
        )
    }
}

impl From<&ClientError> for ExitCode {
    fn from(err: &ClientError) -> Self {
        if err.is_auth_error() {
            return ExitCode::AuthenticationFailed;
        }
        match err {
            ClientError::MaxRetriesExceeded(_, inner) => Self::from(inner.as_ref()),
            ClientError::RetryableStatus { status: 429, .. } => ExitCode::RateLimited,
            ClientError::RetryableStatus { .. } | ClientError::HttpError(_) => {
                ExitCode::ConnectionError
            }
            ClientError::InvalidUrl(_) | ClientError::InvalidRequest(_) => {
                ExitCode::ConfigurationError
            }
            ClientError::Cancelled => ExitCode::Interrupted,
            ClientError::ApiError { .. }
            | ClientError::Rejected { .. }
            | ClientError::MalformedResponse { .. }
            | ClientError::PageLimitExceeded { .. } => ExitCode::ApiError,
            _ => ExitCode::GeneralError,
        }
    }
}

impl From<&ConfigError> for ExitCode {
    fn from(err: &ConfigError) -> Self {
        match err {
            ConfigError::DotenvParse { .. }
            | ConfigError::DotenvIo { .. }
            | ConfigError::DotenvUnknown
            | ConfigError::Io(_) => ExitCode::GeneralError,
            _ => ExitCode::ConfigurationError,
        }
    }
}

impl From<&ConnectorError> for ExitCode {
    fn from(err: &ConnectorError) -> Self {
        match err {
            ConnectorError::Configuration(e) => Self::from(e),
            ConnectorError::Auth(_) => ExitCode::AuthenticationFailed,
            ConnectorError::Transient(e) => match Self::from(e) {
                ExitCode::RateLimited => ExitCode::RateLimited,
                _ => ExitCode::ConnectionError,
            },
            ConnectorError::MalformedResponse(_)
            | ConnectorError::BatchMalformed { .. }
            | ConnectorError::PageLimitExceeded { .. } => ExitCode::ApiError,
            ConnectorError::Api(e) => Self::from(e),
            ConnectorError::SinkUnavailable(_) => ExitCode::SinkUnavailable,
            ConnectorError::Cancelled => ExitCode::Interrupted,
            ConnectorError::Checkpoint(_) | ConnectorError::TickInProgress(_) => {
                ExitCode::GeneralError
            }
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(err) = cause.downcast_ref::<ConnectorError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<ConfigError>() {
                return ExitCode::from(err);
            }
            if let Some(err) = cause.downcast_ref::<ClientError>() {
                return ExitCode::from(err);
            }
        }
        ExitCode::GeneralError
    }
}
