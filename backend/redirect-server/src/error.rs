use axum::response::{IntoResponse, Response};
use domain_types::errors::{AuthorizationError, BuildError};
use http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Invalid host for socket: {0}")]
    AddressError(#[from] std::net::AddrParseError),
    #[error("Invalid configuration: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error("Failed to initialise logging: {0}")]
    LoggerError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Failure of the redirect callback, rendered as a plain-text response
#[derive(Debug)]
pub enum CallbackError {
    Build(error_stack::Report<BuildError>),
    Authorization(error_stack::Report<AuthorizationError>),
}

impl From<error_stack::Report<BuildError>> for CallbackError {
    fn from(report: error_stack::Report<BuildError>) -> Self {
        Self::Build(report)
    }
}

impl From<error_stack::Report<AuthorizationError>> for CallbackError {
    fn from(report: error_stack::Report<AuthorizationError>) -> Self {
        Self::Authorization(report)
    }
}

impl IntoResponse for CallbackError {
    fn into_response(self) -> Response {
        match self {
            Self::Build(report) => {
                tracing::warn!(error = ?report, "unusable redirect request");
                (
                    StatusCode::BAD_REQUEST,
                    format!("Invalid redirect request: {}", report.current_context()),
                )
                    .into_response()
            }
            Self::Authorization(report) => {
                let error = report.current_context();
                tracing::error!(
                    error = ?report,
                    error_class = error.class(),
                    indeterminate = error.is_indeterminate(),
                    "payment authorisation failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Error during payment authorisation: {error}"),
                )
                    .into_response()
            }
        }
    }
}
