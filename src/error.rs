//! Error types and their HTTP mapping.
//!
//! Every handler returns [`RelayError`] on failure. The response is a bare
//! status code with no body, so a client can't learn why a forward failed,
//! only that it did.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{debug, error, warn};

/// Failures surfaced at the handler boundary.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Request body missing, not JSON, or `msg` empty.
    #[error("invalid message body: {0}")]
    Validation(String),

    /// No device with this id in the registry.
    #[error("unknown device: {0}")]
    NotFound(String),

    /// The device could not be reached or didn't answer 200.
    #[error("forwarding failed: {0}")]
    Forwarding(#[from] ForwardError),

    /// The router matched without the expected path parameter.
    #[error("path parameter missing")]
    MissingPathParam,

    /// A registry failure that isn't the caller's fault.
    #[error("registry error: {0}")]
    Registry(RegistryError),
}

impl RelayError {
    fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) | RelayError::Forwarding(_) => StatusCode::BAD_REQUEST,
            RelayError::NotFound(_) => StatusCode::NOT_FOUND,
            RelayError::MissingPathParam | RelayError::Registry(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match &self {
            RelayError::Validation(_) | RelayError::NotFound(_) => debug!("{self}"),
            RelayError::Forwarding(_) => warn!("{self}"),
            RelayError::MissingPathParam => error!("{self} (routing misconfiguration)"),
            RelayError::Registry(_) => error!("{self}"),
        }
        self.status_code().into_response()
    }
}

impl From<RegistryError> for RelayError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => RelayError::NotFound(id),
            other @ (RegistryError::DuplicateId(_)
            | RegistryError::EmptyId
            | RegistryError::ReservedId(_)) => RelayError::Registry(other),
        }
    }
}

/// Why a forward to a device failed. Only logged, never returned to the client.
#[derive(Error, Debug)]
pub enum ForwardError {
    #[error("invalid device URL: {0}")]
    InvalidUrl(String),

    #[error("request to device failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("device answered {0}")]
    Status(StatusCode),
}

/// Registry lookup and seeding errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no device with id {0:?}")]
    NotFound(String),

    #[error("duplicate device id {0:?}")]
    DuplicateId(String),

    #[error("device id must not be empty")]
    EmptyId,

    #[error("device id {0:?} collides with a fixed route")]
    ReservedId(String),
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("invalid config: {key} {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

/// Why one of the two HTTP servers stopped.
#[derive(Error, Debug)]
pub enum ServeError {
    #[error("{surface} API failed to bind {listen}: {source}")]
    Bind {
        surface: &'static str,
        listen: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{surface} API stopped: {source}")]
    Serve {
        surface: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("server task panicked: {0}")]
    Panicked(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RelayError::Validation("empty".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::NotFound("ghost".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RelayError::Forwarding(ForwardError::Status(StatusCode::BAD_GATEWAY))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::MissingPathParam.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_registry_errors_map_by_variant() {
        let err = RelayError::from(RegistryError::NotFound("ghost".into()));
        assert!(matches!(err, RelayError::NotFound(ref id) if id == "ghost"));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = RelayError::from(RegistryError::DuplicateId("a".into()));
        assert!(matches!(err, RelayError::Registry(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
