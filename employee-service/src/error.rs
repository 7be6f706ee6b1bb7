use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::responses::ApiResponse;
use thiserror::Error;

use crate::infrastructure::envelope::DecodeError;

/// Application-level errors for the employee service.
///
/// Every outcome of a remote call maps to exactly one of the remote kinds
/// (`NotFound` through `Transport`); `NoEmployeesFound` is raised only by
/// aggregation over an empty collection.
#[derive(Debug, Error)]
pub enum EmployeeServiceError {
    /// The remote reported that the requested employee does not exist.
    #[error("Not Found: {0}")]
    NotFound(String),

    /// The request was rejected as malformed, locally or by the remote.
    #[error("Invalid: {0}")]
    Invalid(String),

    /// Any other 4xx-class outcome from the remote.
    #[error("Client Error ({status}): {message}")]
    ClientError { status: u16, message: String },

    /// Any 5xx-class outcome from the remote.
    #[error("Server Error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// A successful response whose body did not match the expected envelope.
    #[error("Decode Error: {0}")]
    Decode(#[from] DecodeError),

    /// The request could not be sent or no response was received.
    #[error("Transport Error: {0}")]
    Transport(String),

    /// An aggregate was requested over an empty employee collection.
    #[error("No employees found")]
    NoEmployeesFound,
}

impl EmployeeServiceError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Invalid(_) => "invalid",
            Self::ClientError { .. } => "client_error",
            Self::ServerError { .. } => "server_error",
            Self::Decode(_) => "decode_error",
            Self::Transport(_) => "transport_error",
            Self::NoEmployeesFound => "no_employees_found",
        }
    }
}

impl IntoResponse for EmployeeServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) | Self::NoEmployeesFound => StatusCode::NOT_FOUND,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::ClientError { .. } | Self::ServerError { .. } | Self::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
            Self::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let kind = self.kind();
        if status.is_server_error() {
            tracing::error!(error = %self, kind, %status, "Server error");
        } else {
            tracing::warn!(error = %self, kind, %status, "Client error");
        }

        let message = match self {
            Self::Transport(_) => {
                "Employee API is currently unreachable, please try again later".to_owned()
            }
            other => other.to_string(),
        };

        let body = ApiResponse::<()>::err(message);
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_render_as_gateway_errors() {
        let cases = [
            (
                EmployeeServiceError::ServerError {
                    status: 500,
                    message: "boom".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                EmployeeServiceError::ClientError {
                    status: 429,
                    message: "slow down".into(),
                },
                StatusCode::BAD_GATEWAY,
            ),
            (
                EmployeeServiceError::Transport("connection refused".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                EmployeeServiceError::NotFound("Employee 9 not found".into()),
                StatusCode::NOT_FOUND,
            ),
            (EmployeeServiceError::NoEmployeesFound, StatusCode::NOT_FOUND),
            (
                EmployeeServiceError::Invalid("name must not be blank".into()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            let kind = error.kind();
            assert_eq!(error.into_response().status(), expected, "{kind}");
        }
    }
}
