//! Error taxonomy for the picker, the countdown engine and the HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::api::responses::ErrorResponse;

/// Everything that can go wrong while selecting a duration or driving a countdown
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Start was requested with a total duration of zero
    #[error("invalid duration: total duration must be greater than zero")]
    InvalidDuration,

    /// A time field lies outside the range its picker allows
    #[error("{field} value {value} is outside [{min}, {max}]")]
    FieldOutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A picker was addressed by a name that is not hours/minutes/seconds
    #[error("unknown picker field: {0}")]
    UnknownField(String),

    /// A request body could not be understood
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A control was issued before any timer was started
    #[error("no timer has been started")]
    NoActiveTimer,

    /// A control is not valid in the timer's current phase
    #[error("cannot {action} a timer that is {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    /// The countdown task is gone
    #[error("countdown engine unavailable")]
    EngineUnavailable,

    /// A lock guarding shared state was poisoned
    #[error("failed to lock {0} state")]
    StatePoisoned(&'static str),
}

impl TimerError {
    /// HTTP status code used when this error reaches a client
    pub fn status_code(&self) -> StatusCode {
        match self {
            TimerError::InvalidDuration | TimerError::FieldOutOfRange { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            TimerError::UnknownField(_) | TimerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            TimerError::NoActiveTimer => StatusCode::NOT_FOUND,
            TimerError::InvalidTransition { .. } => StatusCode::CONFLICT,
            TimerError::EngineUnavailable | TimerError::StatePoisoned(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TimerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(TimerError::InvalidDuration.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(TimerError::NoActiveTimer.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            TimerError::InvalidTransition { action: "pause", phase: "stopped" }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TimerError::UnknownField("days".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn messages_name_the_offending_field() {
        let err = TimerError::FieldOutOfRange { field: "minutes", value: 61, min: 0, max: 59 };
        assert_eq!(err.to_string(), "minutes value 61 is outside [0, 59]");
    }
}
