use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sixdice_game::GameError;
use thiserror::Error;

use crate::api::ErrorResponse;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("ledger error: {0}")]
    Ledger(#[from] sixdice_ledger::LedgerError),

    /// The request could not be decoded into its payload type.
    #[error("invalid request: {message}")]
    InvalidRequest { status: StatusCode, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Game(GameError::InvalidBet(_)) => StatusCode::BAD_REQUEST,
            Self::Game(GameError::InvalidIterationCount { .. }) => StatusCode::BAD_REQUEST,
            Self::Game(GameError::InsufficientBalance { .. }) => StatusCode::CONFLICT,
            Self::InvalidRequest { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Game(err) => err.code(),
            Self::Ledger(_) => "ledger_error",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::Config(_) => "config_error",
            Self::Io(_) => "io_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code().into(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
