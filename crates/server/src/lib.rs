use api_types::error::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{router, run, run_with_listener, spawn_with_listener};

mod cashboxes;
mod server;
mod user;
mod vouchers;

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::AlreadyCorrected(_) => StatusCode::CONFLICT,
        EngineError::HeaderIncomplete(_)
        | EngineError::EmptyRows
        | EngineError::Unbalanced(_)
        | EngineError::InvalidAccount(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvalidId(_)
        | EngineError::CurrencyMismatch(_)
        | EngineError::InvalidEvent(_)
        | EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                err.code().to_string(),
                message_for_engine_error(err),
            ),
            ServerError::Generic(err) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST".to_string(), err)
            }
        };

        (status, Json(ErrorBody { code, message })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
