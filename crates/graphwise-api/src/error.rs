use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use graphwise_core::{SchemaError, TurnError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Invalid graph: {0}")]
    Schema(#[from] SchemaError),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Persistence error: {0}")]
    Persist(#[from] graphwise_persist::PersistError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        match err {
            TurnError::Schema(e) => ApiError::Schema(e),
            TurnError::Transport(msg) | TurnError::Lookup(msg) => ApiError::Upstream(msg),
            TurnError::Extraction(msg) => ApiError::BadRequest(msg),
            other @ TurnError::EmptyPrompt => ApiError::BadRequest(other.to_string()),
            TurnError::Persistence(e) => ApiError::Persist(e),
            other @ TurnError::Superseded { .. } => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Schema(ref e) => {
                tracing::warn!("Model returned an invalid graph: {}", e);
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ApiError::Upstream(ref msg) => {
                tracing::error!("Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, "Model endpoint error".to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
            ApiError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Schema(SchemaError::NoJson), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::Upstream("down".into()), StatusCode::BAD_GATEWAY),
            (ApiError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_turn_error_conversion() {
        assert!(matches!(
            ApiError::from(TurnError::Transport("refused".into())),
            ApiError::Upstream(_)
        ));
        assert!(matches!(
            ApiError::from(TurnError::EmptyPrompt),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(TurnError::Schema(SchemaError::NoJson)),
            ApiError::Schema(SchemaError::NoJson)
        ));
    }
}
