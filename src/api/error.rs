use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::blockchain::{ClientError, TransportError};

/// Maps client failures onto HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Client(ClientError),
    NotFound(String),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::Client(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Client(err) => match err {
                ClientError::Validation(_) => StatusCode::BAD_REQUEST,
                ClientError::BroadcastRejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ClientError::Transport(TransportError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
                ClientError::Transport(_) => StatusCode::BAD_GATEWAY,
                ClientError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::NotFound(what) => json!({
                "error": "not_found",
                "message": format!("{} not found", what),
            }),
            ApiError::Client(err) => {
                if status.is_server_error() {
                    error!("Request failed: {}", err);
                }
                let mut body = json!({ "error": err.kind(), "message": err.to_string() });
                if let ClientError::BroadcastRejected { code, data, .. } = err {
                    body["code"] = json!(code);
                    body["data"] = json!(data);
                }
                body
            }
        };
        (status, Json(body)).into_response()
    }
}
