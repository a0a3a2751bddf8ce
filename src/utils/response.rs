use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

/// Body returned by `POST /api/events`.
#[derive(Serialize)]
pub struct CreatedResponse<T>
where
    T: Serialize,
{
    pub message: String,
    pub event: T,
}

pub fn success<T>(data: T) -> impl IntoResponse
where
    T: Serialize,
{
    (StatusCode::OK, Json(data))
}

pub fn created<T>(event: T, message: impl Into<String>) -> impl IntoResponse
where
    T: Serialize,
{
    let body = CreatedResponse {
        message: message.into(),
        event,
    };
    (StatusCode::CREATED, Json(body))
}

pub fn error(code: &str, message: impl Into<String>, status: StatusCode) -> Response {
    let body = ApiErrorBody {
        code: code.to_string(),
        message: message.into(),
    };

    (status, Json(body)).into_response()
}
