use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use fragview_core::FragviewError;

pub fn fragview_error_response(err: FragviewError, operation: &str) -> Response {
    let status = status_for(&err);
    (status, Json(err.to_payload(operation))).into_response()
}

/// A request missing a required URL parameter, reported as a plain 400 rather
/// than a semantic rejection.
pub fn missing_param_response(param: &str, operation: &str) -> Response {
    let err = FragviewError::Validation(format!("missing {param} in URL params"));
    (StatusCode::BAD_REQUEST, Json(err.to_payload(operation))).into_response()
}

fn status_for(err: &FragviewError) -> StatusCode {
    match err {
        FragviewError::Validation(_)
        | FragviewError::Regex(_)
        | FragviewError::Json(_)
        | FragviewError::Decode(_)
        | FragviewError::Encoding(_)
        | FragviewError::InvalidRange { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        FragviewError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        FragviewError::StaleResponse { .. } => StatusCode::CONFLICT,
        FragviewError::Http(_) => StatusCode::BAD_GATEWAY,
        FragviewError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
