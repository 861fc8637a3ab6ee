use ambienco_core::AmbiencoError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

/// Error returned by every handler, rendered as
/// `{"success": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub AmbiencoError);

impl ApiError {
    /// 404 with the given client-facing message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AmbiencoError::NotFound(message.into()))
    }

    /// 400 with the given client-facing message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AmbiencoError::Validation(message.into()))
    }

    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AmbiencoError::NotFound(_) => StatusCode::NOT_FOUND,
            AmbiencoError::Validation(_) | AmbiencoError::Json(_) => StatusCode::BAD_REQUEST,
            AmbiencoError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AmbiencoError::Security(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client. Server-side failures stay generic.
    pub fn client_message(&self) -> String {
        match &self.0 {
            AmbiencoError::NotFound(msg)
            | AmbiencoError::Validation(msg)
            | AmbiencoError::Unauthorized(msg)
            | AmbiencoError::Security(msg) => msg.clone(),
            AmbiencoError::Json(e) => format!("Invalid JSON: {e}"),
            _ => "Internal server error".to_string(),
        }
    }
}

impl From<AmbiencoError> for ApiError {
    fn from(err: AmbiencoError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = json!({"success": false, "error": self.client_message()});
        (status, Json(body)).into_response()
    }
}

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// `{"success": true, "data": data}`.
pub fn ok<T: Serialize>(data: T) -> ApiResult<Json<serde_json::Value>> {
    let data = serde_json::to_value(data).map_err(AmbiencoError::from)?;
    Ok(Json(json!({"success": true, "data": data})))
}

/// `{"success": true, "message": message}`.
pub fn ok_message(message: &str) -> Json<serde_json::Value> {
    Json(json!({"success": true, "message": message}))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        let unauthorized = ApiError(AmbiencoError::Unauthorized("no".to_string()));
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
        let store = ApiError(AmbiencoError::Store("disk full".to_string()));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_details_hidden() {
        let store = ApiError(AmbiencoError::Store("/var/data/kv is read-only".to_string()));
        assert_eq!(store.client_message(), "Internal server error");
        assert_eq!(ApiError::not_found("Post not found").client_message(), "Post not found");
    }
}
