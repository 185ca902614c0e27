use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    pub data: T,
}

impl<T: Serialize> JsonApiResponse<T> {
    pub fn ok(data: T) -> ApiResult<T> {
        Ok(Self {
            status: StatusCode::OK.as_u16(),
            message: "ok".to_string(),
            data,
        })
    }

    pub fn created(message: impl Into<String>, data: T) -> ApiResult<T> {
        Self::with_status(StatusCode::CREATED, message, data)
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self {
            status: status.as_u16(),
            message: message.into(),
            data,
        })
    }
}

impl JsonApiResponse<serde_json::Value> {
    pub(crate) fn from_error(err: &AppError) -> Self {
        let status = status_for(err);
        let data = err
            .form_errors()
            .and_then(|errors| serde_json::to_value(errors).ok())
            .unwrap_or(serde_json::Value::Null);
        Self {
            status: status.as_u16(),
            message: err.message().to_string(),
            data,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            log_app_error(&self, status);
        }
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    match err {
        AppError::Internal {
            source: Some(source),
            ..
        } => tracing::error!(
            status = status.as_u16(),
            error = %err,
            source = %source,
            "request failed"
        ),
        _ => tracing::error!(status = status.as_u16(), error = %err, "request failed"),
    }
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{error::AppError, forms::FormErrors};

    use super::{JsonApiResponse, status_for};

    #[test]
    fn validation_errors_become_bad_request_with_field_data() {
        let err = AppError::validation(FormErrors::single("password2", "Passwords don't match"));
        assert_eq!(status_for(&err), StatusCode::BAD_REQUEST);

        let body = JsonApiResponse::from_error(&err);
        assert_eq!(body.status, 400);
        assert_eq!(
            body.data["fields"]["password2"][0],
            "Passwords don't match"
        );
    }

    #[test]
    fn non_validation_errors_carry_null_data() {
        let body = JsonApiResponse::from_error(&AppError::not_found("User not found"));
        assert_eq!(body.status, 404);
        assert_eq!(body.message, "User not found");
        assert!(body.data.is_null());
    }
}
