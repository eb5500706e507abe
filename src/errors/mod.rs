use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Fixed top-level message for a failed onboarding. The raw cause goes in `detail`.
pub const ONBOARDING_FAILED_MESSAGE: &str = "เกิดข้อผิดพลาดในการเพิ่มข้อมูลพนักงาน";

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    PayloadTooLarge(String),
    Onboarding(String),
    Storage(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload Too Large: {}", msg),
            AppError::Onboarding(msg) => write!(f, "Onboarding Failed: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Onboarding(_)
            | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Onboarding(detail) => ErrorResponse {
                error: ONBOARDING_FAILED_MESSAGE.to_string(),
                detail: Some(detail.clone()),
            },
            AppError::BadRequest(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::Storage(msg) => ErrorResponse {
                error: msg.clone(),
                detail: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
