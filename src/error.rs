use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

/// Application-level error type
#[derive(Debug)]
pub enum AppError {
    /// Wrong HTTP method; carries the method the resource accepts
    MethodNotAllowed { allow: &'static str },
    /// Required request field absent
    MissingField(String),
    /// Business-rule rejection (window, validation, ownership)
    BadRequest(String),
    /// Session authentication failed
    Unauthorized,
    /// A collaborator rejected or failed the request; echoes its status
    /// when one is known
    Upstream { status: Option<u16>, message: String },
    /// Internal server error
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotAllowed { .. } => write!(f, "Method not allowed"),
            Self::MissingField(msg) => write!(f, "{msg}"),
            Self::BadRequest(msg) => write!(f, "{msg}"),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::Upstream { message, .. } => write!(f, "{message}"),
            Self::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingField(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Upstream { status, .. } => status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = ErrorBody {
            error: self.to_string(),
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let Self::MethodNotAllowed { allow } = self {
            builder.insert_header(("Allow", *allow));
        }
        builder.json(body)
    }
}
