use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;

use crate::error::AppError;
use crate::models::{RegisterBotRequest, RegisterBotResponse};
use crate::services::registration::RegistrationError;
use crate::AppState;

/// Header carrying the submitting user's handle
pub const USER_HEADER: &str = "x-arena-user";

/// POST /v1/bots/register
///
/// Validate and publish a bot registration. Identity comes from the
/// user header; the session token from the Authorization header.
pub async fn register_bot(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<RegisterBotRequest>,
) -> Result<HttpResponse, AppError> {
    let username = header_value(&req, USER_HEADER);
    let token = bearer_token(&req);

    let outcome = state
        .registration
        .register(body.into_inner(), &username, &token, Utc::now())
        .await
        .map_err(map_registration_error)?;

    Ok(HttpResponse::Created().json(RegisterBotResponse {
        message: format!("Created PR {}", outcome.pull_request.number),
    }))
}

async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed { allow: "POST" })
}

fn header_value(req: &HttpRequest, name: &str) -> String {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn bearer_token(req: &HttpRequest) -> String {
    let raw = header_value(req, "authorization");
    raw.strip_prefix("Bearer ").unwrap_or(&raw).to_string()
}

/// Map registration errors to application errors
fn map_registration_error(e: RegistrationError) -> AppError {
    match e {
        RegistrationError::MissingBotName | RegistrationError::MissingOwner => {
            AppError::MissingField(e.to_string())
        }
        RegistrationError::WindowClosed
        | RegistrationError::NameTooLong
        | RegistrationError::InvalidNameCharacters
        | RegistrationError::NameTaken(_)
        | RegistrationError::NotOwner => AppError::BadRequest(e.to_string()),
        RegistrationError::Unauthorized => AppError::Unauthorized,
        RegistrationError::Publish(crate::services::PublishError::Rejected { status, message }) => {
            AppError::Upstream {
                status: Some(status),
                message,
            }
        }
        RegistrationError::Publish(e) => AppError::Upstream {
            status: None,
            message: e.to_string(),
        },
        RegistrationError::Auth(e) => AppError::Upstream {
            status: None,
            message: e.to_string(),
        },
        RegistrationError::Avatar(_)
        | RegistrationError::Registry(_)
        | RegistrationError::Encode(_) => AppError::Internal(e.to_string()),
    }
}

/// Configure bot registration routes
pub fn configure_bot_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/bots/register")
            .route(web::post().to(register_bot))
            .default_service(web::route().to(method_not_allowed)),
    );
}
