use actix_web::{web, HttpResponse};

use crate::error::AppError;
use crate::AppState;

/// GET /v1/wardens/{handle}/teams
///
/// List the team records the given warden belongs to. 204 when the
/// warden is on no team.
pub async fn get_warden_teams(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let handle = path.into_inner();

    let teams = state
        .registry
        .teams_for(&handle)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if teams.is_empty() {
        Ok(HttpResponse::NoContent().finish())
    } else {
        Ok(HttpResponse::Ok().json(teams))
    }
}

async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed { allow: "GET" })
}

/// Configure warden team lookup routes
pub fn configure_team_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/wardens/{handle}/teams")
            .route(web::get().to(get_warden_teams))
            .default_service(web::route().to(method_not_allowed)),
    );
}
