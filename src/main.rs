use std::sync::Arc;

use actix_web::{middleware, web, App, HttpResponse, HttpServer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_backend::services::{
    GithubPublisher, HandleRegistry, HttpMailer, HttpSessionVerifier, HttpWardenDirectory,
    RegistrationService, RegistrationWindow,
};
use arena_backend::{handlers, AppState, Config};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "arena-backend"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "arena_backend=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");

    info!("Starting arena-backend on {}:{}", config.host, config.port);

    // Shared HTTP client for every external collaborator
    let http = reqwest::Client::builder()
        .user_agent("arena-backend")
        .build()
        .expect("Failed to build HTTP client");

    // Construct service handles once; the pipeline only borrows them
    let registry = Arc::new(HandleRegistry::new(config.handles_dir.clone()));
    let verifier = Arc::new(HttpSessionVerifier::new(
        http.clone(),
        config.auth_service_url.clone(),
    ));
    let publisher = Arc::new(GithubPublisher::new(http.clone(), &config));
    let directory = Arc::new(HttpWardenDirectory::new(
        http.clone(),
        config.user_directory_url.clone(),
        config.user_directory_key.clone(),
    ));
    let mailer = Arc::new(HttpMailer::new(
        http,
        config.mail_api_url.clone(),
        config.mail_api_key.clone(),
        config.mail_from.clone(),
    ));

    let registration = Arc::new(RegistrationService::new(
        registry.clone(),
        verifier,
        publisher,
        directory,
        mailer,
        RegistrationWindow {
            start: config.registration_start,
            end: config.registration_end,
        },
    ));

    info!(
        "Registration window: [{}, {})",
        config.registration_start, config.registration_end
    );

    let server_addr = format!("{}:{}", config.host, config.port);

    let app_state = web::Data::new(AppState {
        config,
        registry,
        registration,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            // Avatars arrive base64-encoded in the JSON body
            .app_data(web::JsonConfig::default().limit(10 * 1024 * 1024))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/v1")
                    .configure(handlers::configure_bot_routes)
                    .configure(handlers::configure_team_routes),
            )
    })
    .bind(&server_addr)?
    .run()
    .await
}
