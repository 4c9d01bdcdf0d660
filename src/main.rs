use std::sync::Arc;

use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::http::header;
use actix_web::{middleware, web, App, HttpServer};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};

use nextone_lms_backend::config::{AppConfig, ServerConfig};
use nextone_lms_backend::db::Database;
use nextone_lms_backend::middlewares::error_envelope;
use nextone_lms_backend::repositories::users::UserRepository;
use nextone_lms_backend::routes::configure_all_routes;
use nextone_lms_backend::services::mail::transport_from_config;
use nextone_lms_backend::state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 Starting NextOne LMS backend...");

    let config = AppConfig::from_env();
    info!("Environment: {:?}", config.environment);

    let state = match build_state(&config).await {
        Ok(state) => web::Data::new(state),
        Err(e) => {
            error!("Startup failed: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    info!("✅ Services initialized");

    start_http_server(config, state).await
}

async fn build_state(config: &AppConfig) -> Result<AppState, String> {
    info!("📡 Connecting to MongoDB...");
    let database = Database::connect(&config.database)
        .await
        .map_err(|e| format!("MongoDB connection failed: {}", e))?;

    let users = UserRepository::new(&database);
    users
        .create_indexes()
        .await
        .map_err(|e| format!("User index creation failed: {}", e))?;

    let transport = transport_from_config(&config.mail).map_err(|e| e.to_string())?;

    Ok(AppState::new(config, database, Arc::new(users), transport))
}

async fn start_http_server(config: AppConfig, state: web::Data<AppState>) -> std::io::Result<()> {
    let bind_address = config.server.bind_address();
    let global_prefix = config.server.global_prefix.clone();

    info!("🌐 Listening on http://{}", bind_address);
    info!("📍 Health check: http://{}{}/health", bind_address, global_prefix);

    let rate_limit = &config.rate_limit;
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit.per_second)
        .burst_size(rate_limit.burst_size)
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Invalid rate limit configuration"))?;

    info!(
        "🛡️ Rate limiting: {} req/s, burst {}",
        rate_limit.per_second, rate_limit.burst_size
    );

    let server_config = config.server.clone();

    HttpServer::new(move || {
        let prefix = global_prefix.clone();

        App::new()
            .app_data(state.clone())
            .wrap(Governor::new(&governor_conf))
            .wrap(middleware::NormalizePath::trim())
            .wrap(error_envelope())
            .wrap(configure_cors(&server_config))
            .wrap(middleware::Logger::default())
            .configure(move |cfg| configure_all_routes(cfg, &prefix))
    })
    .bind(bind_address)?
    .workers(config.server.workers)
    .run()
    .await
}

fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod loaded"),
            Err(e) => error!(".env.prod load failed: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev loaded"),
            Err(e) => error!(".env.dev load failed: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("Default .env loaded");
        }
    }
}

fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=info"));
}

fn configure_cors(server: &ServerConfig) -> Cors {
    server
        .cors_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}
