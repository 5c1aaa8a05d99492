use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use skill_matrix::{
    graceful_shutdown::stop_on_signal,
    routes::configure_routes,
    settings::AppConfig,
    storage::open_store,
    telemetry::init_tracing,
    AppState,
};

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::new().context("Configuration error")?;
    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let store = open_store(&config)
        .await
        .context("Failed to open record store")?;

    let app_state = web::Data::new(AppState::new(config.clone(), store));
    if let Some(user) = app_state.restore_session().await {
        tracing::info!(user_id = %user.id, "Resumed session for {}", user.name);
    }

    let server_addr = config.server_addr();

    tracing::info!(
        "Starting Skill Matrix API v{} on {} ({} workers)",
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.worker_count
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&app_state.config))
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {}", server_addr))?
    .run();

    tokio::spawn(stop_on_signal(server.handle()));

    server.await?;
    tracing::info!("Server stopped");
    Ok(())
}
