use std::sync::{Arc, Mutex};

use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use lumiere::catalog;
use lumiere::clock::SystemClock;
use lumiere::config::AppConfig;
use lumiere::db;
use lumiere::handlers;
use lumiere::rng::ThreadRngSource;
use lumiere::services::notify::ConsoleSink;
use lumiere::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    tracing::info!(
        services = catalog::services().len(),
        stylists = catalog::stylists().len(),
        "catalog seeded"
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        clock: Box::new(SystemClock),
        rng: Box::new(ThreadRngSource),
        notifier: Box::new(ConsoleSink),
        flow: Mutex::new(None),
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/services", get(handlers::catalog::get_services))
        .route("/api/stylists", get(handlers::catalog::get_stylists))
        .route("/api/otp", post(handlers::otp::request_code))
        .route("/api/otp/verify", post(handlers::otp::verify_code))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/:id/status",
            patch(handlers::bookings::update_status),
        )
        .route("/api/admin/login", post(handlers::admin::login))
        .route("/api/admin/logout", post(handlers::admin::logout))
        .route("/api/admin/session", get(handlers::admin::get_session))
        .route("/api/admin/stats", get(handlers::admin::get_stats))
        .route(
            "/api/booking-flow",
            post(handlers::flow::start_flow)
                .get(handlers::flow::get_flow)
                .delete(handlers::flow::abandon_flow),
        )
        .route(
            "/api/booking-flow/service",
            post(handlers::flow::select_service),
        )
        .route(
            "/api/booking-flow/stylist",
            post(handlers::flow::select_stylist),
        )
        .route(
            "/api/booking-flow/schedule",
            post(handlers::flow::select_schedule),
        )
        .route(
            "/api/booking-flow/details",
            post(handlers::flow::enter_details),
        )
        .route("/api/booking-flow/back", post(handlers::flow::go_back))
        .route("/api/booking-flow/resend", post(handlers::flow::resend_code))
        .route("/api/booking-flow/confirm", post(handlers::flow::confirm))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
