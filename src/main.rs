use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, patch, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use trainer_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    routes, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let public_api = Router::new()
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .route(
            "/api/auth/forgot-password",
            post(routes::auth::forgot_password),
        )
        .route(
            "/api/auth/reset-password",
            post(routes::auth::reset_password),
        )
        .route("/api/tests", get(routes::tests::list_tests))
        .route("/api/tests/:slug", get(routes::tests::get_test))
        .route("/api/lectures", get(routes::lectures::list_lectures))
        .route("/api/lectures/:slug", get(routes::lectures::get_lecture))
        .layer(axum::middleware::from_fn_with_state(
            trainer_backend::middleware::rate_limit::new_rps_state(config.public_rps),
            trainer_backend::middleware::rate_limit::rps_middleware,
        ));

    let user_api = Router::new()
        .route("/api/auth/me", get(routes::auth::me))
        .route("/api/tests/:slug/start", post(routes::tests::start_test))
        .route("/api/marathon", post(routes::marathon::create_marathon))
        .route("/api/attempts/:id", get(routes::marathon::get_attempt))
        .route(
            "/api/attempts/:id/submit",
            post(routes::marathon::submit_attempt),
        )
        .route("/api/results", get(routes::results::list_results))
        .route("/api/results/stats", get(routes::results::get_stats))
        .route("/api/results/:id", get(routes::results::get_result))
        .route(
            "/api/lists",
            get(routes::lists::list_lists).post(routes::lists::create_list),
        )
        .route(
            "/api/lists/:id",
            patch(routes::lists::rename_list).delete(routes::lists::delete_list),
        )
        .route(
            "/api/lists/:id/tests",
            post(routes::lists::add_test_to_list),
        )
        .route(
            "/api/lists/:id/tests/:test_id",
            delete(routes::lists::remove_test_from_list),
        )
        .route("/api/pomodoro", post(routes::pomodoro::start_session))
        .route(
            "/api/pomodoro/:id/complete",
            post(routes::pomodoro::complete_session),
        )
        .route("/api/pomodoro/stats", get(routes::pomodoro::stats))
        .layer(axum::middleware::from_fn(
            trainer_backend::middleware::auth::require_bearer_auth,
        ))
        .layer(axum::middleware::from_fn_with_state(
            trainer_backend::middleware::rate_limit::new_rps_state(config.api_rps),
            trainer_backend::middleware::rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(public_api)
        .merge(user_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
