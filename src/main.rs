use axum::{
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use wavecoach_api::{config, database, handlers, locale, middleware, validation};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting wavecoach API in {:?} mode", config.environment);

    // Fail fast on configuration faults: the schema registry must build and
    // every surfaced enum value must be localized in every bundle.
    let registry = validation::registry();
    locale::catalog()
        .verify()
        .unwrap_or_else(|e| panic!("locale configuration fault: {e}"));
    tracing::info!(
        schemas = registry.names().count(),
        "validation registry and locale catalog verified"
    );

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("WAVECOACH_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("wavecoach API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(handlers::public::auth::login))
        // Protected admin API
        .merge(protected_routes())
        // Global middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

fn protected_routes() -> Router {
    use handlers::protected::{prompts, teams, waves};

    Router::new()
        .route(
            "/api/prompts/:key",
            get(prompts::prompt_get).put(prompts::prompt_put),
        )
        .route("/api/teams/:id", get(teams::team_get))
        .route("/api/teams/:id/waves", post(waves::wave_post))
        .route("/api/teams/:id/waves/:waveId", get(waves::wave_get))
        // The gate runs here, before any handler touches a payload.
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Wavecoach API",
            "version": version,
            "description": "Coaching/assessment backend (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "login": "/auth/login (public - token acquisition)",
                "prompts": "/api/prompts/:key (protected)",
                "teams": "/api/teams/:id (protected)",
                "waves": "/api/teams/:id/waves[/:waveId] (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
