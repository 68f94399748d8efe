use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pill_identifier_engine::{EngineConfig, IdentifyResponse, PillEngine, PillEngineError, PillQuery};

#[derive(Clone)]
struct AppState {
    engine: Arc<PillEngine>,
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Serialize)]
struct SuggestResponse {
    suggestions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    store: StoreStatsDto,
}

#[derive(Debug, Serialize)]
struct StoreStatsDto {
    total_pills: u64,
    distinct_imprints: u64,
    last_added: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pill_engine_server=debug,pill_identifier_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = EngineConfig::from_env();

    tracing::info!("Starting Pill Identifier Engine Server");
    tracing::info!("Database: {}", config.db_path);
    tracing::info!("Port: {}", config.port);

    let engine = PillEngine::from_config(&config).await?;

    let state = AppState {
        engine: Arc::new(engine),
    };

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/identify", post(identify_handler))
        .route("/api/suggest", get(suggest_handler))
        .route("/v1/stats", get(stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: pill_identifier_engine::VERSION.to_string(),
    })
}

async fn identify_handler(
    State(state): State<AppState>,
    Json(query): Json<PillQuery>,
) -> Result<Json<IdentifyResponse>, AppError> {
    tracing::debug!("Identify request: {:?}", query);

    let response = state.engine.identify(query).await?;

    Ok(Json(response))
}

async fn suggest_handler(
    State(state): State<AppState>,
    Query(params): Query<SuggestParams>,
) -> Json<SuggestResponse> {
    let suggestions = state.engine.suggest(&params.q).await;
    Json(SuggestResponse { suggestions })
}

async fn stats_handler(
    State(state): State<AppState>,
) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.engine.store_stats().await?;

    Ok(Json(StatsResponse {
        store: StoreStatsDto {
            total_pills: stats.total_pills,
            distinct_imprints: stats.distinct_imprints,
            last_added: stats.last_added.map(|t| t.to_rfc3339()),
        },
    }))
}

// Error handling
struct AppError(PillEngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            PillEngineError::NoImprint => (StatusCode::BAD_REQUEST, "NO_IMPRINT"),
            PillEngineError::NoMatches(_) => (StatusCode::NOT_FOUND, "NO_MATCHES"),
            PillEngineError::Provider { .. } => (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "SERVER_ERROR"),
        };
        let message = self.0.to_string();

        if status.is_server_error() {
            tracing::error!("{} - {}", status, message);
        } else {
            tracing::info!("{} - {}", status, message);
        }

        (status, Json(ErrorResponse { error: code, message })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<PillEngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
