use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pickem_league::api::OddsApiClient;
use pickem_league::engine::{GradingReport, OddsReconciler, PointsTable, ReconciliationReport, ResultService};
use pickem_league::models::Sport;
use pickem_league::store::{MemoryStore, Store};
use pickem_league::{Config, PickemError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
struct AppState {
    reconciler: Arc<OddsReconciler>,
    results: Arc<ResultService>,
    sport: Sport,
}

#[derive(Deserialize)]
struct ResultBody {
    home_score: i32,
    away_score: i32,
}

/// POST /api/admin/odds/update
async fn update_odds(State(state): State<AppState>) -> Json<ReconciliationReport> {
    Json(state.reconciler.reconcile(state.sport).await)
}

/// POST /api/admin/games/:id/results
async fn submit_result(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(body): Json<ResultBody>,
) -> Result<Json<GradingReport>, (StatusCode, Json<serde_json::Value>)> {
    match state
        .results
        .submit_game_result(game_id, body.home_score, body.away_score)
        .await
    {
        Ok(report) => Ok(Json(report)),
        Err(e) => {
            let status = match &e {
                PickemError::GameNotFound(_) => StatusCode::NOT_FOUND,
                PickemError::AlreadyFinished(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(json!({ "error": e.to_string() }))))
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "service": "pickem-league",
        "status": "ok",
        "sport": state.sport.to_string(),
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;

    // Collaborators are constructed once here and shared by reference;
    // nothing in the library reaches for globals
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let feed = Arc::new(OddsApiClient::new(
        config.odds_api_url.clone(),
        config.odds_api_key.clone(),
    )?);
    let reconciler = Arc::new(OddsReconciler::new(feed, store.clone()));
    let results = Arc::new(ResultService::new(store, PointsTable::default()));

    // Recurring ingestion: startup run, hourly baseline, game-day cadence
    scheduler_handles(&config, reconciler.clone());

    let state = AppState {
        reconciler,
        results,
        sport: config.sport,
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/admin/odds/update", post(update_odds))
        .route("/api/admin/games/:id/results", post(submit_result))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Pick'em admin surface listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn scheduler_handles(config: &Config, reconciler: Arc<OddsReconciler>) {
    pickem_league::scheduler::spawn(
        reconciler,
        config.sport,
        Duration::from_secs(config.ingest_interval_secs),
        Duration::from_secs(config.game_day_interval_secs),
    );
}
