use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::models::{ScanLogRow, TeamStreakRecord};
use crate::db::store;
use crate::error::AppError;
use crate::orchestrator::{BatchSummary, ScanReport, Scanner};
use crate::scheduler::ScanMode;

#[derive(Clone)]
pub struct ApiState {
    pub pool: sqlx::SqlitePool,
    pub scanner: Arc<Scanner>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/scan", post(trigger_scan))
        .route("/scan/all", post(trigger_scan_all))
        .route("/teams", get(get_teams))
        .route("/scans/recent", get(get_recent_scans))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ScanQuery {
    /// Operator override: provider competition code, bypasses the scheduler.
    pub competition: Option<String>,
    /// Selection mode: "priority" (default, tiered ordering) or "auto"
    /// (tier-blind oldest-first). An explicit `competition` always wins.
    pub mode: Option<String>,
}

#[derive(Deserialize)]
pub struct TeamsQuery {
    /// Return every stored team instead of qualifying teams only.
    pub all: Option<bool>,
}

#[derive(Deserialize)]
pub struct RecentScansQuery {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TeamsResponse {
    pub success: bool,
    pub count: usize,
    pub teams: Vec<TeamStreakRecord>,
}

#[derive(Serialize)]
pub struct RecentScansResponse {
    pub success: bool,
    pub count: usize,
    pub scans: Vec<ScanLogRow>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// Single-competition scan. Scheduler picks the target unless the query names
/// one; a provider failure surfaces here as the sole error.
async fn trigger_scan(
    State(state): State<ApiState>,
    Query(params): Query<ScanQuery>,
) -> Result<Json<ScanReport>, AppError> {
    let mode = ScanMode::parse(params.mode.as_deref());
    let report = state
        .scanner
        .scan_one(params.competition.as_deref(), mode)
        .await?;
    Ok(Json(report))
}

/// Budget-bounded batch scan over the whole catalog. Always returns 200 with
/// partial counts; per-competition failures are inside the result list.
async fn trigger_scan_all(State(state): State<ApiState>) -> Json<BatchSummary> {
    Json(state.scanner.scan_all().await)
}

async fn get_teams(
    State(state): State<ApiState>,
    Query(params): Query<TeamsQuery>,
) -> Result<Json<TeamsResponse>, AppError> {
    let qualified_only = !params.all.unwrap_or(false);
    let teams = store::teams(&state.pool, qualified_only).await?;
    Ok(Json(TeamsResponse {
        success: true,
        count: teams.len(),
        teams,
    }))
}

async fn get_recent_scans(
    State(state): State<ApiState>,
    Query(params): Query<RecentScansQuery>,
) -> Result<Json<RecentScansResponse>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 500);
    let scans = store::recent_scans(&state.pool, limit).await?;
    Ok(Json(RecentScansResponse {
        success: true,
        count: scans.len(),
        scans,
    }))
}
