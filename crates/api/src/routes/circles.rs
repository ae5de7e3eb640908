//! Circle routes: upsert, read-through lookup, and stats.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{CircleResponse, CircleStatsResponse, UpsertCircleRequest, UpsertCircleResponse};
use persistence::entities::CircleEntity;
use persistence::repositories::{CircleRepository, StatsRepository};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_upsert;
use crate::services::reconcile::CircleReconciler;

pub(crate) fn circle_to_response(entity: CircleEntity) -> CircleResponse {
    CircleResponse {
        id: entity.id,
        name: entity.name,
        owner: entity.owner,
        wallet_key: entity.wallet_key,
        tx_hash: entity.tx_hash,
        created_at: entity.created_at,
    }
}

/// POST /circles/upsert
///
/// Merges a candidate circle into the cache after the client has confirmed
/// the corresponding ledger write. Idempotent.
pub async fn upsert_circle(
    State(state): State<AppState>,
    Json(request): Json<UpsertCircleRequest>,
) -> Result<Json<UpsertCircleResponse>, ApiError> {
    let request = request.normalized();
    request.validate()?;

    let repo = CircleRepository::new(state.pool.clone());
    let entity = repo
        .upsert(
            request.id,
            &request.name,
            &request.owner,
            request.wallet_key.as_deref(),
            request.tx_hash.as_deref(),
        )
        .await?;
    record_upsert("circle");

    info!(circle_id = entity.id, "Upserted circle");

    Ok(Json(UpsertCircleResponse {
        ok: true,
        id: entity.id,
        circle: circle_to_response(entity),
    }))
}

/// GET /circles/:id
///
/// Read-through lookup: cache first, one ledger fallback on a miss.
/// Absence everywhere yields a JSON `null`, not an error.
pub async fn get_circle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Option<CircleResponse>>, ApiError> {
    let reconciler = CircleReconciler::new(state.pool.clone(), state.ledger.clone());
    let circle = reconciler.get_circle(id).await?;
    Ok(Json(circle.map(circle_to_response)))
}

/// GET /circles/:id/stats
pub async fn get_circle_stats(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CircleStatsResponse>, ApiError> {
    let reconciler = CircleReconciler::new(state.pool.clone(), state.ledger.clone());
    if reconciler.get_circle(id).await?.is_none() {
        return Err(ApiError::NotFound("Circle not found".into()));
    }

    let totals = StatsRepository::new(state.pool.clone())
        .circle_totals(id)
        .await?;
    Ok(Json(CircleStatsResponse::from_totals(
        totals.total_tasks,
        totals.completed_tasks,
        totals.member_count,
    )))
}
