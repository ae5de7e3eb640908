//! Member routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{MemberResponse, UpsertMemberRequest, UpsertMemberResponse};
use persistence::entities::MemberEntity;
use persistence::repositories::MemberRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_upsert;

pub(crate) fn member_to_response(entity: MemberEntity) -> MemberResponse {
    MemberResponse {
        circle_id: entity.circle_id,
        address: entity.address,
        name: entity.name,
        is_owner: entity.is_owner,
        tx_hash: entity.tx_hash,
        joined_at: entity.joined_at,
    }
}

/// POST /members/upsert
///
/// Merges a candidate member into the cache. The display name and tx hash
/// are sticky; the ownership flag always takes the newest write.
pub async fn upsert_member(
    State(state): State<AppState>,
    Json(request): Json<UpsertMemberRequest>,
) -> Result<Json<UpsertMemberResponse>, ApiError> {
    let request = request.normalized();
    request.validate()?;

    let repo = MemberRepository::new(state.pool.clone());
    let entity = repo
        .upsert(
            request.circle_id,
            &request.address,
            request.name.as_deref(),
            request.is_owner(),
            request.tx_hash.as_deref(),
        )
        .await?;
    record_upsert("member");

    info!(
        circle_id = entity.circle_id,
        address = %entity.address,
        "Upserted member"
    );

    Ok(Json(UpsertMemberResponse { ok: true }))
}

/// GET /circles/:id/members
///
/// Owner first, then by join order. An unknown circle yields an empty
/// array; clients distinguish "no members cached" from errors by status.
pub async fn get_circle_members(
    State(state): State<AppState>,
    Path(circle_id): Path<i64>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = MemberRepository::new(state.pool.clone())
        .list_by_circle(circle_id)
        .await?;
    Ok(Json(members.into_iter().map(member_to_response).collect()))
}
