//! Invitation routes: send, accept, and list.
//!
//! E-mail delivery is out of scope; the join URL in the send response is
//! the delivery mechanism.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::models::{
    AcceptInvitationRequest, AcceptInvitationResponse, InvitationResponse, InvitationSummary,
    ListInvitationsQuery, ListInvitationsResponse, SendInvitationRequest, SendInvitationResponse,
};
use persistence::entities::InvitationEntity;
use persistence::repositories::{
    calculate_expiration, generate_invitation_token, AcceptOutcome, CircleRepository,
    InvitationRepository,
};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::reconcile::CircleReconciler;

fn invitation_to_response(entity: InvitationEntity) -> InvitationResponse {
    let status = entity.derived_status();
    InvitationResponse {
        circle_id: entity.circle_id,
        email: entity.email,
        member_name: entity.member_name,
        inviter_name: entity.inviter_name,
        status,
        created_at: entity.created_at,
        expires_at: entity.expires_at,
        accepted_at: entity.accepted_at,
        accepted_address: entity.accepted_address,
    }
}

/// POST /invitations/send
///
/// Mints a single-use token for the circle. Fails with 404 when the circle
/// is unknown to both cache and ledger. The token appears only in this
/// response.
pub async fn send_invitation(
    State(state): State<AppState>,
    Json(request): Json<SendInvitationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = request.normalized();
    request.validate()?;

    let reconciler = CircleReconciler::new(state.pool.clone(), state.ledger.clone());
    let circle = reconciler
        .get_circle(request.circle_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Circle not found".into()))?;

    let token = generate_invitation_token();
    let days = request
        .expires_in_days
        .unwrap_or(state.config.invitations.expiration_days);
    let expires_at = calculate_expiration(days);

    let entity = InvitationRepository::new(state.pool.clone())
        .create(
            circle.id,
            &token,
            &request.email,
            &request.member_name,
            request.inviter_name.as_deref(),
            expires_at,
        )
        .await?;

    let join_url = format!(
        "{}/invite/{}",
        state.config.invitations.join_base_url.trim_end_matches('/'),
        token
    );

    info!(
        circle_id = circle.id,
        email = %entity.email,
        expires_at = %entity.expires_at,
        "Created invitation"
    );

    Ok((
        StatusCode::CREATED,
        Json(SendInvitationResponse {
            success: true,
            token,
            join_url,
            expires_at: entity.expires_at,
        }),
    ))
}

/// POST /invitations/:token/accept
///
/// Consumes the token and adds the accepting address as a member, in one
/// transaction. Repeat attempts on a consumed token are rejected, never
/// double-applied.
pub async fn accept_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<AcceptInvitationRequest>,
) -> Result<Json<AcceptInvitationResponse>, ApiError> {
    request.validate()?;
    let address = request.address.trim();

    let repo = InvitationRepository::new(state.pool.clone());
    match repo.accept(&token, address).await? {
        AcceptOutcome::Accepted(invitation) => {
            let circle_name = CircleRepository::new(state.pool.clone())
                .find_by_id(invitation.circle_id)
                .await?
                .map(|c| c.name)
                .unwrap_or_default();

            info!(
                circle_id = invitation.circle_id,
                address = %address,
                "Invitation accepted"
            );

            Ok(Json(AcceptInvitationResponse {
                success: true,
                circle_id: invitation.circle_id,
                circle_name,
                member_name: invitation.member_name,
            }))
        }
        AcceptOutcome::NotFound | AcceptOutcome::AlreadyAccepted => Err(ApiError::NotFound(
            "Invitation not found or already used".into(),
        )),
        AcceptOutcome::Expired => Err(ApiError::NotFound("Invitation expired".into())),
    }
}

/// GET /circles/:id/invitations
///
/// Lists a circle's invitations with derived statuses and summary counts.
/// Tokens are withheld.
pub async fn list_invitations(
    State(state): State<AppState>,
    Path(circle_id): Path<i64>,
    Query(query): Query<ListInvitationsQuery>,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    let repo = InvitationRepository::new(state.pool.clone());

    let entities = repo.list_by_circle(circle_id).await?;
    let (pending, accepted, expired) = repo.summary_counts(circle_id).await?;

    let invitations = entities
        .into_iter()
        .map(invitation_to_response)
        .filter(|inv| query.matches(inv.status))
        .collect();

    Ok(Json(ListInvitationsResponse {
        invitations,
        summary: InvitationSummary {
            pending,
            accepted,
            expired,
        },
    }))
}
