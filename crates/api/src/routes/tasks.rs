//! Task routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{TaskPriority, TaskResponse, UpsertTaskRequest, UpsertTaskResponse};
use persistence::entities::TaskEntity;
use persistence::repositories::{TaskRepository, TaskUpsert};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::record_upsert;

pub(crate) fn task_to_response(entity: TaskEntity) -> TaskResponse {
    let payment_state = entity.payment_state();
    let priority_label = TaskPriority::from_value(entity.priority)
        .map(|p| p.label())
        .unwrap_or(TaskPriority::Medium.label())
        .to_string();

    TaskResponse {
        id: entity.id,
        circle_id: entity.circle_id,
        title: entity.title,
        description: entity.description,
        assigned_to: entity.assigned_to,
        created_by: entity.created_by,
        priority: entity.priority,
        priority_label,
        payment_amount: entity.payment_amount,
        request_money: entity.request_money,
        payment_state,
        payment_tx_hash: entity.payment_tx_hash,
        rejected: entity.rejected,
        completed: entity.completed,
        completed_by: entity.completed_by,
        completed_at: entity.completed_at,
        tx_hash: entity.tx_hash,
        created_at: entity.created_at,
    }
}

/// POST /tasks/upsert
///
/// Merges a candidate task into the cache. A whitespace-only assignee is
/// stored as unassigned; proof hashes are sticky and the rejection flag is
/// monotone.
pub async fn upsert_task(
    State(state): State<AppState>,
    Json(request): Json<UpsertTaskRequest>,
) -> Result<Json<UpsertTaskResponse>, ApiError> {
    let request = request.normalized();
    request.validate()?;

    let input = TaskUpsert {
        id: request.id,
        circle_id: request.circle_id,
        title: request.title.clone(),
        description: request.description.clone(),
        assigned_to: request.assigned_to.clone(),
        created_by: request.created_by.clone(),
        priority: request.priority_or_default(),
        payment_amount: request.payment_amount.clone(),
        request_money: request.request_money.unwrap_or(false),
        payment_tx_hash: request.payment_tx_hash.clone(),
        rejected: request.rejected,
        completed: request.completed,
        completed_by: request.completed_by.clone(),
        completed_at: request.completed_at,
        tx_hash: request.tx_hash.clone(),
    };

    let entity = TaskRepository::new(state.pool.clone()).upsert(&input).await?;
    record_upsert("task");

    info!(
        task_id = entity.id,
        circle_id = entity.circle_id,
        completed = entity.completed,
        "Upserted task"
    );

    Ok(Json(UpsertTaskResponse {
        ok: true,
        id: entity.id,
    }))
}

/// GET /circles/:id/tasks
///
/// Incomplete before complete, then priority descending, then newest first.
pub async fn get_circle_tasks(
    State(state): State<AppState>,
    Path(circle_id): Path<i64>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = TaskRepository::new(state.pool.clone())
        .list_by_circle(circle_id)
        .await?;
    Ok(Json(tasks.into_iter().map(task_to_response).collect()))
}
