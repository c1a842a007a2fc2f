use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, put},
};

use crate::{
    dto::notifications::{AffectedRows, NotificationQuery, UnreadSummary},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Notification,
    response::ApiResponse,
    services::notification_service,
    state::AppState,
};

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(list_notifications))
        .route("/notifications/unread", get(unread_summary))
        .route("/notifications/mark-all-read", put(mark_all_read))
        .route("/notifications/clear-all", delete(clear_all))
        .route("/notifications/{id}/read", put(mark_read))
        .route("/notifications/{id}", delete(delete_notification))
}

#[utoipa::path(
    get,
    path = "/admin/notifications",
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications, newest first", body = ApiResponse<Vec<Notification>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> AppResult<Json<ApiResponse<Vec<Notification>>>> {
    let resp = notification_service::list_notifications(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/notifications/unread",
    responses(
        (status = 200, description = "Unread counters by type", body = ApiResponse<UnreadSummary>),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn unread_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UnreadSummary>>> {
    let resp = notification_service::unread_summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/notifications/{id}/read",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Marked as read", body = ApiResponse<Notification>),
        (status = 404, description = "Notification not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Notification>>> {
    let resp = notification_service::mark_read(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/notifications/mark-all-read",
    responses(
        (status = 200, description = "Rows marked as read", body = ApiResponse<AffectedRows>),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AffectedRows>>> {
    let resp = notification_service::mark_all_read(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/notifications/{id}",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 404, description = "Notification not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = notification_service::delete_notification(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/notifications/clear-all",
    responses(
        (status = 200, description = "Rows deleted", body = ApiResponse<AffectedRows>),
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
pub async fn clear_all(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AffectedRows>>> {
    let resp = notification_service::clear_all(&state, &user).await?;
    Ok(Json(resp))
}
