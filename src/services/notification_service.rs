use std::collections::BTreeMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;

use crate::{
    dto::notifications::{AffectedRows, NotificationQuery, UnreadSummary},
    entity::notifications::{
        ActiveModel as NotificationActive, Column, Entity as Notifications,
        Model as NotificationModel,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Notification,
    response::{ApiResponse, Meta},
    state::AppState,
    status::NotificationKind,
};

/// Add an entry to the admin inbox. Called after the triggering write has
/// committed, so a failure is only logged.
pub async fn notify(
    state: &AppState,
    kind: NotificationKind,
    title: &str,
    message: String,
    related_id: Option<i64>,
) {
    let active = NotificationActive {
        id: NotSet,
        kind: Set(kind.as_str().to_string()),
        title: Set(title.to_string()),
        message: Set(message),
        related_id: Set(related_id),
        is_read: Set(false),
        created_at: Set(Utc::now()),
    };
    if let Err(err) = active.insert(&state.orm).await {
        tracing::warn!(error = %err, kind = kind.as_str(), "notification insert failed");
    }
}

pub async fn list_notifications(
    state: &AppState,
    user: &AuthUser,
    query: NotificationQuery,
) -> AppResult<ApiResponse<Vec<Notification>>> {
    ensure_admin(user)?;
    let limit = query.limit.unwrap_or(50).clamp(1, 500);
    let items = Notifications::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .limit(limit)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(notification_from_entity)
        .collect();
    Ok(ApiResponse::list("Notifications", items))
}

pub async fn unread_summary(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UnreadSummary>> {
    ensure_admin(user)?;
    let unread = Notifications::find()
        .filter(Column::IsRead.eq(false))
        .all(&state.orm)
        .await?;

    let mut by_type: BTreeMap<String, u64> = BTreeMap::new();
    for item in &unread {
        *by_type.entry(item.kind.clone()).or_default() += 1;
    }

    Ok(ApiResponse::success(
        "Unread notifications",
        UnreadSummary {
            total_unread: unread.len() as u64,
            by_type,
        },
        Some(Meta::empty()),
    ))
}

pub async fn mark_read(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<Notification>> {
    ensure_admin(user)?;
    let existing = Notifications::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: NotificationActive = existing.into();
    active.is_read = Set(true);
    let updated = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Notification marked as read",
        notification_from_entity(updated),
        Some(Meta::empty()),
    ))
}

pub async fn mark_all_read(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AffectedRows>> {
    ensure_admin(user)?;
    let result = Notifications::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::IsRead.eq(false))
        .exec(&state.orm)
        .await?;
    Ok(ApiResponse::success(
        "All notifications marked as read",
        AffectedRows {
            count: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}

pub async fn delete_notification(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Notifications::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn clear_all(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<AffectedRows>> {
    ensure_admin(user)?;
    let result = Notifications::delete_many().exec(&state.orm).await?;
    tracing::info!(count = result.rows_affected, by = %user.username, "notifications cleared");
    Ok(ApiResponse::success(
        "Notifications cleared",
        AffectedRows {
            count: result.rows_affected,
        },
        Some(Meta::empty()),
    ))
}

fn notification_from_entity(model: NotificationModel) -> Notification {
    Notification {
        id: model.id,
        kind: model.kind,
        title: model.title,
        message: model.message,
        related_id: model.related_id,
        is_read: model.is_read,
        created_at: model.created_at,
    }
}
