use chrono::Utc;
use serde_json::Value;

use crate::{db::DbPool, error::AppResult, models::AuditEntry};

pub async fn log_audit(
    pool: &DbPool,
    actor: Option<&str>,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (actor, action, resource, metadata, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(actor)
    .bind(action)
    .bind(resource)
    .bind(metadata.map(|m| m.to_string()))
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Record an admin action; a failed write only warns.
pub async fn record(pool: &DbPool, actor: &str, action: &str, resource: &str, metadata: Value) {
    if let Err(err) = log_audit(pool, Some(actor), action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}

pub async fn recent_activity(pool: &DbPool, limit: i64) -> AppResult<Vec<AuditEntry>> {
    let rows = sqlx::query_as::<_, AuditEntry>(
        r#"
        SELECT actor, action, resource, created_at
        FROM audit_logs
        ORDER BY created_at DESC, id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
