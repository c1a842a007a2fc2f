//! Contact messages, newsletter subscribers and job applications.

use chrono::Utc;

use crate::{
    audit,
    dto::inbox::{
        ContactRequest, JobApplicationRequest, NewsletterSendReport, NewsletterSendRequest,
        SubscribeRequest, SubscribeResponse,
    },
    error::{AppError, AppResult},
    mailer,
    middleware::auth::{AuthUser, ensure_admin},
    models::{ContactMessage, JobApplication, NewsletterSubscriber},
    response::{ApiResponse, Meta},
    services::{notification_service, require_email, require_text},
    state::AppState,
    status::NotificationKind,
};

const ADMIN_LIST_LIMIT: i64 = 50;

pub async fn submit_contact(
    state: &AppState,
    payload: ContactRequest,
) -> AppResult<ApiResponse<ContactMessage>> {
    require_text(&payload.name, "name")?;
    require_email(&payload.email)?;
    require_text(&payload.subject, "subject")?;
    require_text(&payload.message, "message")?;

    let message = sqlx::query_as::<_, ContactMessage>(
        r#"
        INSERT INTO contact_messages (name, email, subject, message, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(payload.subject.trim())
    .bind(payload.message.trim())
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    notification_service::notify(
        state,
        NotificationKind::Contact,
        "Nuevo mensaje de contacto",
        format!("{} ({}): {}", message.name, message.email, message.subject),
        Some(message.id),
    )
    .await;

    mailer::deliver(
        state.mailer.as_ref(),
        mailer::contact_admin_alert(
            &state.config.admin_email,
            &message.name,
            &message.email,
            &message.subject,
            &message.message,
        ),
    )
    .await;

    Ok(ApiResponse::success("Message received", message, Some(Meta::empty())))
}

pub async fn list_contacts(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<ContactMessage>>> {
    ensure_admin(user)?;
    let items = sqlx::query_as::<_, ContactMessage>(
        "SELECT * FROM contact_messages ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(ADMIN_LIST_LIMIT)
    .fetch_all(&state.pool)
    .await?;
    Ok(ApiResponse::list("Contacts", items))
}

pub async fn delete_contact(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    delete_row(state, user, "contact_messages", "contact_delete", id).await
}

/// Subscribing is idempotent: an active address is left alone and an
/// inactive one is switched back on.
pub async fn subscribe(
    state: &AppState,
    payload: SubscribeRequest,
) -> AppResult<ApiResponse<SubscribeResponse>> {
    require_email(&payload.email)?;
    let email = payload.email.trim().to_lowercase();
    let name = payload.name.filter(|n| !n.trim().is_empty());

    let existing = sqlx::query_as::<_, NewsletterSubscriber>(
        "SELECT * FROM newsletter_subscribers WHERE email = $1",
    )
    .bind(email.as_str())
    .fetch_optional(&state.pool)
    .await?;

    match existing {
        Some(subscriber) if subscriber.active => Ok(ApiResponse::success(
            "Already subscribed",
            SubscribeResponse {
                email,
                already_subscribed: true,
                reactivated: false,
            },
            Some(Meta::empty()),
        )),
        Some(subscriber) => {
            sqlx::query(
                "UPDATE newsletter_subscribers SET active = 1, name = COALESCE($2, name), subscribed_at = $3 WHERE id = $1",
            )
            .bind(subscriber.id)
            .bind(name.as_deref())
            .bind(Utc::now())
            .execute(&state.pool)
            .await?;
            tracing::info!(email = %email, "newsletter subscription reactivated");

            Ok(ApiResponse::success(
                "Subscription reactivated",
                SubscribeResponse {
                    email,
                    already_subscribed: false,
                    reactivated: true,
                },
                Some(Meta::empty()),
            ))
        }
        None => {
            let subscriber = sqlx::query_as::<_, NewsletterSubscriber>(
                r#"
                INSERT INTO newsletter_subscribers (email, name, subscribed_at, active)
                VALUES ($1, $2, $3, 1)
                RETURNING *
                "#,
            )
            .bind(email.as_str())
            .bind(name.as_deref())
            .bind(Utc::now())
            .fetch_one(&state.pool)
            .await?;

            notification_service::notify(
                state,
                NotificationKind::Newsletter,
                "Nueva suscripción al newsletter",
                format!(
                    "{} ({})",
                    subscriber.email,
                    subscriber.name.as_deref().unwrap_or("sin nombre")
                ),
                Some(subscriber.id),
            )
            .await;

            let cafe = &state.config.business.name;
            mailer::deliver(
                state.mailer.as_ref(),
                mailer::newsletter_welcome(cafe, &subscriber.email, subscriber.name.as_deref()),
            )
            .await;
            mailer::deliver(
                state.mailer.as_ref(),
                mailer::newsletter_admin_alert(
                    &state.config.admin_email,
                    &subscriber.email,
                    subscriber.name.as_deref(),
                ),
            )
            .await;

            Ok(ApiResponse::success(
                "Subscribed",
                SubscribeResponse {
                    email,
                    already_subscribed: false,
                    reactivated: false,
                },
                Some(Meta::empty()),
            ))
        }
    }
}

pub async fn list_subscribers(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<NewsletterSubscriber>>> {
    ensure_admin(user)?;
    let items = active_subscribers(state).await?;
    Ok(ApiResponse::list("Subscribers", items))
}

async fn active_subscribers(state: &AppState) -> AppResult<Vec<NewsletterSubscriber>> {
    let items = sqlx::query_as::<_, NewsletterSubscriber>(
        "SELECT * FROM newsletter_subscribers WHERE active = 1 ORDER BY subscribed_at DESC, id DESC",
    )
    .fetch_all(&state.pool)
    .await?;
    Ok(items)
}

/// Deactivates rather than deleting, so the address can re-subscribe.
pub async fn remove_subscriber(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = sqlx::query("UPDATE newsletter_subscribers SET active = 0 WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        &user.username,
        "subscriber_deactivate",
        "newsletter_subscribers",
        serde_json::json!({ "subscriber_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Subscriber removed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn send_newsletter(
    state: &AppState,
    user: &AuthUser,
    payload: NewsletterSendRequest,
) -> AppResult<ApiResponse<NewsletterSendReport>> {
    ensure_admin(user)?;
    require_text(&payload.subject, "subject")?;
    require_text(&payload.content, "content")?;

    let subscribers = active_subscribers(state).await?;
    if subscribers.is_empty() {
        return Ok(ApiResponse::success(
            "No active subscribers",
            NewsletterSendReport {
                success: false,
                sent: 0,
                failed: 0,
                total: 0,
            },
            Some(Meta::empty()),
        ));
    }

    let cafe = &state.config.business.name;
    let mut sent = 0;
    for subscriber in &subscribers {
        let mail = mailer::newsletter_issue(
            cafe,
            &subscriber.email,
            subscriber.name.as_deref(),
            &payload.subject,
            &payload.content,
        );
        if mailer::deliver(state.mailer.as_ref(), mail).await {
            sent += 1;
        }
    }
    let total = subscribers.len();

    audit::record(
        &state.pool,
        &user.username,
        "newsletter_send",
        "newsletter_subscribers",
        serde_json::json!({ "subject": payload.subject, "sent": sent, "total": total }),
    )
    .await;

    Ok(ApiResponse::success(
        "Newsletter sent",
        NewsletterSendReport {
            success: true,
            sent,
            failed: total - sent,
            total,
        },
        Some(Meta::empty()),
    ))
}

pub async fn apply_for_job(
    state: &AppState,
    payload: JobApplicationRequest,
) -> AppResult<ApiResponse<JobApplication>> {
    require_text(&payload.name, "name")?;
    require_email(&payload.email)?;
    require_text(&payload.phone, "phone")?;
    require_text(&payload.position, "position")?;

    let application = sqlx::query_as::<_, JobApplication>(
        r#"
        INSERT INTO job_applications
            (name, email, phone, position, experience, motivation, cv_filename, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(payload.name.trim())
    .bind(payload.email.trim())
    .bind(payload.phone.trim())
    .bind(payload.position.trim())
    .bind(payload.experience)
    .bind(payload.motivation)
    .bind(payload.cv_filename.filter(|f| !f.is_empty()))
    .bind(Utc::now())
    .fetch_one(&state.pool)
    .await?;

    tracing::info!(application_id = application.id, position = %application.position, "job application received");

    mailer::deliver(
        state.mailer.as_ref(),
        mailer::job_admin_alert(&state.config.admin_email, &application),
    )
    .await;
    mailer::deliver(
        state.mailer.as_ref(),
        mailer::job_confirmation(&state.config.business.name, &application),
    )
    .await;

    Ok(ApiResponse::success(
        "Application received",
        application,
        Some(Meta::empty()),
    ))
}

pub async fn list_job_applications(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<JobApplication>>> {
    ensure_admin(user)?;
    let items = sqlx::query_as::<_, JobApplication>(
        "SELECT * FROM job_applications ORDER BY created_at DESC, id DESC LIMIT $1",
    )
    .bind(ADMIN_LIST_LIMIT)
    .fetch_all(&state.pool)
    .await?;
    Ok(ApiResponse::list("Job applications", items))
}

pub async fn delete_job_application(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    delete_row(state, user, "job_applications", "job_application_delete", id).await
}

async fn delete_row(
    state: &AppState,
    user: &AuthUser,
    table: &'static str,
    action: &str,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query(&format!("DELETE FROM {table} WHERE id = $1"))
        .bind(id)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        &user.username,
        action,
        table,
        serde_json::json!({ "id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
