use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, post},
};

use crate::{
    dto::inbox::{
        ContactRequest, JobApplicationRequest, NewsletterSendReport, NewsletterSendRequest,
        SubscribeRequest, SubscribeResponse,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{ContactMessage, JobApplication, NewsletterSubscriber},
    response::ApiResponse,
    services::inbox_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit_contact))
        .route("/newsletter/subscribe", post(subscribe))
        .route("/jobs/apply", post(apply_for_job))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts))
        .route("/contacts/{id}", delete(delete_contact))
        .route("/newsletter/subscribers", get(list_subscribers))
        .route("/newsletter/subscribers/{id}", delete(remove_subscriber))
        .route("/newsletter/send", post(send_newsletter))
        .route("/job-applications", get(list_job_applications))
        .route("/job-applications/{id}", delete(delete_job_application))
}

#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Message stored", body = ApiResponse<ContactMessage>),
        (status = 400, description = "Missing field or invalid email"),
    ),
    tag = "Inbox"
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> AppResult<Json<ApiResponse<ContactMessage>>> {
    let resp = inbox_service::submit_contact(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/newsletter/subscribe",
    request_body = SubscribeRequest,
    responses(
        (status = 200, description = "Subscribed, reactivated or already subscribed", body = ApiResponse<SubscribeResponse>),
        (status = 400, description = "Invalid email"),
    ),
    tag = "Inbox"
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(payload): Json<SubscribeRequest>,
) -> AppResult<Json<ApiResponse<SubscribeResponse>>> {
    let resp = inbox_service::subscribe(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/jobs/apply",
    request_body = JobApplicationRequest,
    responses(
        (status = 200, description = "Application stored", body = ApiResponse<JobApplication>),
        (status = 400, description = "Missing field or invalid email"),
    ),
    tag = "Inbox"
)]
pub async fn apply_for_job(
    State(state): State<AppState>,
    Json(payload): Json<JobApplicationRequest>,
) -> AppResult<Json<ApiResponse<JobApplication>>> {
    let resp = inbox_service::apply_for_job(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/contacts",
    responses(
        (status = 200, description = "Latest contact messages", body = ApiResponse<Vec<ContactMessage>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<ContactMessage>>>> {
    let resp = inbox_service::list_contacts(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/contacts/{id}",
    params(
        ("id" = i64, Path, description = "Message ID")
    ),
    responses(
        (status = 200, description = "Message deleted"),
        (status = 404, description = "Message not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = inbox_service::delete_contact(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/newsletter/subscribers",
    responses(
        (status = 200, description = "Active subscribers", body = ApiResponse<Vec<NewsletterSubscriber>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_subscribers(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<NewsletterSubscriber>>>> {
    let resp = inbox_service::list_subscribers(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/newsletter/subscribers/{id}",
    params(
        ("id" = i64, Path, description = "Subscriber ID")
    ),
    responses(
        (status = 200, description = "Subscriber deactivated"),
        (status = 404, description = "Subscriber not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn remove_subscriber(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = inbox_service::remove_subscriber(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/newsletter/send",
    request_body = NewsletterSendRequest,
    responses(
        (status = 200, description = "Delivery report", body = ApiResponse<NewsletterSendReport>),
        (status = 400, description = "Missing subject or content"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn send_newsletter(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<NewsletterSendRequest>,
) -> AppResult<Json<ApiResponse<NewsletterSendReport>>> {
    let resp = inbox_service::send_newsletter(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/job-applications",
    responses(
        (status = 200, description = "Latest job applications", body = ApiResponse<Vec<JobApplication>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_job_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<JobApplication>>>> {
    let resp = inbox_service::list_job_applications(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/job-applications/{id}",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application deleted"),
        (status = 404, description = "Application not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_job_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = inbox_service::delete_job_application(&state, &user, id).await?;
    Ok(Json(resp))
}
