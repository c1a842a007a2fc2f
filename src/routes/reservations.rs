use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post, put},
};

use crate::{
    dto::reservations::{
        CreateReservationRequest, ReservationStats, UpdateReservationRequest,
        UpdateReservationStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Availability, Reservation},
    response::ApiResponse,
    services::reservation_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create_reservation))
        .route("/reservations/availability/{date}", get(availability))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/reservations", get(list_reservations))
        .route("/reservations/stats", get(reservation_stats))
        .route(
            "/reservations/{id}",
            put(update_reservation).delete(delete_reservation),
        )
        .route("/reservations/{id}/status", put(update_reservation_status))
}

#[utoipa::path(
    get,
    path = "/reservations/availability/{date}",
    params(
        ("date" = String, Path, description = "Date as YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Slots for the day with their load", body = ApiResponse<Availability>),
        (status = 400, description = "Invalid date"),
    ),
    tag = "Reservations"
)]
pub async fn availability(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> AppResult<Json<ApiResponse<Availability>>> {
    let resp = reservation_service::availability(&state, &date).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation booked", body = ApiResponse<Reservation>),
        (status = 400, description = "Invalid slot, past time or party size"),
        (status = 409, description = "Booking window is full"),
    ),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(payload): Json<CreateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::create_reservation(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/reservations",
    responses(
        (status = 200, description = "Reservations, latest date first", body = ApiResponse<Vec<Reservation>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<Reservation>>>> {
    let resp = reservation_service::list_reservations(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/reservations/stats",
    responses(
        (status = 200, description = "Reservation counters", body = ApiResponse<ReservationStats>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reservation_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ReservationStats>>> {
    let resp = reservation_service::reservation_stats(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/reservations/{id}",
    params(
        ("id" = i64, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservationRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<Reservation>),
        (status = 404, description = "Reservation not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateReservationRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::update_reservation(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/reservations/{id}/status",
    params(
        ("id" = i64, Path, description = "Reservation ID")
    ),
    request_body = UpdateReservationStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Reservation>),
        (status = 400, description = "Unknown status"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_reservation_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateReservationStatusRequest>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::update_reservation_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/reservations/{id}",
    params(
        ("id" = i64, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Deleted reservation"),
        (status = 404, description = "Reservation not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = reservation_service::delete_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}
