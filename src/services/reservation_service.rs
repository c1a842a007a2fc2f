use chrono::{Local, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::reservations::{
        CreateReservationRequest, ReservationStats, UpdateReservationRequest,
        UpdateReservationStatusRequest,
    },
    entity::reservations::{
        ActiveModel as ReservationActive, Column, Entity as Reservations,
        Model as ReservationModel,
    },
    error::{AppError, AppResult},
    mailer,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Availability, Reservation, TimeSlot},
    response::{ApiResponse, Meta},
    services::{notification_service, parse_date, require_email, require_text, today},
    state::AppState,
    status::{NotificationKind, ReservationStatus},
};

/// Active bookings allowed inside one booking window.
pub const SLOT_CAPACITY: i64 = 5;
/// Half-width of the booking window around a slot, in seconds.
pub const WINDOW_SECONDS: i64 = 2 * 60 * 60;
pub const MAX_PARTY_SIZE: i32 = 20;

const ADMIN_LIST_LIMIT: u64 = 200;

/// Bookable times: every 30 minutes from 09:00 through 21:30.
pub fn opening_slots() -> Vec<NaiveTime> {
    (9..22)
        .flat_map(|hour| [0, 30].map(move |minute| NaiveTime::from_hms_opt(hour, minute, 0)))
        .flatten()
        .collect()
}

/// Active bookings strictly closer than two hours to `slot`.
pub fn window_load(booked: &[NaiveTime], slot: NaiveTime) -> i64 {
    booked
        .iter()
        .filter(|time| (**time - slot).num_seconds().abs() < WINDOW_SECONDS)
        .count() as i64
}

fn parse_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::BadRequest("Invalid time format, expected HH:MM".into()))
}

fn parse_slot(value: &str) -> AppResult<NaiveTime> {
    let time = parse_time(value)?;
    if !opening_slots().contains(&time) {
        return Err(AppError::BadRequest(format!(
            "{value} is not a bookable time; choose a slot between 09:00 and 21:30"
        )));
    }
    Ok(time)
}

fn validate_party_size(size: i32) -> AppResult<()> {
    if !(1..=MAX_PARTY_SIZE).contains(&size) {
        return Err(AppError::BadRequest(format!(
            "Party size must be between 1 and {MAX_PARTY_SIZE}"
        )));
    }
    Ok(())
}

async fn booked_times<C: ConnectionTrait>(conn: &C, date: NaiveDate) -> AppResult<Vec<NaiveTime>> {
    let rows: Vec<String> = Reservations::find()
        .select_only()
        .column(Column::ReservationTime)
        .filter(Column::ReservationDate.eq(date.format("%Y-%m-%d").to_string()))
        .filter(Column::Status.is_in(ReservationStatus::ACTIVE.map(|s| s.as_str())))
        .into_tuple()
        .all(conn)
        .await?;
    Ok(rows
        .iter()
        .filter_map(|value| NaiveTime::parse_from_str(value, "%H:%M").ok())
        .collect())
}

pub async fn availability(state: &AppState, date: &str) -> AppResult<ApiResponse<Availability>> {
    let date = parse_date(date)?;
    let booked = booked_times(&state.orm, date).await?;

    let available_times = opening_slots()
        .into_iter()
        .map(|slot| {
            let current = window_load(&booked, slot);
            TimeSlot {
                time: slot.format("%H:%M").to_string(),
                available: current < SLOT_CAPACITY,
                current_reservations: current,
            }
        })
        .collect();

    Ok(ApiResponse::success(
        "Availability",
        Availability {
            date: date.format("%Y-%m-%d").to_string(),
            available_times,
        },
        Some(Meta::empty()),
    ))
}

pub async fn create_reservation(
    state: &AppState,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    require_text(&payload.customer_name, "customer_name")?;
    require_email(&payload.customer_email)?;
    require_text(&payload.customer_phone, "customer_phone")?;
    validate_party_size(payload.party_size)?;
    let date = parse_date(&payload.reservation_date)?;
    let time = parse_slot(&payload.reservation_time)?;

    if date.and_time(time) < Local::now().naive_local() {
        return Err(AppError::BadRequest("Cannot book a time in the past".into()));
    }

    let reservation = {
        let _guard = state.booking_lock.lock().await;

        let booked = booked_times(&state.orm, date).await?;
        if window_load(&booked, time) >= SLOT_CAPACITY {
            return Err(AppError::Conflict(
                "No availability for that date and time, please choose another slot".into(),
            ));
        }

        ReservationActive {
            id: NotSet,
            customer_name: Set(payload.customer_name.trim().to_string()),
            customer_email: Set(payload.customer_email.trim().to_string()),
            customer_phone: Set(payload.customer_phone.trim().to_string()),
            party_size: Set(payload.party_size),
            reservation_date: Set(date.format("%Y-%m-%d").to_string()),
            reservation_time: Set(time.format("%H:%M").to_string()),
            notes: Set(payload.notes.filter(|n| !n.trim().is_empty())),
            status: Set(ReservationStatus::Pending.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&state.orm)
        .await?
    };

    let reservation = reservation_from_entity(reservation);
    tracing::info!(
        reservation_id = reservation.id,
        date = %reservation.reservation_date,
        time = %reservation.reservation_time,
        "reservation booked"
    );

    notification_service::notify(
        state,
        NotificationKind::Reservation,
        "Nueva reserva recibida",
        format!(
            "{} para {} personas el {} a las {}",
            reservation.customer_name,
            reservation.party_size,
            reservation.reservation_date,
            reservation.reservation_time
        ),
        Some(reservation.id),
    )
    .await;

    let business = &state.config.business;
    mailer::deliver(
        state.mailer.as_ref(),
        mailer::reservation_confirmation(&business.name, &business.phone, &reservation),
    )
    .await;
    mailer::deliver(
        state.mailer.as_ref(),
        mailer::reservation_admin_alert(&state.config.admin_email, &reservation),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation created",
        reservation,
        Some(Meta::empty()),
    ))
}

pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<Reservation>>> {
    ensure_admin(user)?;
    let items = Reservations::find()
        .order_by_desc(Column::ReservationDate)
        .order_by_desc(Column::ReservationTime)
        .limit(ADMIN_LIST_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(reservation_from_entity)
        .collect();
    Ok(ApiResponse::list("Reservations", items))
}

/// Admin edit. Capacity is not re-checked so staff can squeeze in a table.
pub async fn update_reservation(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_admin(user)?;
    let existing = Reservations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ReservationActive = existing.into();
    if let Some(name) = payload.customer_name {
        require_text(&name, "customer_name")?;
        active.customer_name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.customer_email {
        require_email(&email)?;
        active.customer_email = Set(email.trim().to_string());
    }
    if let Some(phone) = payload.customer_phone {
        active.customer_phone = Set(phone.trim().to_string());
    }
    if let Some(size) = payload.party_size {
        validate_party_size(size)?;
        active.party_size = Set(size);
    }
    if let Some(date) = payload.reservation_date {
        let date = parse_date(&date)?;
        active.reservation_date = Set(date.format("%Y-%m-%d").to_string());
    }
    if let Some(time) = payload.reservation_time {
        let time = parse_slot(&time)?;
        active.reservation_time = Set(time.format("%H:%M").to_string());
    }
    if let Some(notes) = payload.notes {
        active.notes = Set(Some(notes).filter(|n| !n.trim().is_empty()));
    }
    if let Some(status) = payload.status {
        let status: ReservationStatus = status.parse()?;
        active.status = Set(status.to_string());
    }

    let reservation = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "reservation_update",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation updated",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

pub async fn update_reservation_status(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateReservationStatusRequest,
) -> AppResult<ApiResponse<Reservation>> {
    ensure_admin(user)?;
    let status: ReservationStatus = payload.status.parse()?;
    let existing = Reservations::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ReservationActive = existing.into();
    active.status = Set(status.to_string());
    let reservation = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "reservation_status_update",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id, "status": reservation.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation updated",
        reservation_from_entity(reservation),
        Some(Meta::empty()),
    ))
}

pub async fn delete_reservation(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Reservations::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        &user.username,
        "reservation_delete",
        "reservations",
        serde_json::json!({ "reservation_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn reservation_stats(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReservationStats>> {
    ensure_admin(user)?;
    let count_status = |status: ReservationStatus| {
        Reservations::find()
            .filter(Column::Status.eq(status.as_str()))
            .count(&state.orm)
    };

    let total_reservations = Reservations::find().count(&state.orm).await?;
    let pending_reservations = count_status(ReservationStatus::Pending).await?;
    let confirmed_reservations = count_status(ReservationStatus::Confirmed).await?;
    let today_reservations = Reservations::find()
        .filter(Column::ReservationDate.eq(today().format("%Y-%m-%d").to_string()))
        .count(&state.orm)
        .await?;

    let recent_reservations = Reservations::find()
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id)
        .limit(5)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(reservation_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Reservation stats",
        ReservationStats {
            total_reservations,
            pending_reservations,
            confirmed_reservations,
            today_reservations,
            recent_reservations,
        },
        Some(Meta::empty()),
    ))
}

fn reservation_from_entity(model: ReservationModel) -> Reservation {
    Reservation {
        id: model.id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        party_size: model.party_size,
        reservation_date: model.reservation_date,
        reservation_time: model.reservation_time,
        notes: model.notes,
        status: model.status,
        created_at: model.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(value: &str) -> NaiveTime {
        NaiveTime::parse_from_str(value, "%H:%M").unwrap()
    }

    #[test]
    fn slots_run_every_half_hour_from_nine_to_half_nine() {
        let slots = opening_slots();
        assert_eq!(slots.len(), 26);
        assert_eq!(slots.first(), Some(&t("09:00")));
        assert_eq!(slots.last(), Some(&t("21:30")));
    }

    #[test]
    fn window_excludes_bookings_exactly_two_hours_away() {
        let booked = [t("10:00"), t("11:30"), t("12:00"), t("14:00")];
        assert_eq!(window_load(&booked, t("12:00")), 2);
        assert_eq!(window_load(&booked, t("13:00")), 3);
        assert_eq!(window_load(&booked, t("09:00")), 1);
    }

    #[test]
    fn off_grid_times_are_rejected() {
        assert!(parse_slot("10:15").is_err());
        assert!(parse_slot("22:00").is_err());
        assert!(parse_slot("nine").is_err());
        assert!(parse_slot("21:30").is_ok());
    }

    #[test]
    fn party_size_bounds() {
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(21).is_err());
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(20).is_ok());
    }
}
