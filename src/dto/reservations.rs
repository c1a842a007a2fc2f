use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Reservation;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateReservationRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub party_size: i32,
    /// `YYYY-MM-DD`
    pub reservation_date: String,
    /// `HH:MM`, one of the opening slots.
    pub reservation_time: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateReservationRequest {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub party_size: Option<i32>,
    pub reservation_date: Option<String>,
    pub reservation_time: Option<String>,
    pub notes: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateReservationStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationStats {
    pub total_reservations: u64,
    pub pending_reservations: u64,
    pub confirmed_reservations: u64,
    pub today_reservations: u64,
    pub recent_reservations: Vec<Reservation>,
}
