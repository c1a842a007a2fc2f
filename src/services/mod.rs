pub mod auth_service;
pub mod category_service;
pub mod chat_service;
pub mod content_service;
pub mod dashboard_service;
pub mod inbox_service;
pub mod notification_service;
pub mod order_service;
pub mod product_service;
pub mod reservation_service;
pub mod upload_service;

use chrono::{Local, NaiveDate};

use crate::error::{AppError, AppResult};

/// Today in the café's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format, expected YYYY-MM-DD".into()))
}

pub(crate) fn require_text(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_email(value: &str) -> AppResult<()> {
    let value = value.trim();
    let valid = value
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::BadRequest("A valid email is required".into()));
    }
    Ok(())
}
