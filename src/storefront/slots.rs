use thiserror::Error;

use crate::{
    dto::reservations::CreateReservationRequest,
    models::{Availability, TimeSlot},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotError {
    #[error("{0} no es un horario disponible")]
    Unknown(String),
    #[error("El horario {0} está completo")]
    Unavailable(String),
    #[error("Selecciona un horario")]
    NothingSelected,
}

#[derive(Debug, Clone, Default)]
pub struct GuestDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub party_size: i32,
    pub notes: Option<String>,
}

/// Time slot selection for one date, built from the availability response.
#[derive(Debug, Clone)]
pub struct SlotPicker {
    date: String,
    slots: Vec<TimeSlot>,
    selected: Option<String>,
}

impl SlotPicker {
    pub fn new(availability: Availability) -> Self {
        Self {
            date: availability.date,
            slots: availability.available_times,
            selected: None,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Full slots cannot be picked.
    pub fn select(&mut self, time: &str) -> Result<(), SlotError> {
        let slot = self
            .slots
            .iter()
            .find(|s| s.time == time)
            .ok_or_else(|| SlotError::Unknown(time.to_string()))?;
        if !slot.available {
            return Err(SlotError::Unavailable(time.to_string()));
        }
        self.selected = Some(slot.time.clone());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn reservation_request(
        &self,
        guest: GuestDetails,
    ) -> Result<CreateReservationRequest, SlotError> {
        let time = self.selected.clone().ok_or(SlotError::NothingSelected)?;
        Ok(CreateReservationRequest {
            customer_name: guest.name,
            customer_email: guest.email,
            customer_phone: guest.phone,
            party_size: guest.party_size,
            reservation_date: self.date.clone(),
            reservation_time: time,
            notes: guest.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> SlotPicker {
        SlotPicker::new(Availability {
            date: "2030-05-04".into(),
            available_times: vec![
                TimeSlot {
                    time: "13:00".into(),
                    available: true,
                    current_reservations: 2,
                },
                TimeSlot {
                    time: "13:30".into(),
                    available: false,
                    current_reservations: 5,
                },
            ],
        })
    }

    #[test]
    fn unavailable_slot_cannot_be_selected() {
        let mut picker = picker();
        assert_eq!(
            picker.select("13:30"),
            Err(SlotError::Unavailable("13:30".into()))
        );
        assert!(picker.selected().is_none());
    }

    #[test]
    fn unknown_slot_is_rejected() {
        let mut picker = picker();
        assert_eq!(picker.select("03:00"), Err(SlotError::Unknown("03:00".into())));
    }

    #[test]
    fn request_uses_selected_slot() {
        let mut picker = picker();
        assert_eq!(
            picker.reservation_request(GuestDetails::default()).unwrap_err(),
            SlotError::NothingSelected
        );

        picker.select("13:00").unwrap();
        let body = picker
            .reservation_request(GuestDetails {
                name: "Luis".into(),
                email: "luis@example.com".into(),
                phone: "600000000".into(),
                party_size: 4,
                notes: Some("   ".into()),
            })
            .unwrap();
        assert_eq!(body.reservation_date, "2030-05-04");
        assert_eq!(body.reservation_time, "13:00");
        assert!(body.notes.is_none());
    }
}
