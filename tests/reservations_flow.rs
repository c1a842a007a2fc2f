mod common;

use cafe_api::{
    dto::reservations::{CreateReservationRequest, UpdateReservationStatusRequest},
    error::AppError,
    services::reservation_service::{self, SLOT_CAPACITY},
};

fn booking(date: &str, time: &str) -> CreateReservationRequest {
    CreateReservationRequest {
        customer_name: "Jordi".into(),
        customer_email: "jordi@example.com".into(),
        customer_phone: "600111222".into(),
        party_size: 2,
        reservation_date: date.into(),
        reservation_time: time.into(),
        notes: None,
    }
}

#[tokio::test]
async fn sixth_booking_in_window_conflicts() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let date = common::day(30);

    for _ in 0..5 {
        reservation_service::create_reservation(&app.state, booking(&date, "13:00")).await?;
    }

    let sixth = reservation_service::create_reservation(&app.state, booking(&date, "13:30")).await;
    assert!(matches!(sixth, Err(AppError::Conflict(_))));

    let availability = reservation_service::availability(&app.state, &date)
        .await?
        .data
        .unwrap();
    assert_eq!(availability.available_times.len(), 26);
    let slot = |t: &str| {
        availability
            .available_times
            .iter()
            .find(|s| s.time == t)
            .cloned()
            .unwrap()
    };
    assert!(!slot("13:00").available);
    assert_eq!(slot("13:00").current_reservations, 5);
    assert!(!slot("14:30").available);
    // Exactly two hours away falls outside the window.
    assert!(slot("15:00").available);
    assert_eq!(slot("15:00").current_reservations, 0);
    Ok(())
}

#[tokio::test]
async fn cancelled_bookings_free_capacity() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let date = common::day(10);

    let mut ids = Vec::new();
    for _ in 0..5 {
        let r = reservation_service::create_reservation(&app.state, booking(&date, "10:00"))
            .await?
            .data
            .unwrap();
        ids.push(r.id);
    }

    reservation_service::update_reservation_status(
        &app.state,
        &app.admin,
        ids[0],
        UpdateReservationStatusRequest {
            status: "cancelled".into(),
        },
    )
    .await?;

    reservation_service::create_reservation(&app.state, booking(&date, "10:30")).await?;

    let stats = reservation_service::reservation_stats(&app.state, &app.admin)
        .await?
        .data
        .unwrap();
    assert_eq!(stats.total_reservations, 6);
    assert_eq!(stats.pending_reservations, 5);
    Ok(())
}

#[tokio::test]
async fn past_and_malformed_bookings_are_rejected() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let past = reservation_service::create_reservation(&app.state, booking(&common::day(-1), "12:00")).await;
    assert!(matches!(past, Err(AppError::BadRequest(_))));

    let off_slot =
        reservation_service::create_reservation(&app.state, booking(&common::day(5), "12:15")).await;
    assert!(matches!(off_slot, Err(AppError::BadRequest(_))));

    let mut crowd = booking(&common::day(5), "12:00");
    crowd.party_size = 21;
    let crowd = reservation_service::create_reservation(&app.state, crowd).await;
    assert!(matches!(crowd, Err(AppError::BadRequest(_))));

    let bad_date = reservation_service::availability(&app.state, "2030-13-40").await;
    assert!(matches!(bad_date, Err(AppError::BadRequest(_))));

    assert!(app.mailer.sent().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_cannot_overbook_a_window() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let date = common::day(12);

    let attempts: Vec<_> = (0..20)
        .map(|_| {
            let state = app.state.clone();
            let body = booking(&date, "20:00");
            tokio::spawn(async move { reservation_service::create_reservation(&state, body).await })
        })
        .collect();

    let (mut booked, mut refused) = (0, 0);
    for attempt in attempts {
        match attempt.await? {
            Ok(_) => booked += 1,
            Err(AppError::Conflict(_)) => refused += 1,
            Err(other) => anyhow::bail!("unexpected error: {other}"),
        }
    }
    assert_eq!(booked, SLOT_CAPACITY);
    assert_eq!(refused, 20 - SLOT_CAPACITY);
    Ok(())
}
