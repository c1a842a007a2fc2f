mod common;

use cafe_api::{
    dto::{
        inbox::SubscribeRequest,
        notifications::NotificationQuery,
        reservations::CreateReservationRequest,
    },
    error::AppError,
    services::{inbox_service, notification_service, reservation_service},
};

#[tokio::test]
async fn unread_counters_follow_mark_read_and_clear() -> anyhow::Result<()> {
    let app = common::setup().await?;

    reservation_service::create_reservation(
        &app.state,
        CreateReservationRequest {
            customer_name: "Nuria".into(),
            customer_email: "nuria@example.com".into(),
            customer_phone: "600333444".into(),
            party_size: 3,
            reservation_date: common::day(7),
            reservation_time: "20:00".into(),
            notes: None,
        },
    )
    .await?;
    for email in ["x@example.com", "y@example.com"] {
        inbox_service::subscribe(
            &app.state,
            SubscribeRequest {
                email: email.into(),
                name: None,
            },
        )
        .await?;
    }

    let summary = notification_service::unread_summary(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(summary.total_unread, 3);
    assert_eq!(summary.by_type.get("newsletter"), Some(&2));
    assert_eq!(summary.by_type.get("reservation"), Some(&1));

    let all = notification_service::list_notifications(&app.state, &app.admin, NotificationQuery::default())
        .await?
        .data
        .unwrap();
    let reservation = all.iter().find(|n| n.kind == "reservation").unwrap();
    let read = notification_service::mark_read(&app.state, &app.admin, reservation.id).await?.data.unwrap();
    assert!(read.is_read);

    let summary = notification_service::unread_summary(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(summary.total_unread, 2);
    assert!(!summary.by_type.contains_key("reservation"));

    let marked = notification_service::mark_all_read(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(marked.count, 2);
    let summary = notification_service::unread_summary(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(summary.total_unread, 0);

    let cleared = notification_service::clear_all(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(cleared.count, 3);
    let missing = notification_service::mark_read(&app.state, &app.admin, reservation.id).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
    Ok(())
}
