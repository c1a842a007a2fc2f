mod common;

use cafe_api::{
    dto::inbox::{ContactRequest, NewsletterSendRequest, SubscribeRequest},
    error::AppError,
    services::inbox_service,
};

fn subscribe(email: &str) -> SubscribeRequest {
    SubscribeRequest {
        email: email.into(),
        name: Some("Laia".into()),
    }
}

#[tokio::test]
async fn resubscribing_is_idempotent() -> anyhow::Result<()> {
    let app = common::setup().await?;

    let first = inbox_service::subscribe(&app.state, subscribe("laia@example.com")).await?.data.unwrap();
    assert!(!first.already_subscribed);

    let second = inbox_service::subscribe(&app.state, subscribe("LAIA@example.com")).await?.data.unwrap();
    assert!(second.already_subscribed);

    let subscribers = inbox_service::list_subscribers(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(subscribers.len(), 1);

    inbox_service::remove_subscriber(&app.state, &app.admin, subscribers[0].id).await?;
    assert!(inbox_service::list_subscribers(&app.state, &app.admin).await?.data.unwrap().is_empty());

    let back = inbox_service::subscribe(&app.state, subscribe("laia@example.com")).await?.data.unwrap();
    assert!(back.reactivated);
    assert_eq!(inbox_service::list_subscribers(&app.state, &app.admin).await?.data.unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn newsletter_goes_to_active_subscribers() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let request = || NewsletterSendRequest {
        subject: "Novedades".into(),
        content: "Nuevo menú de otoño".into(),
    };

    let nobody = inbox_service::send_newsletter(&app.state, &app.admin, request()).await?.data.unwrap();
    assert!(!nobody.success);
    assert_eq!(nobody.total, 0);

    inbox_service::subscribe(&app.state, subscribe("a@example.com")).await?;
    inbox_service::subscribe(&app.state, subscribe("b@example.com")).await?;
    let before = app.mailer.sent().len();

    let report = inbox_service::send_newsletter(&app.state, &app.admin, request()).await?.data.unwrap();
    assert!(report.success);
    assert_eq!((report.sent, report.failed, report.total), (2, 0, 2));

    let issues: Vec<_> = app.mailer.sent().into_iter().skip(before).collect();
    assert_eq!(issues.len(), 2);
    assert!(issues[0].body.contains("Nuevo menú de otoño"));
    Ok(())
}

#[tokio::test]
async fn contact_form_validates_email() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let mut request = ContactRequest {
        name: "Pau".into(),
        email: "pau-at-example".into(),
        subject: "Hola".into(),
        message: "¿Tenéis leche de avena?".into(),
    };

    let bad = inbox_service::submit_contact(&app.state, request.clone()).await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));

    request.email = "pau@example.com".into();
    inbox_service::submit_contact(&app.state, request).await?;
    let contacts = inbox_service::list_contacts(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(app.mailer.sent()[0].to, "admin@cafe-demo.local");
    Ok(())
}
