mod common;

use cafe_api::{
    app::build_app,
    client::{CafeClient, ClientConfig, ClientError},
    dto::products::UpdateProductRequest,
    services::product_service,
    storefront::{Cart, ChatSession, CustomerDetails, GuestDetails, Sender, SlotPicker},
};
use reqwest::StatusCode;

async fn spawn(app: &common::TestApp) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = build_app(app.state.clone());
    tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, router).await {
            eprintln!("test server stopped: {err}");
        }
    });
    Ok(format!("http://{addr}"))
}

#[tokio::test]
async fn admin_routes_require_a_valid_token() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let base = spawn(&app).await?;
    let http = reqwest::Client::new();

    let missing = http.get(format!("{base}/admin/dashboard")).send().await?;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let forged = http
        .get(format!("{base}/admin/orders"))
        .bearer_auth("not-a-jwt")
        .send()
        .await?;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = forged.json().await?;
    assert!(body["data"]["detail"].is_string());

    let mut client = CafeClient::new(ClientConfig::new(&base))?;
    let wrong = client.login("admin", "nope").await.unwrap_err();
    assert!(matches!(wrong, ClientError::Api { status, .. } if status == StatusCode::UNAUTHORIZED));
    assert!(matches!(client.dashboard().await, Err(ClientError::NotLoggedIn)));

    client.login("admin", "admin123").await?;
    let dashboard = client.dashboard().await?;
    assert!(dashboard.recent_activity.iter().any(|e| e.action == "admin_login"));
    assert_eq!(client.session().map(|s| s.username.as_str()), Some("admin"));

    client.logout();
    assert!(matches!(client.dashboard().await, Err(ClientError::NotLoggedIn)));

    let lost = http.get(format!("{base}/nope")).send().await?;
    assert_eq!(lost.status(), StatusCode::NOT_FOUND);
    Ok(())
}

// Browse -> cart -> checkout over HTTP, then the admin sees the order.
#[tokio::test]
async fn cart_checkout_over_http() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("panaderia").await?;
    let croissant = app.product("Croissant", 1.8, "panaderia").await?;
    let bread = app.product("Pan", 4.5, "panaderia").await?;
    let base = spawn(&app).await?;
    let mut client = CafeClient::new(ClientConfig::new(&base))?;

    let menu = client.products(Some("panaderia")).await?;
    assert_eq!(menu.len(), 2);

    let mut cart = Cart::new();
    for product in &menu {
        cart.add(product);
    }
    cart.set_quantity(croissant.id, 3);

    let customer = CustomerDetails {
        name: "Iria".into(),
        email: "iria@example.com".into(),
        ..Default::default()
    };

    product_service::update_product(
        &app.state,
        &app.admin,
        bread.id,
        UpdateProductRequest {
            available: Some(false),
            ..Default::default()
        },
    )
    .await?;
    let refused = client.submit_cart(&mut cart, &customer).await.unwrap_err();
    assert!(matches!(refused, ClientError::Api { status, .. } if status == StatusCode::BAD_REQUEST));
    assert_eq!(cart.item_count(), 4);

    cart.remove(bread.id);
    let order = client.submit_cart(&mut cart, &customer).await?;
    assert!(cart.is_empty());
    assert_eq!(order.total_amount, 5.4);

    assert!(matches!(
        client.submit_cart(&mut cart, &customer).await,
        Err(ClientError::Cart(_))
    ));

    client.login("admin", "admin123").await?;
    let orders = client.orders().await?;
    assert_eq!(orders.len(), 1);
    let done = client.update_order_status(order.id, "completed").await?;
    assert_eq!(done.status, "completed");
    assert_eq!(client.unread_notifications().await?.total_unread, 1);
    Ok(())
}

#[tokio::test]
async fn slot_picker_books_through_the_api() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let base = spawn(&app).await?;
    let client = CafeClient::new(ClientConfig::new(&base))?;
    let date = common::day(3);

    let mut picker = SlotPicker::new(client.availability(&date).await?);
    picker.select("19:00")?;
    let body = picker.reservation_request(GuestDetails {
        name: "Oriol".into(),
        email: "oriol@example.com".into(),
        phone: "600555666".into(),
        party_size: 4,
        notes: None,
    })?;
    let reservation = client.create_reservation(&body).await?;
    assert_eq!(reservation.reservation_time, "19:00");
    assert_eq!(reservation.status, "pending");

    let refreshed = client.availability(&date).await?;
    let slot = refreshed
        .available_times
        .iter()
        .find(|s| s.time == "19:00")
        .unwrap();
    assert_eq!(slot.current_reservations, 1);
    Ok(())
}

#[tokio::test]
async fn chat_session_and_image_upload() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let base = spawn(&app).await?;
    let mut client = CafeClient::new(ClientConfig::new(&base))?;

    let business = app.state.config.business.clone();
    let mut session = ChatSession::new(client.clone(), &business).without_delay();
    let reply = session.send("¿Cuál es el horario?").await.unwrap().clone();
    assert_eq!(reply.sender, Sender::Bot);
    assert!(reply.text.contains(&business.hours));
    assert_eq!(session.messages().len(), 3);

    client.login("admin", "admin123").await?;
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 1, 2, 3];
    let uploaded = client
        .upload_image("foto café.png", "image/png", png.clone())
        .await?;
    assert!(uploaded.url.starts_with("/uploads/products/"));
    assert_eq!(uploaded.size, png.len());

    let served = reqwest::get(client.asset_url(&uploaded.url)).await?;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await?.to_vec(), png);

    let text = client
        .upload_image("notes.txt", "text/plain", b"hola".to_vec())
        .await;
    assert!(matches!(text, Err(ClientError::Api { status, .. }) if status == StatusCode::BAD_REQUEST));
    Ok(())
}
