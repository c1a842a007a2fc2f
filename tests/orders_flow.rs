mod common;

use cafe_api::{
    dto::{
        orders::{CreateOrderRequest, OrderItemRequest, UpdateOrderStatusRequest},
        products::CreateSpecialRequest,
    },
    error::AppError,
    services::{order_service, product_service},
};

fn order(items: Vec<OrderItemRequest>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer_name: "Marta".into(),
        customer_email: "marta@example.com".into(),
        customer_phone: None,
        items,
        notes: None,
    }
}

fn item(product_id: i64, quantity: i32) -> OrderItemRequest {
    OrderItemRequest {
        product_id,
        quantity,
        notes: None,
    }
}

// Customer orders -> prices resolved with today's special -> admin completes it.
#[tokio::test]
async fn order_is_priced_from_catalog_with_specials() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("bebidas").await?;
    let cappuccino = app.product("Cappuccino", 2.8, "bebidas").await?;
    let tea = app.product("Té", 2.0, "bebidas").await?;

    product_service::create_special(
        &app.state,
        &app.admin,
        CreateSpecialRequest {
            product_id: cappuccino.id,
            discount: 20.0,
            date: common::day(0),
        },
    )
    .await?;

    let placed = order_service::create_order(
        &app.state,
        order(vec![item(cappuccino.id, 2), item(tea.id, 1)]),
    )
    .await?
    .data
    .unwrap();

    assert_eq!(placed.items[0].price, 2.24);
    assert_eq!(placed.items[1].price, 2.0);
    assert_eq!(placed.total_amount, 6.48);
    assert_eq!(placed.status, "pending");

    let mails = app.mailer.sent();
    assert_eq!(mails.len(), 2);
    assert!(mails.iter().any(|m| m.to == "marta@example.com"));

    let updated = order_service::update_order_status(
        &app.state,
        &app.admin,
        placed.id,
        UpdateOrderStatusRequest {
            status: "completed".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.status, "completed");
    assert_eq!(updated.items.len(), 2);

    let stats = order_service::order_stats(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(stats.total_orders, 1);
    assert_eq!(stats.completed_orders, 1);
    assert_eq!(stats.pending_orders, 0);
    assert_eq!(stats.total_revenue, 6.48);
    Ok(())
}

#[tokio::test]
async fn empty_or_invalid_orders_are_rejected() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("bebidas").await?;
    let tea = app.product("Té", 2.0, "bebidas").await?;

    let empty = order_service::create_order(&app.state, order(vec![])).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    let zero = order_service::create_order(&app.state, order(vec![item(tea.id, 0)])).await;
    assert!(matches!(zero, Err(AppError::BadRequest(_))));

    let unknown = order_service::create_order(&app.state, order(vec![item(9999, 1)])).await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));

    let orders = order_service::list_orders(&app.state, &app.admin).await?;
    assert!(orders.data.unwrap().is_empty());
    assert!(app.mailer.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_status_is_rejected_and_delete_removes_order() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("bebidas").await?;
    let tea = app.product("Té", 2.0, "bebidas").await?;
    let placed = order_service::create_order(&app.state, order(vec![item(tea.id, 3)]))
        .await?
        .data
        .unwrap();

    let bad = order_service::update_order_status(
        &app.state,
        &app.admin,
        placed.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));

    order_service::delete_order(&app.state, &app.admin, placed.id).await?;
    let again = order_service::delete_order(&app.state, &app.admin, placed.id).await;
    assert!(matches!(again, Err(AppError::NotFound)));
    Ok(())
}
