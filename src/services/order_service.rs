use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::orders::{CreateOrderRequest, OrderStats, UpdateOrderStatusRequest},
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::Entity as Products,
        specials::{Column as SpecialCol, Entity as Specials},
    },
    error::{AppError, AppResult},
    mailer,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Order, OrderItem, apply_discount, round_cents},
    response::{ApiResponse, Meta},
    services::{notification_service, require_email, require_text, today},
    state::AppState,
    status::{NotificationKind, OrderStatus},
};

const ADMIN_LIST_LIMIT: u64 = 100;

/// Place an order. Unit prices come from the catalog with today's special
/// applied; whatever the client believes the price is gets ignored.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    require_text(&payload.customer_name, "customer_name")?;
    require_email(&payload.customer_email)?;
    if payload.items.is_empty() {
        return Err(AppError::BadRequest("Order must contain at least one item".into()));
    }
    if payload.items.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::BadRequest("Item quantity must be at least 1".into()));
    }

    let date = today().format("%Y-%m-%d").to_string();
    let txn = state.orm.begin().await?;

    let mut lines: Vec<OrderItem> = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let product = Products::find_by_id(item.product_id)
            .one(&txn)
            .await?
            .filter(|p| p.available)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Product {} is not available", item.product_id))
            })?;

        let special = Specials::find()
            .filter(SpecialCol::ProductId.eq(product.id))
            .filter(SpecialCol::Date.eq(date.as_str()))
            .order_by_desc(SpecialCol::Discount)
            .one(&txn)
            .await?;
        let price = match special {
            Some(special) => apply_discount(product.price, special.discount),
            None => round_cents(product.price),
        };

        lines.push(OrderItem {
            product_id: product.id,
            product_name: product.name,
            quantity: item.quantity,
            price,
            notes: item.notes.clone(),
        });
    }

    let total_amount = round_cents(
        lines
            .iter()
            .map(|line| line.price * f64::from(line.quantity))
            .sum(),
    );

    let order = OrderActive {
        id: NotSet,
        customer_name: Set(payload.customer_name.trim().to_string()),
        customer_email: Set(payload.customer_email.trim().to_string()),
        customer_phone: Set(payload.customer_phone.filter(|p| !p.trim().is_empty())),
        total_amount: Set(total_amount),
        notes: Set(payload.notes.filter(|n| !n.trim().is_empty())),
        status: Set(OrderStatus::Pending.to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;

    for line in &lines {
        OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            product_name: Set(line.product_name.clone()),
            quantity: Set(line.quantity),
            price: Set(line.price),
            notes: Set(line.notes.clone()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    let order = order_from_entity(order, lines);
    tracing::info!(order_id = order.id, total = order.total_amount, "order placed");

    notification_service::notify(
        state,
        NotificationKind::Order,
        "Nuevo pedido recibido",
        format!(
            "Pedido #{} de {} por €{:.2}",
            order.id, order.customer_name, order.total_amount
        ),
        Some(order.id),
    )
    .await;

    let cafe = &state.config.business.name;
    mailer::deliver(state.mailer.as_ref(), mailer::order_confirmation(cafe, &order)).await;
    mailer::deliver(
        state.mailer.as_ref(),
        mailer::order_admin_alert(&state.config.admin_email, &order),
    )
    .await;

    Ok(ApiResponse::success("Order created", order, Some(Meta::empty())))
}

pub async fn list_orders(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Vec<Order>>> {
    ensure_admin(user)?;
    let orders = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id)
        .limit(ADMIN_LIST_LIMIT)
        .all(&state.orm)
        .await?;
    let items = with_items(&state.orm, orders).await?;
    Ok(ApiResponse::list("Orders", items))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status: OrderStatus = payload.status.parse()?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    active.status = Set(status.to_string());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    let mut orders = with_items(&state.orm, vec![order]).await?;
    let order = orders.pop().ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(id))
        .exec(&txn)
        .await?;
    let result = Orders::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        &user.username,
        "order_delete",
        "orders",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Revenue counts completed and still-pending orders.
pub async fn order_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<OrderStats>> {
    ensure_admin(user)?;
    let total_orders = Orders::find().count(&state.orm).await?;
    let pending_orders = Orders::find()
        .filter(OrderCol::Status.eq(OrderStatus::Pending.as_str()))
        .count(&state.orm)
        .await?;
    let completed_orders = Orders::find()
        .filter(OrderCol::Status.eq(OrderStatus::Completed.as_str()))
        .count(&state.orm)
        .await?;

    let total_revenue: f64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0.0) FROM orders WHERE status IN ($1, $2)",
    )
    .bind(OrderStatus::Completed.as_str())
    .bind(OrderStatus::Pending.as_str())
    .fetch_one(&state.pool)
    .await?;

    let recent = Orders::find()
        .order_by_desc(OrderCol::CreatedAt)
        .order_by_desc(OrderCol::Id)
        .limit(5)
        .all(&state.orm)
        .await?;
    let recent_orders = with_items(&state.orm, recent).await?;

    Ok(ApiResponse::success(
        "Order stats",
        OrderStats {
            total_orders,
            pending_orders,
            completed_orders,
            total_revenue: round_cents(total_revenue),
            recent_orders,
        },
        Some(Meta::empty()),
    ))
}

/// Attach line items to each order, keeping the order of `orders`.
async fn with_items<C: ConnectionTrait>(conn: &C, orders: Vec<OrderModel>) -> AppResult<Vec<Order>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i64> = orders.iter().map(|o| o.id).collect();
    let mut grouped: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(ids))
        .order_by_asc(OrderItemCol::Id)
        .all(conn)
        .await?
    {
        grouped
            .entry(item.order_id)
            .or_default()
            .push(order_item_from_entity(item));
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = grouped.remove(&order.id).unwrap_or_default();
            order_from_entity(order, items)
        })
        .collect())
}

fn order_from_entity(model: OrderModel, items: Vec<OrderItem>) -> Order {
    Order {
        id: model.id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        items,
        total_amount: model.total_amount,
        notes: model.notes,
        status: model.status,
        created_at: model.created_at,
    }
}

fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        product_id: model.product_id,
        product_name: model.product_name,
        quantity: model.quantity,
        price: model.price,
        notes: model.notes,
    }
}
