use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::products::{CreateProductRequest, CreateSpecialRequest, ProductQuery, UpdateProductRequest},
    entity::{
        categories::Entity as Categories,
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        specials::{
            ActiveModel as SpecialActive, Column as SpecialCol, Entity as Specials,
            Model as SpecialModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Product, Special},
    response::{ApiResponse, Meta},
    services::{parse_date, require_text, today},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<Vec<Product>>> {
    let mut finder = Products::find().filter(Column::Available.eq(true));
    finder = match query.category.filter(|c| !c.is_empty()) {
        Some(category) => finder
            .filter(Column::Category.eq(category))
            .order_by_asc(Column::Name),
        None => finder
            .order_by_asc(Column::Category)
            .order_by_asc(Column::Name),
    };

    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(ApiResponse::list("Products", items))
}

/// Public lookup; unavailable products are hidden.
pub async fn get_product(state: &AppState, id: i64) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .filter(Column::Available.eq(true))
        .one(&state.orm)
        .await?
        .map(product_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn list_all_products(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<Product>>> {
    ensure_admin(user)?;
    let items = Products::find()
        .order_by_asc(Column::Category)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(ApiResponse::list("Products", items))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    require_text(&payload.name, "name")?;
    validate_price(payload.price)?;
    ensure_category_exists(state, &payload.category).await?;

    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name.trim().to_string()),
        description: Set(payload.description),
        price: Set(payload.price),
        category: Set(payload.category),
        image: Set(payload.image),
        available: Set(payload.available),
    };
    let product = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id, "name": product.name }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        require_text(&name, "name")?;
        active.name = Set(name.trim().to_string());
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(price) = payload.price {
        validate_price(price)?;
        active.price = Set(price);
    }
    if let Some(category) = payload.category {
        ensure_category_exists(state, &category).await?;
        active.category = Set(category);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(available) = payload.available {
        active.available = Set(available);
    }

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

/// Deletes the product together with its specials.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    Specials::delete_many()
        .filter(SpecialCol::ProductId.eq(id))
        .exec(&txn)
        .await?;
    let result = Products::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    audit::record(
        &state.pool,
        &user.username,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn todays_specials(state: &AppState) -> AppResult<ApiResponse<Vec<Special>>> {
    let items = fetch_todays_specials(&state.orm).await?;
    Ok(ApiResponse::list("Specials", items))
}

/// Today's specials whose product is on sale, biggest discount first.
pub async fn fetch_todays_specials<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<Special>> {
    let date = today().format("%Y-%m-%d").to_string();
    let rows = Specials::find()
        .find_also_related(Products)
        .filter(SpecialCol::Date.eq(date))
        .filter(Column::Available.eq(true))
        .order_by_desc(SpecialCol::Discount)
        .order_by_asc(SpecialCol::Id)
        .all(conn)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|(special, product)| product.map(|p| special_from_entity(special, p)))
        .collect())
}

pub async fn list_all_specials(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<Special>>> {
    ensure_admin(user)?;
    let rows = Specials::find()
        .find_also_related(Products)
        .order_by_desc(SpecialCol::Date)
        .order_by_desc(SpecialCol::Id)
        .all(&state.orm)
        .await?;
    let items = rows
        .into_iter()
        .filter_map(|(special, product)| product.map(|p| special_from_entity(special, p)))
        .collect();
    Ok(ApiResponse::list("Specials", items))
}

pub async fn create_special(
    state: &AppState,
    user: &AuthUser,
    payload: CreateSpecialRequest,
) -> AppResult<ApiResponse<Special>> {
    ensure_admin(user)?;
    if !(0.0..=100.0).contains(&payload.discount) {
        return Err(AppError::BadRequest("Discount must be between 0 and 100".into()));
    }
    let date = parse_date(&payload.date)?;

    let product = Products::find_by_id(payload.product_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let special = SpecialActive {
        id: NotSet,
        product_id: Set(product.id),
        date: Set(date.format("%Y-%m-%d").to_string()),
        discount: Set(payload.discount),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &user.username,
        "special_create",
        "specials",
        serde_json::json!({ "special_id": special.id, "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Special created",
        special_from_entity(special, product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_special(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Specials::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        &user.username,
        "special_delete",
        "specials",
        serde_json::json!({ "special_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn validate_price(price: f64) -> AppResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::BadRequest("Price must be a positive amount".into()));
    }
    Ok(())
}

async fn ensure_category_exists(state: &AppState, category: &str) -> AppResult<()> {
    let found = Categories::find_by_id(category.to_string())
        .one(&state.orm)
        .await?;
    if found.is_none() {
        return Err(AppError::BadRequest(format!("Unknown category '{category}'")));
    }
    Ok(())
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        description: model.description,
        price: model.price,
        category: model.category,
        image: model.image,
        available: model.available,
    }
}

fn special_from_entity(model: SpecialModel, product: ProductModel) -> Special {
    Special {
        id: model.id,
        product: product_from_entity(product),
        discount: model.discount,
        date: model.date,
    }
}
