mod common;

use cafe_api::{
    dto::products::{CreateSpecialRequest, ProductQuery, UpdateProductRequest},
    error::AppError,
    middleware::auth::AuthUser,
    services::{category_service, dashboard_service, product_service},
};

#[tokio::test]
async fn category_in_use_cannot_be_deleted() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("bebidas").await?;
    let coffee = app.product("Café con leche", 2.5, "bebidas").await?;

    let err = category_service::delete_category(&app.state, &app.admin, "bebidas".into())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref msg) if msg.contains("1 products")));

    product_service::delete_product(&app.state, &app.admin, coffee.id).await?;
    category_service::delete_category(&app.state, &app.admin, "bebidas".into()).await?;

    let categories = category_service::list_categories(&app.state).await?;
    assert!(categories.data.unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn product_needs_known_category_and_positive_price() -> anyhow::Result<()> {
    let app = common::setup().await?;
    assert!(app.product("Brownie", 3.0, "postres").await.is_err());

    app.category("postres").await?;
    assert!(app.product("Brownie", -1.0, "postres").await.is_err());
    assert!(app.product("Brownie", 3.0, "postres").await.is_ok());
    Ok(())
}

#[tokio::test]
async fn unavailable_products_are_hidden_from_public_listings() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("panaderia").await?;
    let croissant = app.product("Croissant", 1.8, "panaderia").await?;
    app.product("Pan", 4.5, "panaderia").await?;

    product_service::update_product(
        &app.state,
        &app.admin,
        croissant.id,
        UpdateProductRequest {
            available: Some(false),
            ..Default::default()
        },
    )
    .await?;

    let public = product_service::list_products(&app.state, ProductQuery::default()).await?;
    let names: Vec<String> = public.data.unwrap().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["Pan".to_string()]);

    let err = product_service::get_product(&app.state, croissant.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let all = product_service::list_all_products(&app.state, &app.admin).await?;
    assert_eq!(all.data.unwrap().len(), 2);
    Ok(())
}

#[tokio::test]
async fn todays_specials_sorted_by_discount() -> anyhow::Result<()> {
    let app = common::setup().await?;
    app.category("bebidas").await?;
    let latte = app.product("Latte", 3.0, "bebidas").await?;
    let mocha = app.product("Mocha", 3.5, "bebidas").await?;

    for (product_id, discount, date) in [
        (latte.id, 10.0, common::day(0)),
        (mocha.id, 25.0, common::day(0)),
        (latte.id, 50.0, common::day(1)),
    ] {
        product_service::create_special(
            &app.state,
            &app.admin,
            CreateSpecialRequest {
                product_id,
                discount,
                date,
            },
        )
        .await?;
    }

    let specials = product_service::todays_specials(&app.state).await?.data.unwrap();
    assert_eq!(specials.len(), 2);
    assert_eq!(specials[0].product.name, "Mocha");
    assert_eq!(specials[1].discounted_price(), 2.7);

    let bad = product_service::create_special(
        &app.state,
        &app.admin,
        CreateSpecialRequest {
            product_id: latte.id,
            discount: 120.0,
            date: common::day(0),
        },
    )
    .await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));

    let dashboard = dashboard_service::dashboard(&app.state, &app.admin).await?.data.unwrap();
    assert_eq!(dashboard.total_products, 2);
    assert_eq!(dashboard.active_specials, 2);
    assert_eq!(dashboard.total_categories, 1);
    assert!(
        dashboard
            .recent_activity
            .iter()
            .any(|entry| entry.action == "special_create")
    );
    Ok(())
}

#[tokio::test]
async fn non_admin_role_is_forbidden() -> anyhow::Result<()> {
    let app = common::setup().await?;
    let staff = AuthUser {
        username: "staff".into(),
        role: "staff".into(),
    };
    let err = product_service::list_all_products(&app.state, &staff).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
    Ok(())
}
