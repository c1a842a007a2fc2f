use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};

use crate::{
    audit::recent_activity,
    dto::dashboard::DashboardStats,
    entity::{
        products::{Column as ProductCol, Entity as Products},
        specials::{Column as SpecialCol, Entity as Specials},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    services::today,
    state::AppState,
};

pub async fn dashboard(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<DashboardStats>> {
    ensure_admin(user)?;

    let total_products = Products::find()
        .filter(ProductCol::Available.eq(true))
        .count(&state.orm)
        .await?;
    let active_specials = Specials::find()
        .filter(SpecialCol::Date.eq(today().format("%Y-%m-%d").to_string()))
        .count(&state.orm)
        .await?;
    let categories: Vec<String> = Products::find()
        .select_only()
        .column(ProductCol::Category)
        .distinct()
        .filter(ProductCol::Available.eq(true))
        .into_tuple()
        .all(&state.orm)
        .await?;

    let recent_activity = recent_activity(&state.pool, 10).await?;

    Ok(ApiResponse::success(
        "Dashboard",
        DashboardStats {
            total_products,
            active_specials,
            total_categories: categories.len() as u64,
            recent_activity,
        },
        Some(Meta::empty()),
    ))
}
