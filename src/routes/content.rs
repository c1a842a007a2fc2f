use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};

use crate::{
    dto::content::{
        CreateCarouselImageRequest, CreateNewsRequest, CreatePageContentRequest, NewsQuery,
        PageContentQuery, UpdateCarouselImageRequest, UpdateNewsRequest, UpdatePageContentRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{CarouselImage, NewsArticle, PageContent},
    response::ApiResponse,
    services::content_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news", get(list_news))
        .route("/news/{id}", get(get_article))
        .route("/carousel", get(list_carousel))
        .route("/content", get(list_page_content))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/news", get(admin_list_news).post(create_article))
        .route("/news/{id}", put(update_article).delete(delete_article))
        .route("/carousel", get(admin_list_carousel).post(create_carousel_image))
        .route(
            "/carousel/{id}",
            put(update_carousel_image).delete(delete_carousel_image),
        )
        .route("/content", get(admin_list_page_content).post(create_page_content))
        .route(
            "/content/{id}",
            put(update_page_content).delete(delete_page_content),
        )
}

#[utoipa::path(
    get,
    path = "/news",
    params(NewsQuery),
    responses(
        (status = 200, description = "Published articles, newest first", body = ApiResponse<Vec<NewsArticle>>)
    ),
    tag = "Content"
)]
pub async fn list_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> AppResult<Json<ApiResponse<Vec<NewsArticle>>>> {
    let resp = content_service::list_published_news(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/news/{id}",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Published article", body = ApiResponse<NewsArticle>),
        (status = 404, description = "Article not found or unpublished"),
    ),
    tag = "Content"
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<NewsArticle>>> {
    let resp = content_service::get_published_article(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/carousel",
    responses(
        (status = 200, description = "Active carousel slides in display order", body = ApiResponse<Vec<CarouselImage>>)
    ),
    tag = "Content"
)]
pub async fn list_carousel(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<CarouselImage>>>> {
    let resp = content_service::list_active_carousel(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/content",
    params(PageContentQuery),
    responses(
        (status = 200, description = "Editable page blocks", body = ApiResponse<Vec<PageContent>>)
    ),
    tag = "Content"
)]
pub async fn list_page_content(
    State(state): State<AppState>,
    Query(query): Query<PageContentQuery>,
) -> AppResult<Json<ApiResponse<Vec<PageContent>>>> {
    let resp = content_service::list_page_content(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/news",
    responses(
        (status = 200, description = "All articles, drafts included", body = ApiResponse<Vec<NewsArticle>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn admin_list_news(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<NewsArticle>>>> {
    let resp = content_service::list_all_news(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/news",
    request_body = CreateNewsRequest,
    responses(
        (status = 200, description = "Article created", body = ApiResponse<NewsArticle>),
        (status = 400, description = "Missing required field"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_article(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNewsRequest>,
) -> AppResult<Json<ApiResponse<NewsArticle>>> {
    let resp = content_service::create_article(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/news/{id}",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    request_body = UpdateNewsRequest,
    responses(
        (status = 200, description = "Article updated", body = ApiResponse<NewsArticle>),
        (status = 404, description = "Article not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateNewsRequest>,
) -> AppResult<Json<ApiResponse<NewsArticle>>> {
    let resp = content_service::update_article(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/news/{id}",
    params(
        ("id" = i64, Path, description = "Article ID")
    ),
    responses(
        (status = 200, description = "Article deleted"),
        (status = 404, description = "Article not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_article(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_article(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/carousel",
    responses(
        (status = 200, description = "All carousel slides", body = ApiResponse<Vec<CarouselImage>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn admin_list_carousel(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<CarouselImage>>>> {
    let resp = content_service::list_all_carousel(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/carousel",
    request_body = CreateCarouselImageRequest,
    responses(
        (status = 200, description = "Slide created", body = ApiResponse<CarouselImage>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_carousel_image(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCarouselImageRequest>,
) -> AppResult<Json<ApiResponse<CarouselImage>>> {
    let resp = content_service::create_carousel_image(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/carousel/{id}",
    params(
        ("id" = i64, Path, description = "Slide ID")
    ),
    request_body = UpdateCarouselImageRequest,
    responses(
        (status = 200, description = "Slide updated", body = ApiResponse<CarouselImage>),
        (status = 404, description = "Slide not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_carousel_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCarouselImageRequest>,
) -> AppResult<Json<ApiResponse<CarouselImage>>> {
    let resp = content_service::update_carousel_image(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/carousel/{id}",
    params(
        ("id" = i64, Path, description = "Slide ID")
    ),
    responses(
        (status = 200, description = "Slide deleted"),
        (status = 404, description = "Slide not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_carousel_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_carousel_image(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/admin/content",
    responses(
        (status = 200, description = "All page blocks", body = ApiResponse<Vec<PageContent>>),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn admin_list_page_content(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Vec<PageContent>>>> {
    let resp = content_service::list_all_page_content(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/admin/content",
    request_body = CreatePageContentRequest,
    responses(
        (status = 200, description = "Block created", body = ApiResponse<PageContent>),
        (status = 400, description = "Duplicate id"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_page_content(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePageContentRequest>,
) -> AppResult<Json<ApiResponse<PageContent>>> {
    let resp = content_service::create_page_content(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/admin/content/{id}",
    params(
        ("id" = String, Path, description = "Block ID")
    ),
    request_body = UpdatePageContentRequest,
    responses(
        (status = 200, description = "Block updated", body = ApiResponse<PageContent>),
        (status = 404, description = "Block not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_page_content(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePageContentRequest>,
) -> AppResult<Json<ApiResponse<PageContent>>> {
    let resp = content_service::update_page_content(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/admin/content/{id}",
    params(
        ("id" = String, Path, description = "Block ID")
    ),
    responses(
        (status = 200, description = "Block deleted"),
        (status = 404, description = "Block not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_page_content(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = content_service::delete_page_content(&state, &user, id).await?;
    Ok(Json(resp))
}
