//! News articles, homepage carousel and editable page blocks.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::content::{
        CreateCarouselImageRequest, CreateNewsRequest, CreatePageContentRequest, NewsQuery,
        PageContentQuery, UpdateCarouselImageRequest, UpdateNewsRequest, UpdatePageContentRequest,
    },
    entity::{
        carousel_images::{
            ActiveModel as CarouselActive, Column as CarouselCol, Entity as CarouselImages,
            Model as CarouselModel,
        },
        news_articles::{
            ActiveModel as NewsActive, Column as NewsCol, Entity as NewsArticles,
            Model as NewsModel,
        },
        page_content::{
            ActiveModel as PageActive, Column as PageCol, Entity as PageContents,
            Model as PageModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{CarouselImage, NewsArticle, PageContent},
    response::{ApiResponse, Meta},
    services::require_text,
    state::AppState,
};

fn deleted() -> ApiResponse<serde_json::Value> {
    ApiResponse::success("Deleted", serde_json::json!({}), Some(Meta::empty()))
}

// News

pub async fn list_published_news(
    state: &AppState,
    query: NewsQuery,
) -> AppResult<ApiResponse<Vec<NewsArticle>>> {
    let mut finder = NewsArticles::find().filter(NewsCol::Published.eq(true));
    if query.featured_only {
        finder = finder.filter(NewsCol::Featured.eq(true));
    }
    let items = finder
        .order_by_desc(NewsCol::CreatedAt)
        .order_by_desc(NewsCol::Id)
        .limit(query.limit.unwrap_or(50).clamp(1, 200))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(news_from_entity)
        .collect();
    Ok(ApiResponse::list("News", items))
}

pub async fn get_published_article(state: &AppState, id: i64) -> AppResult<ApiResponse<NewsArticle>> {
    let article = NewsArticles::find_by_id(id)
        .filter(NewsCol::Published.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Article", news_from_entity(article), None))
}

pub async fn list_all_news(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<NewsArticle>>> {
    ensure_admin(user)?;
    let items = NewsArticles::find()
        .order_by_desc(NewsCol::CreatedAt)
        .order_by_desc(NewsCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(news_from_entity)
        .collect();
    Ok(ApiResponse::list("News", items))
}

pub async fn create_article(
    state: &AppState,
    user: &AuthUser,
    payload: CreateNewsRequest,
) -> AppResult<ApiResponse<NewsArticle>> {
    ensure_admin(user)?;
    require_text(&payload.title, "title")?;
    let now = Utc::now();
    let article = NewsActive {
        id: NotSet,
        title: Set(payload.title.trim().to_string()),
        excerpt: Set(payload.excerpt),
        content: Set(payload.content),
        author: Set(payload.author),
        category: Set(payload.category),
        featured: Set(payload.featured),
        image: Set(payload.image),
        tags: Set(encode_tags(&payload.tags)),
        published: Set(payload.published),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &user.username,
        "news_create",
        "news_articles",
        serde_json::json!({ "article_id": article.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Article created",
        news_from_entity(article),
        Some(Meta::empty()),
    ))
}

/// Applies the given fields and always bumps `updated_at`.
pub async fn update_article(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateNewsRequest,
) -> AppResult<ApiResponse<NewsArticle>> {
    ensure_admin(user)?;
    let existing = NewsArticles::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: NewsActive = existing.into();
    if let Some(title) = payload.title {
        require_text(&title, "title")?;
        active.title = Set(title.trim().to_string());
    }
    if let Some(excerpt) = payload.excerpt {
        active.excerpt = Set(excerpt);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(author) = payload.author {
        active.author = Set(author);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(featured) = payload.featured {
        active.featured = Set(featured);
    }
    if let Some(image) = payload.image {
        active.image = Set(Some(image).filter(|i| !i.is_empty()));
    }
    if let Some(tags) = payload.tags {
        active.tags = Set(encode_tags(&tags));
    }
    if let Some(published) = payload.published {
        active.published = Set(published);
    }
    active.updated_at = Set(Utc::now());
    let article = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "news_update",
        "news_articles",
        serde_json::json!({ "article_id": article.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        news_from_entity(article),
        Some(Meta::empty()),
    ))
}

pub async fn delete_article(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = NewsArticles::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    audit::record(
        &state.pool,
        &user.username,
        "news_delete",
        "news_articles",
        serde_json::json!({ "article_id": id }),
    )
    .await;
    Ok(deleted())
}

fn encode_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

fn decode_tags(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn news_from_entity(model: NewsModel) -> NewsArticle {
    NewsArticle {
        id: model.id,
        title: model.title,
        excerpt: model.excerpt,
        content: model.content,
        author: model.author,
        category: model.category,
        featured: model.featured,
        image: model.image,
        tags: decode_tags(&model.tags),
        published: model.published,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// Carousel

pub async fn list_active_carousel(state: &AppState) -> AppResult<ApiResponse<Vec<CarouselImage>>> {
    let items = CarouselImages::find()
        .filter(CarouselCol::Active.eq(true))
        .order_by_asc(CarouselCol::OrderPosition)
        .order_by_desc(CarouselCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(carousel_from_entity)
        .collect();
    Ok(ApiResponse::list("Carousel", items))
}

pub async fn list_all_carousel(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<CarouselImage>>> {
    ensure_admin(user)?;
    let items = CarouselImages::find()
        .order_by_asc(CarouselCol::OrderPosition)
        .order_by_desc(CarouselCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(carousel_from_entity)
        .collect();
    Ok(ApiResponse::list("Carousel", items))
}

pub async fn create_carousel_image(
    state: &AppState,
    user: &AuthUser,
    payload: CreateCarouselImageRequest,
) -> AppResult<ApiResponse<CarouselImage>> {
    ensure_admin(user)?;
    require_text(&payload.title, "title")?;
    require_text(&payload.image, "image")?;
    let image = CarouselActive {
        id: NotSet,
        title: Set(payload.title.trim().to_string()),
        subtitle: Set(payload.subtitle),
        description: Set(payload.description),
        image: Set(payload.image),
        link: Set(payload.link),
        active: Set(payload.active),
        order_position: Set(payload.order_position),
        created_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &user.username,
        "carousel_create",
        "carousel_images",
        serde_json::json!({ "image_id": image.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Carousel image created",
        carousel_from_entity(image),
        Some(Meta::empty()),
    ))
}

pub async fn update_carousel_image(
    state: &AppState,
    user: &AuthUser,
    id: i64,
    payload: UpdateCarouselImageRequest,
) -> AppResult<ApiResponse<CarouselImage>> {
    ensure_admin(user)?;
    let existing = CarouselImages::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: CarouselActive = existing.into();
    if let Some(title) = payload.title {
        require_text(&title, "title")?;
        active.title = Set(title.trim().to_string());
    }
    if let Some(subtitle) = payload.subtitle {
        active.subtitle = Set(Some(subtitle));
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(image) = payload.image {
        require_text(&image, "image")?;
        active.image = Set(image);
    }
    if let Some(link) = payload.link {
        active.link = Set(Some(link).filter(|l| !l.is_empty()));
    }
    if let Some(is_active) = payload.active {
        active.active = Set(is_active);
    }
    if let Some(position) = payload.order_position {
        active.order_position = Set(position);
    }
    let image = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "carousel_update",
        "carousel_images",
        serde_json::json!({ "image_id": image.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        carousel_from_entity(image),
        Some(Meta::empty()),
    ))
}

pub async fn delete_carousel_image(
    state: &AppState,
    user: &AuthUser,
    id: i64,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = CarouselImages::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    audit::record(
        &state.pool,
        &user.username,
        "carousel_delete",
        "carousel_images",
        serde_json::json!({ "image_id": id }),
    )
    .await;
    Ok(deleted())
}

fn carousel_from_entity(model: CarouselModel) -> CarouselImage {
    CarouselImage {
        id: model.id,
        title: model.title,
        subtitle: model.subtitle,
        description: model.description,
        image: model.image,
        link: model.link,
        active: model.active,
        order_position: model.order_position,
        created_at: model.created_at,
    }
}

// Page content

pub async fn list_page_content(
    state: &AppState,
    query: PageContentQuery,
) -> AppResult<ApiResponse<Vec<PageContent>>> {
    let mut finder = PageContents::find();
    if let Some(page) = query.page.filter(|p| !p.is_empty()) {
        finder = finder.filter(PageCol::Page.eq(page));
        if let Some(section) = query.section.filter(|s| !s.is_empty()) {
            finder = finder.filter(PageCol::Section.eq(section));
        }
    }
    let items = finder
        .order_by_asc(PageCol::Page)
        .order_by_asc(PageCol::Section)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(page_from_entity)
        .collect();
    Ok(ApiResponse::list("Content", items))
}

pub async fn list_all_page_content(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<Vec<PageContent>>> {
    ensure_admin(user)?;
    list_page_content(state, PageContentQuery::default()).await
}

pub async fn create_page_content(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePageContentRequest,
) -> AppResult<ApiResponse<PageContent>> {
    ensure_admin(user)?;
    let id = payload.id.trim().to_string();
    require_text(&id, "id")?;
    require_text(&payload.page, "page")?;
    require_text(&payload.section, "section")?;

    if PageContents::find_by_id(id.clone()).one(&state.orm).await?.is_some() {
        return Err(AppError::BadRequest(format!("Content '{id}' already exists")));
    }

    let content = PageActive {
        id: Set(id),
        title: Set(payload.title),
        content: Set(payload.content),
        section: Set(payload.section),
        page: Set(payload.page),
        updated_at: Set(Utc::now()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        &user.username,
        "content_create",
        "page_content",
        serde_json::json!({ "content_id": content.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Content created",
        page_from_entity(content),
        Some(Meta::empty()),
    ))
}

pub async fn update_page_content(
    state: &AppState,
    user: &AuthUser,
    id: String,
    payload: UpdatePageContentRequest,
) -> AppResult<ApiResponse<PageContent>> {
    ensure_admin(user)?;
    let existing = PageContents::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: PageActive = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(content) = payload.content {
        active.content = Set(content);
    }
    if let Some(section) = payload.section {
        require_text(&section, "section")?;
        active.section = Set(section);
    }
    if let Some(page) = payload.page {
        require_text(&page, "page")?;
        active.page = Set(page);
    }
    active.updated_at = Set(Utc::now());
    let content = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        &user.username,
        "content_update",
        "page_content",
        serde_json::json!({ "content_id": content.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        page_from_entity(content),
        Some(Meta::empty()),
    ))
}

pub async fn delete_page_content(
    state: &AppState,
    user: &AuthUser,
    id: String,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = PageContents::delete_by_id(id.clone()).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    audit::record(
        &state.pool,
        &user.username,
        "content_delete",
        "page_content",
        serde_json::json!({ "content_id": id }),
    )
    .await;
    Ok(deleted())
}

fn page_from_entity(model: PageModel) -> PageContent {
    PageContent {
        id: model.id,
        title: model.title,
        content: model.content,
        section: model.section,
        page: model.page,
        updated_at: model.updated_at,
    }
}
