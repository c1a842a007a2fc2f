use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct NewsQuery {
    #[serde(default)]
    pub featured_only: bool,
    /// Defaults to 50.
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateNewsRequest {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub featured: bool,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_true")]
    pub published: bool,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateNewsRequest {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub featured: Option<bool>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateCarouselImageRequest {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: String,
    pub link: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub order_position: i32,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCarouselImageRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
    pub active: Option<bool>,
    pub order_position: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageContentQuery {
    pub page: Option<String>,
    /// Only applied together with `page`.
    pub section: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreatePageContentRequest {
    pub id: String,
    pub title: String,
    pub content: String,
    pub section: String,
    pub page: String,
}

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdatePageContentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub section: Option<String>,
    pub page: Option<String>,
}
