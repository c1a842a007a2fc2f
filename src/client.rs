//! Typed HTTP client for the cafe API.

use std::{env, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Method, RequestBuilder, StatusCode, multipart};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        chat::{ChatReply, ChatRequest},
        dashboard::{DashboardStats, UploadedImage},
        inbox::{ContactRequest, SubscribeRequest, SubscribeResponse},
        notifications::UnreadSummary,
        orders::{CreateOrderRequest, OrderStats, UpdateOrderStatusRequest},
        reservations::CreateReservationRequest,
    },
    error::ErrorData,
    models::{
        Availability, Category, ContactMessage, NewsArticle, Order, Product, Reservation, Special,
    },
    response::ApiResponse,
    storefront::{
        CartError,
        cart::{Cart, CustomerDetails},
        chat::ChatBackend,
    },
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{detail}")]
    Api { status: StatusCode, detail: String },
    #[error("admin session expired, log in again")]
    SessionExpired,
    #[error("not logged in")]
    NotLoggedIn,
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error("response carried no data")]
    EmptyResponse,
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root; API paths are appended directly.
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Reads `CAFE_API_URL`, falling back to the local development server.
    pub fn from_env() -> Self {
        Self::new(env::var("CAFE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()))
    }
}

/// Bearer token issued by `/admin/login`, valid until `expires_at`.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl From<LoginResponse> for AdminSession {
    fn from(resp: LoginResponse) -> Self {
        Self {
            token: resp.access_token,
            username: resp.user.username,
            expires_at: resp.expires_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CafeClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Option<AdminSession>,
}

impl CafeClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            session: None,
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn session(&self) -> Option<&AdminSession> {
        self.session.as_ref()
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    /// Absolute URL for a server-relative path such as an uploaded image.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.config.base_url, path.trim_start_matches('/'))
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.api_url(path))
    }

    fn admin_request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let session = self.session.as_ref().ok_or(ClientError::NotLoggedIn)?;
        if session.is_expired() {
            return Err(ClientError::SessionExpired);
        }
        Ok(self
            .request(method, &format!("/admin{path}"))
            .bearer_auth(&session.token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = match response.json::<ApiResponse<ErrorData>>().await {
                Ok(body) => body.data.map(|d| d.detail).unwrap_or(body.message),
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            };
            tracing::debug!(%status, %detail, "api call failed");
            return Err(ClientError::Api { status, detail });
        }
        let body: ApiResponse<T> = response.json().await?;
        body.data.ok_or(ClientError::EmptyResponse)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn products(&self, category: Option<&str>) -> ClientResult<Vec<Product>> {
        let mut request = self.request(Method::GET, "/products");
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        self.send(request).await
    }

    pub async fn product(&self, id: i64) -> ClientResult<Product> {
        self.get(&format!("/products/{id}")).await
    }

    pub async fn specials(&self) -> ClientResult<Vec<Special>> {
        self.get("/specials").await
    }

    pub async fn categories(&self) -> ClientResult<Vec<Category>> {
        self.get("/categories").await
    }

    pub async fn news(&self, featured_only: bool) -> ClientResult<Vec<NewsArticle>> {
        let request = self
            .request(Method::GET, "/news")
            .query(&[("featured_only", featured_only)]);
        self.send(request).await
    }

    pub async fn place_order(&self, order: &CreateOrderRequest) -> ClientResult<Order> {
        self.post("/orders", order).await
    }

    /// Validates and submits the cart. The cart is cleared only once the
    /// server has accepted the order.
    pub async fn submit_cart(
        &self,
        cart: &mut Cart,
        customer: &CustomerDetails,
    ) -> ClientResult<Order> {
        let body = cart.checkout(customer)?;
        let order = self.place_order(&body).await?;
        cart.clear();
        Ok(order)
    }

    pub async fn availability(&self, date: &str) -> ClientResult<Availability> {
        self.get(&format!("/reservations/availability/{date}")).await
    }

    pub async fn create_reservation(
        &self,
        body: &CreateReservationRequest,
    ) -> ClientResult<Reservation> {
        self.post("/reservations", body).await
    }

    pub async fn contact(&self, body: &ContactRequest) -> ClientResult<ContactMessage> {
        self.post("/contact", body).await
    }

    pub async fn subscribe(&self, email: &str, name: Option<&str>) -> ClientResult<SubscribeResponse> {
        let body = SubscribeRequest {
            email: email.to_string(),
            name: name.map(str::to_owned),
        };
        self.post("/newsletter/subscribe", &body).await
    }

    pub async fn chat(&self, message: &str) -> ClientResult<ChatReply> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        self.post("/chat", &body).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> ClientResult<&AdminSession> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.post("/admin/login", &body).await?;
        tracing::debug!(username = %resp.user.username, "admin session opened");
        Ok(self.session.insert(resp.into()))
    }

    pub async fn dashboard(&self) -> ClientResult<DashboardStats> {
        self.send(self.admin_request(Method::GET, "/dashboard")?).await
    }

    pub async fn orders(&self) -> ClientResult<Vec<Order>> {
        self.send(self.admin_request(Method::GET, "/orders")?).await
    }

    pub async fn order_stats(&self) -> ClientResult<OrderStats> {
        self.send(self.admin_request(Method::GET, "/orders/stats")?).await
    }

    pub async fn update_order_status(&self, id: i64, status: &str) -> ClientResult<Order> {
        let body = UpdateOrderStatusRequest {
            status: status.to_string(),
        };
        let request = self
            .admin_request(Method::PUT, &format!("/orders/{id}/status"))?
            .json(&body);
        self.send(request).await
    }

    pub async fn unread_notifications(&self) -> ClientResult<UnreadSummary> {
        self.send(self.admin_request(Method::GET, "/notifications/unread")?)
            .await
    }

    pub async fn upload_image(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> ClientResult<UploadedImage> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);
        let request = self
            .admin_request(Method::POST, "/upload-image")?
            .multipart(form);
        self.send(request).await
    }
}

#[async_trait]
impl ChatBackend for CafeClient {
    async fn ask(&self, message: &str) -> anyhow::Result<String> {
        let reply = self.chat(message).await?;
        Ok(reply.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let config = ClientConfig::new("http://cafe.local:8000/");
        assert_eq!(config.base_url, "http://cafe.local:8000");
    }

    #[test]
    fn asset_url_joins_relative_paths() {
        let client = CafeClient::new(ClientConfig::new("http://cafe.local")).unwrap();
        assert_eq!(
            client.asset_url("/uploads/products/a.png"),
            "http://cafe.local/uploads/products/a.png"
        );
        assert_eq!(client.asset_url("https://cdn/x.png"), "https://cdn/x.png");
    }

    #[test]
    fn expired_session_is_refused_before_sending() {
        let mut client = CafeClient::new(ClientConfig::new("http://cafe.local")).unwrap();
        assert!(matches!(
            client.admin_request(Method::GET, "/dashboard"),
            Err(ClientError::NotLoggedIn)
        ));

        client.session = Some(AdminSession {
            token: "t".into(),
            username: "admin".into(),
            expires_at: Utc::now() - chrono::Duration::minutes(1),
        });
        assert!(matches!(
            client.admin_request(Method::GET, "/dashboard"),
            Err(ClientError::SessionExpired)
        ));
    }
}
