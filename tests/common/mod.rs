#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use tempfile::TempDir;

use cafe_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::products::{CreateCategoryRequest, CreateProductRequest},
    mailer::{Mail, Mailer},
    middleware::auth::AuthUser,
    models::Product,
    services::{auth_service::ensure_admin_user, category_service, product_service, today},
    state::AppState,
};

/// Keeps every mail instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: Mail) -> anyhow::Result<()> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(mail);
        }
        Ok(())
    }
}

pub struct TestApp {
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
    pub admin: AuthUser,
    // Dropped last; holds the database file and uploads.
    _dir: TempDir,
}

pub async fn setup() -> anyhow::Result<TestApp> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}", dir.path().join("cafe.db").display());

    let mut config = AppConfig::for_database(url);
    config.upload_dir = dir.path().join("uploads");

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;
    ensure_admin_user(&pool, &config.admin_username, &config.admin_password).await?;

    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState::with_mailer(pool, config, mailer.clone());

    Ok(TestApp {
        state,
        mailer,
        admin: AuthUser {
            username: "admin".into(),
            role: "admin".into(),
        },
        _dir: dir,
    })
}

impl TestApp {
    pub async fn category(&self, id: &str) -> anyhow::Result<()> {
        category_service::create_category(
            &self.state,
            &self.admin,
            CreateCategoryRequest {
                id: id.into(),
                name: id.into(),
                description: None,
                icon: None,
            },
        )
        .await?;
        Ok(())
    }

    pub async fn product(&self, name: &str, price: f64, category: &str) -> anyhow::Result<Product> {
        let resp = product_service::create_product(
            &self.state,
            &self.admin,
            CreateProductRequest {
                name: name.into(),
                description: String::new(),
                price,
                category: category.into(),
                image: String::new(),
                available: true,
            },
        )
        .await?;
        Ok(resp.data.expect("product"))
    }
}

/// `YYYY-MM-DD` for a day relative to today.
pub fn day(offset: i64) -> String {
    (today() + Duration::days(offset))
        .format("%Y-%m-%d")
        .to_string()
}
