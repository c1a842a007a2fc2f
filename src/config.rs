use std::{env, path::PathBuf};

use anyhow::Context;

/// Business details quoted by the chatbot and in outgoing mail.
#[derive(Debug, Clone)]
pub struct BusinessInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub hours: String,
}

impl Default for BusinessInfo {
    fn default() -> Self {
        Self {
            name: "Café Demo".to_string(),
            phone: "+34 611 59 46 43".to_string(),
            address: "Carretera Bordeta 61, Barcelona".to_string(),
            hours: "Lunes a Domingo 7:00-22:00".to_string(),
        }
    }
}

/// SMTP relay credentials. Mail is only logged when these are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct SmtpSettings {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl SmtpSettings {
    /// Reads `SMTP_SERVER`, `SMTP_PORT`, `SMTP_USER`, `SMTP_PASSWORD` and
    /// `SMTP_FROM` through `var`. Returns `None` unless user and password are set.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let set = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        let username = set("SMTP_USER")?;
        let password = set("SMTP_PASSWORD")?;
        Some(Self {
            server: set("SMTP_SERVER").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            port: set("SMTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            from: set("SMTP_FROM").unwrap_or_else(|| username.clone()),
            username,
            password,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password: String,
    pub admin_email: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub allowed_origins: Vec<String>,
    pub openai_api_key: Option<String>,
    pub smtp: Option<SmtpSettings>,
    pub business: BusinessInfo,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://cafe.db".to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET is not set")?;
        let admin_username = env::var("ADMIN_USERNAME").context("ADMIN_USERNAME is not set")?;
        let admin_password = env::var("ADMIN_PASSWORD").context("ADMIN_PASSWORD is not set")?;
        let admin_email =
            env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@cafe-demo.local".to_string());
        let upload_dir = env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".to_string())
            .into();

        let mut allowed_origins = vec![
            "http://localhost:5173".to_string(),
            "http://localhost:5174".to_string(),
            "http://localhost:3000".to_string(),
        ];
        if let Ok(frontend) = env::var("FRONTEND_URL") {
            allowed_origins.push(frontend);
        }

        let defaults = BusinessInfo::default();
        let business = BusinessInfo {
            name: env::var("APP_NAME").unwrap_or(defaults.name),
            phone: env::var("PHONE_CONTACT").unwrap_or(defaults.phone),
            address: env::var("ADDRESS").unwrap_or(defaults.address),
            hours: env::var("HOURS").unwrap_or(defaults.hours),
        };

        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            admin_username,
            admin_password,
            admin_email,
            upload_dir,
            max_upload_bytes: 5 * 1024 * 1024,
            allowed_origins,
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            smtp: SmtpSettings::from_vars(|key| env::var(key).ok()),
            business,
        })
    }

    /// Settings for tests and local tooling; nothing is read from the environment.
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            host: "127.0.0.1".to_string(),
            port: 0,
            jwt_secret: "local-development-secret".to_string(),
            admin_username: "admin".to_string(),
            admin_password: "admin123".to_string(),
            admin_email: "admin@cafe-demo.local".to_string(),
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: 5 * 1024 * 1024,
            allowed_origins: Vec::new(),
            openai_api_key: None,
            smtp: None,
            business: BusinessInfo::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_config_uses_default_business_details() {
        let config = AppConfig::for_database("sqlite::memory:");
        assert_eq!(config.business.name, "Café Demo");
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.openai_api_key.is_none());
        assert!(config.smtp.is_none());
    }

    #[test]
    fn smtp_needs_user_and_password() {
        let only_user = SmtpSettings::from_vars(|key| {
            (key == "SMTP_USER").then(|| "cafe@example.com".to_string())
        });
        assert!(only_user.is_none());

        let vars = std::collections::HashMap::from([
            ("SMTP_USER", "cafe@example.com"),
            ("SMTP_PASSWORD", "secret"),
            ("SMTP_PORT", "2525"),
        ]);
        let smtp = SmtpSettings::from_vars(|key| vars.get(key).map(|v| v.to_string()))
            .expect("smtp settings");
        assert_eq!(smtp.server, "smtp.gmail.com");
        assert_eq!(smtp.port, 2525);
        assert_eq!(smtp.from, "cafe@example.com");
    }
}
