use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::auth::{AdminProfile, Claims, LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    models::AdminUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

const TOKEN_TTL_HOURS: i64 = 24;

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// Create the configured admin account if it does not exist yet.
/// An existing account keeps its password.
pub async fn ensure_admin_user(pool: &DbPool, username: &str, password: &str) -> AppResult<()> {
    let exist: Option<(i64,)> = sqlx::query_as("SELECT id FROM admin_users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if exist.is_some() {
        return Ok(());
    }

    let password_hash = hash_password(password)?;
    sqlx::query(
        "INSERT INTO admin_users (username, password_hash, role, created_at) VALUES ($1, $2, 'admin', $3)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    tracing::info!(username, "admin account created");
    Ok(())
}

pub async fn login(state: &AppState, payload: LoginRequest) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { username, password } = payload;
    let user = sqlx::query_as::<_, AdminUser>("SELECT * FROM admin_users WHERE username = $1")
        .bind(username.as_str())
        .fetch_optional(&state.pool)
        .await?;

    let invalid = || AppError::Unauthorized("Invalid username or password".into());
    let user = user.ok_or_else(invalid)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::warn!(username = %user.username, "failed admin login");
        return Err(invalid());
    }

    let expires_at = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.username.clone(),
        role: user.role.clone(),
        exp: expires_at.timestamp() as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.username),
        "admin_login",
        Some("admin_users"),
        Some(serde_json::json!({ "admin_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            expires_at,
            user: AdminProfile {
                username: user.username,
                role: user.role,
            },
        },
        Some(Meta::empty()),
    ))
}
