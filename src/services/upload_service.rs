use std::path::Path;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    audit,
    dto::dashboard::UploadedImage,
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Subdirectory of the upload root holding product images.
pub const PRODUCT_IMAGE_DIR: &str = "products";

/// Keep ASCII letters, digits, dot, dash and underscore; anything else
/// becomes `_`. Path separators can therefore never survive.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "image.jpg".to_string()
    } else {
        cleaned
    }
}

pub async fn store_product_image(
    state: &AppState,
    user: &AuthUser,
    original_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> AppResult<ApiResponse<UploadedImage>> {
    ensure_admin(user)?;

    if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
        return Err(AppError::BadRequest("The file must be an image".into()));
    }
    if bytes.is_empty() {
        return Err(AppError::BadRequest("The file is empty".into()));
    }
    if bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "The image must be smaller than {} MB",
            state.config.max_upload_bytes / (1024 * 1024)
        )));
    }

    let short_id = Uuid::new_v4().simple().to_string();
    let filename = format!(
        "{}_{}_{}",
        Utc::now().timestamp(),
        &short_id[..8],
        sanitize_filename(original_name.unwrap_or("image.jpg"))
    );

    let dir = state.config.upload_dir.join(PRODUCT_IMAGE_DIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("creating upload dir: {e}")))?;
    let path = dir.join(&filename);
    write_file(&path, bytes).await?;

    audit::record(
        &state.pool,
        &user.username,
        "image_upload",
        "uploads",
        serde_json::json!({ "filename": filename, "size": bytes.len() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image uploaded",
        UploadedImage {
            url: format!("/uploads/{PRODUCT_IMAGE_DIR}/{filename}"),
            filename,
            size: bytes.len(),
        },
        Some(Meta::empty()),
    ))
}

async fn write_file(path: &Path, bytes: &[u8]) -> AppResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("writing {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\pics\\café latte.png"), "caf__latte.png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename(""), "image.jpg");
    }
}
