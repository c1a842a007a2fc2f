use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::AuditEntry;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total_products: u64,
    pub active_specials: u64,
    pub total_categories: u64,
    pub recent_activity: Vec<AuditEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadedImage {
    /// Relative URL under `/uploads`.
    pub url: String,
    pub filename: String,
    pub size: usize,
}
