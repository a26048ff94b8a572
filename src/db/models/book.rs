//! Book catalog models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog entry. Carries title/author like a request does, but the two
/// are not linked by any foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    pub available_copies: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookBody {
    pub title: String,
    pub author: String,
    pub isbn: Option<String>,
    pub category: Option<String>,
    /// Defaults to 1 when omitted.
    pub available_copies: Option<i64>,
}
