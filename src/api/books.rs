//! Book catalog endpoints.
//!
//! The catalog is a secondary surface: admins add entries, anyone may browse.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{Book, CreateBookBody};
use crate::AppState;

use super::auth::Admin;
use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_author, validate_book_title, validate_copies};

fn validate_create_book(req: &CreateBookBody) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_book_title(&req.title) {
        errors.add("title", &e);
    }
    if let Err(e) = validate_author(&req.author) {
        errors.add("author", &e);
    }
    if let Some(copies) = req.available_copies {
        if let Err(e) = validate_copies(copies) {
            errors.add("availableCopies", &e);
        }
    }

    errors.finish()
}

/// Add a catalog entry. Admin only; copies default to 1.
pub async fn create_book(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Json(req): Json<CreateBookBody>,
) -> Result<(StatusCode, Json<Book>), ApiError> {
    validate_create_book(&req)?;

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let copies = req.available_copies.unwrap_or(1);

    sqlx::query(
        r#"
        INSERT INTO books (id, title, author, isbn, category, available_copies, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(req.title.trim())
    .bind(req.author.trim())
    .bind(req.isbn.as_deref().map(str::trim))
    .bind(req.category.as_deref().map(str::trim))
    .bind(copies)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create book: {}", e);
        ApiError::database("Failed to create book")
    })?;

    let book: Book = sqlx::query_as("SELECT * FROM books WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// List the catalog ordered by title. Public, no authentication.
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Book>>, ApiError> {
    let books: Vec<Book> = sqlx::query_as("SELECT * FROM books ORDER BY title ASC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(books))
}
