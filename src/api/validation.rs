//! Input validation for API requests.
//!
//! This module provides validation functions for API request data.
//! For collecting multiple validation errors and returning them as an ApiError,
//! use the `ValidationErrorBuilder` from the `error` module.

use crate::db::RequestStatus;

/// Validate a user's display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 100 {
        return Err("Name is too long (max 100 characters)".to_string());
    }

    Ok(())
}

/// Validate an email address.
/// Presence and length only; the address is treated as an opaque,
/// case-sensitive key, exactly as stored.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }

    Ok(())
}

/// Validate a book title (required, non-blank after trimming)
pub fn validate_book_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Book title is required".to_string());
    }

    if title.len() > 200 {
        return Err("Book title is too long (max 200 characters)".to_string());
    }

    Ok(())
}

/// Validate an author name (required for catalog entries)
pub fn validate_author(author: &str) -> Result<(), String> {
    if author.trim().is_empty() {
        return Err("Author is required".to_string());
    }

    if author.len() > 200 {
        return Err("Author is too long (max 200 characters)".to_string());
    }

    Ok(())
}

/// Validate a request status string
pub fn validate_status(status: &str) -> Result<RequestStatus, String> {
    status.parse::<RequestStatus>().map_err(|_| {
        "Invalid status. Must be one of: Pending, Approved, Rejected, Collected, Returned"
            .to_string()
    })
}

/// Validate an available-copies count
pub fn validate_copies(copies: i64) -> Result<(), String> {
    if copies < 0 {
        return Err("Available copies cannot be negative".to_string());
    }

    Ok(())
}
