//! Book request models and status lifecycle.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a book request.
///
/// Transitions are admin-only and deliberately unconstrained: any status may
/// move to any other. The serialized form is the capitalized variant name,
/// matching the wire format clients already rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Collected,
    Returned,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Collected,
        RequestStatus::Returned,
    ];
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
            RequestStatus::Collected => write!(f, "Collected"),
            RequestStatus::Returned => write!(f, "Returned"),
        }
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    // Exact-case match: "pending" is not a recognized status value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(RequestStatus::Pending),
            "Approved" => Ok(RequestStatus::Approved),
            "Rejected" => Ok(RequestStatus::Rejected),
            "Collected" => Ok(RequestStatus::Collected),
            "Returned" => Ok(RequestStatus::Returned),
            _ => Err(format!("Unknown request status: {}", s)),
        }
    }
}

/// A student's ask for a title, tracked through the status lifecycle.
/// Requester name/email are captured from the authenticated identity at
/// creation time and are not client-supplied.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub id: String,
    pub student_name: String,
    pub student_email: String,
    pub student_id: String,
    pub book_title: String,
    pub book_author: Option<String>,
    pub notes: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl BookRequest {
    /// Get the status as a RequestStatus enum
    pub fn status_enum(&self) -> RequestStatus {
        self.status
            .parse()
            .unwrap_or(RequestStatus::Pending)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequestBody {
    pub book_title: String,
    pub book_author: Option<String>,
    pub notes: Option<String>,
    pub student_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
    pub status: String,
}

/// Query parameters accepted by the admin request listing.
#[derive(Debug, Deserialize)]
pub struct RequestListQuery {
    /// Exact-match filter on the requester's email.
    pub email: Option<String>,
}
