//! Book request endpoints: creation, listing, and status updates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{
    BookRequest, CreateRequestBody, RequestListQuery, RequestStatus, UpdateStatusBody,
};
use crate::AppState;

use super::auth::{Admin, Identity};
use super::error::ApiError;
use super::validation::{validate_book_title, validate_status};

/// Create a book request for the authenticated caller.
/// Requester name/email always come from the verified identity, never from
/// the body, so one student cannot file a request as another.
pub async fn create_request(
    State(state): State<Arc<AppState>>,
    identity: Identity,
    Json(req): Json<CreateRequestBody>,
) -> Result<(StatusCode, Json<BookRequest>), ApiError> {
    let title = req.book_title.trim().to_string();
    if let Err(e) = validate_book_title(&title) {
        return Err(ApiError::validation_field("bookTitle", e));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let author = req.book_author.as_deref().map(str::trim);
    let notes = req.notes.as_deref().map(str::trim);
    let student_id = req.student_id.as_deref().map(str::trim).unwrap_or("");

    sqlx::query(
        r#"
        INSERT INTO requests
            (id, student_name, student_email, student_id, book_title, book_author,
             notes, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&identity.claims.name)
    .bind(&identity.claims.email)
    .bind(student_id)
    .bind(&title)
    .bind(author)
    .bind(notes)
    .bind(RequestStatus::Pending.to_string())
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create request: {}", e);
        ApiError::database("Failed to create request")
    })?;

    let request: BookRequest = sqlx::query_as("SELECT * FROM requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((StatusCode::CREATED, Json(request)))
}

/// List the caller's own requests, newest first
pub async fn list_my_requests(
    State(state): State<Arc<AppState>>,
    identity: Identity,
) -> Result<Json<Vec<BookRequest>>, ApiError> {
    let requests: Vec<BookRequest> = sqlx::query_as(
        "SELECT * FROM requests WHERE student_email = ? ORDER BY created_at DESC",
    )
    .bind(&identity.claims.email)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(requests))
}

/// List all requests, newest first, optionally filtered by requester email.
/// Admin only.
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Query(query): Query<RequestListQuery>,
) -> Result<Json<Vec<BookRequest>>, ApiError> {
    let requests: Vec<BookRequest> = match &query.email {
        Some(email) => {
            sqlx::query_as(
                "SELECT * FROM requests WHERE student_email = ? ORDER BY created_at DESC",
            )
            .bind(email)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM requests ORDER BY created_at DESC")
                .fetch_all(&state.db)
                .await?
        }
    };

    Ok(Json(requests))
}

/// Replace a request's status. Admin only.
/// Any recognized status may replace any other; the lifecycle deliberately
/// enforces no transition graph. Single-statement update, last write wins.
pub async fn update_request_status(
    State(state): State<Arc<AppState>>,
    _admin: Admin,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusBody>,
) -> Result<Json<BookRequest>, ApiError> {
    let status =
        validate_status(&req.status).map_err(|e| ApiError::validation_field("status", e))?;

    let now = chrono::Utc::now().to_rfc3339();
    let result = sqlx::query("UPDATE requests SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status.to_string())
        .bind(&now)
        .bind(&id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Request not found"));
    }

    let request: BookRequest = sqlx::query_as("SELECT * FROM requests WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::{ensure_admin_user, login, register};
    use crate::config::Config;
    use crate::db::{LoginRequest, RegisterRequest, Role};
    use crate::token::Claims;
    use axum::response::IntoResponse;

    async fn test_state() -> Arc<AppState> {
        let db = crate::db::connect_memory().await.expect("in-memory database");
        Arc::new(AppState::new(Config::default(), db))
    }

    /// Build an Identity without going through the HTTP layer
    fn identity_for(name: &str, email: &str, role: Role) -> Identity {
        let now = chrono::Utc::now().timestamp();
        Identity {
            claims: Claims {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                email: email.to_string(),
                role: role.to_string(),
                iat: now,
                exp: now + 3600,
            },
        }
    }

    fn admin_identity() -> Admin {
        Admin(identity_for("Administrator", "admin@library.local", Role::Admin))
    }

    fn create_body(title: &str) -> CreateRequestBody {
        CreateRequestBody {
            book_title: title.to_string(),
            book_author: None,
            notes: None,
            student_id: None,
        }
    }

    async fn create_for(
        state: &Arc<AppState>,
        identity: &Identity,
        body: CreateRequestBody,
    ) -> BookRequest {
        let (status, Json(request)) =
            create_request(State(state.clone()), identity.clone(), Json(body))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        request
    }

    #[tokio::test]
    async fn test_create_request_starts_pending_with_caller_identity() {
        let state = test_state().await;
        let ada = identity_for("Ada", "s1@x.com", Role::Student);

        let request = create_for(
            &state,
            &ada,
            CreateRequestBody {
                book_title: "Dune".to_string(),
                book_author: Some("Herbert".to_string()),
                notes: Some("for class".to_string()),
                student_id: Some("S-042".to_string()),
            },
        )
        .await;

        assert_eq!(request.status_enum(), RequestStatus::Pending);
        assert_eq!(request.book_title, "Dune");
        assert_eq!(request.book_author.as_deref(), Some("Herbert"));
        assert_eq!(request.student_id, "S-042");
        // Identity comes from the token, not the body
        assert_eq!(request.student_name, "Ada");
        assert_eq!(request.student_email, "s1@x.com");
    }

    #[tokio::test]
    async fn test_create_request_trims_title_and_rejects_blank() {
        let state = test_state().await;
        let ada = identity_for("Ada", "s1@x.com", Role::Student);

        let request = create_for(&state, &ada, create_body("  Dune  ")).await;
        assert_eq!(request.book_title, "Dune");

        let err = create_request(
            State(state.clone()),
            ada.clone(),
            Json(create_body("   \t ")),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_my_requests_is_scoped_to_caller() {
        let state = test_state().await;
        let ada = identity_for("Ada", "s1@x.com", Role::Student);
        let ben = identity_for("Ben", "s2@x.com", Role::Student);

        create_for(&state, &ada, create_body("Dune")).await;

        let Json(ada_requests) = list_my_requests(State(state.clone()), ada.clone())
            .await
            .unwrap();
        assert_eq!(ada_requests.len(), 1);
        assert_eq!(ada_requests[0].student_email, "s1@x.com");

        let Json(ben_requests) = list_my_requests(State(state.clone()), ben.clone())
            .await
            .unwrap();
        assert!(ben_requests.is_empty());
    }

    #[tokio::test]
    async fn test_list_requests_orders_newest_first_and_filters_by_email() {
        let state = test_state().await;
        let ada = identity_for("Ada", "s1@x.com", Role::Student);
        let ben = identity_for("Ben", "s2@x.com", Role::Student);

        // Distinct created_at values: bump the first row into the past
        let first = create_for(&state, &ada, create_body("Dune")).await;
        sqlx::query("UPDATE requests SET created_at = '2020-01-01T00:00:00+00:00' WHERE id = ?")
            .bind(&first.id)
            .execute(&state.db)
            .await
            .unwrap();
        create_for(&state, &ben, create_body("1984")).await;

        let Json(all) = list_requests(
            State(state.clone()),
            admin_identity(),
            Query(RequestListQuery { email: None }),
        )
        .await
        .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].book_title, "1984");
        assert_eq!(all[1].book_title, "Dune");

        let Json(filtered) = list_requests(
            State(state.clone()),
            admin_identity(),
            Query(RequestListQuery {
                email: Some("s1@x.com".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].student_email, "s1@x.com");
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_value_before_lookup() {
        let state = test_state().await;

        let err = update_request_status(
            State(state.clone()),
            admin_identity(),
            Path("no-such-id".to_string()),
            Json(UpdateStatusBody {
                status: "Bogus".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_status_unknown_id_is_not_found() {
        let state = test_state().await;

        let err = update_request_status(
            State(state.clone()),
            admin_identity(),
            Path(Uuid::new_v4().to_string()),
            Json(UpdateStatusBody {
                status: "Approved".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_status_replaces_status_and_nothing_else() {
        let state = test_state().await;
        let ada = identity_for("Ada", "s1@x.com", Role::Student);

        let created = create_for(
            &state,
            &ada,
            CreateRequestBody {
                book_title: "Dune".to_string(),
                book_author: Some("Herbert".to_string()),
                notes: Some("for class".to_string()),
                student_id: None,
            },
        )
        .await;

        let Json(updated) = update_request_status(
            State(state.clone()),
            admin_identity(),
            Path(created.id.clone()),
            Json(UpdateStatusBody {
                status: "Approved".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.status_enum(), RequestStatus::Approved);
        assert_eq!(updated.book_title, "Dune");
        assert_eq!(updated.book_author.as_deref(), Some("Herbert"));
        assert_eq!(updated.notes.as_deref(), Some("for class"));
    }

    #[tokio::test]
    async fn test_update_status_allows_any_transition() {
        let state = test_state().await;
        let ada = identity_for("Ada", "s1@x.com", Role::Student);
        let created = create_for(&state, &ada, create_body("Dune")).await;

        // No transition graph: Returned may go straight back to Pending
        for status in ["Returned", "Pending", "Collected"] {
            let Json(updated) = update_request_status(
                State(state.clone()),
                admin_identity(),
                Path(created.id.clone()),
                Json(UpdateStatusBody {
                    status: status.to_string(),
                }),
            )
            .await
            .unwrap();
            assert_eq!(updated.status, status);
        }
    }

    #[tokio::test]
    async fn test_student_cannot_update_status() {
        let state = test_state().await;
        let ada = identity_for("Ada", "s1@x.com", Role::Student);
        let created = create_for(&state, &ada, create_body("Dune")).await;

        // The role gate sits in front of the handler
        let err = ada.require_role(Role::Admin).unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

        // And the stored status is untouched
        let stored: BookRequest = sqlx::query_as("SELECT * FROM requests WHERE id = ?")
            .bind(&created.id)
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(stored.status_enum(), RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_full_request_lifecycle() {
        let state = test_state().await;

        // Register student A and log in
        register(
            State(state.clone()),
            Json(RegisterRequest {
                name: "Ada".to_string(),
                email: "s1@x.com".to_string(),
                password: "hunter2".to_string(),
            }),
        )
        .await
        .unwrap();
        let Json(auth) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "s1@x.com".to_string(),
                password: "hunter2".to_string(),
            }),
        )
        .await
        .unwrap();
        let ada = Identity {
            claims: state.tokens.verify(&auth.token).unwrap(),
        };

        // Create a request and see it in the student's own list
        create_for(&state, &ada, create_body("1984")).await;
        let Json(own) = list_my_requests(State(state.clone()), ada.clone())
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].status_enum(), RequestStatus::Pending);

        // Log in as admin and find it in the full list
        ensure_admin_user(&state.db, "admin@library.local", "s3cret")
            .await
            .unwrap();
        let Json(admin_auth) = login(
            State(state.clone()),
            Json(LoginRequest {
                email: "admin@library.local".to_string(),
                password: "s3cret".to_string(),
            }),
        )
        .await
        .unwrap();
        let admin = Admin(Identity {
            claims: state.tokens.verify(&admin_auth.token).unwrap(),
        });

        let Json(all) = list_requests(
            State(state.clone()),
            admin.clone(),
            Query(RequestListQuery { email: None }),
        )
        .await
        .unwrap();
        assert_eq!(all.len(), 1);
        let id = all[0].id.clone();

        // Admin marks it collected; both views reflect the change
        update_request_status(
            State(state.clone()),
            admin.clone(),
            Path(id),
            Json(UpdateStatusBody {
                status: "Collected".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(all) = list_requests(
            State(state.clone()),
            admin,
            Query(RequestListQuery { email: None }),
        )
        .await
        .unwrap();
        assert_eq!(all[0].status_enum(), RequestStatus::Collected);

        let Json(own) = list_my_requests(State(state.clone()), ada).await.unwrap();
        assert_eq!(own[0].status_enum(), RequestStatus::Collected);
    }
}
