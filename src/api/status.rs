use crate::auth::auth::AuthUser;
use crate::model::presence::PresenceStatus;
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "In Meeting")]
    pub status: String,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct StatusResponse {
    #[schema(example = "In Meeting")]
    pub status: String,
    #[schema(example = "2025-11-01T09:00:00Z", value_type = String, format = "date-time")]
    pub status_updated_at: DateTime<Utc>,
}

/// Manual status update
#[utoipa::path(
    patch,
    path = "/api/status",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusResponse),
        (status = 400, description = "Unknown status value", body = Object, example = json!({
            "message": "Invalid status. Allowed: In Office, Out of Office, In Meeting, On Break, On Leave"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "A newer status write already landed", body = Object, example = json!({
            "message": "Status was updated more recently, refresh and retry"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Presence"
)]
pub async fn update_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdateStatusRequest>,
) -> actix_web::Result<impl Responder> {
    let status = match PresenceStatus::from_str(&payload.status) {
        Ok(s) => s,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": format!("Invalid status. Allowed: {}", PresenceStatus::ALLOWED)
            })))
        }
    };

    let now = Utc::now();

    // Optimistic write: a manual update that raced a newer signal loses and
    // is reported as a conflict instead of silently clobbering it.
    let result = sqlx::query(
        r#"
        UPDATE users
        SET status = ?, status_updated_at = ?
        WHERE id = ? AND status_updated_at <= ?
        "#,
    )
    .bind(status.to_string())
    .bind(now)
    .bind(auth.user_id)
    .bind(now)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Status update failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Status was updated more recently, refresh and retry"
        })));
    }

    Ok(HttpResponse::Ok().json(StatusResponse {
        status: status.to_string(),
        status_updated_at: now,
    }))
}

/// Current status
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Current status", body = StatusResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Presence"
)]
pub async fn get_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let status = sqlx::query_as::<_, StatusResponse>(
        r#"
        SELECT status, status_updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch status");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match status {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        }))),
    }
}
