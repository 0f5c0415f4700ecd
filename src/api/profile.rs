use crate::{
    auth::auth::AuthUser,
    utils::db_utils::{build_update_sql, execute_update},
};
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use sqlx::MySqlPool;
use utoipa::ToSchema;

/// Fields a user may change about themselves. Everything else on the row
/// (status, role, email) has its own write path.
const UPDATABLE: &[&str] = &["name", "phone", "department"];

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct ProfileResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "jane.doe@company.com")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,
    #[schema(example = "Full Stack Developer")]
    pub department: String,
    #[schema(example = 2)]
    pub role_id: u8,
    #[schema(example = "Out of Office")]
    pub status: String,
    #[schema(example = "2025-11-01T09:00:00Z", value_type = String, format = "date-time")]
    pub status_updated_at: DateTime<Utc>,
}

/// Own profile
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Profile fetched", body = ProfileResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let profile = sqlx::query_as::<_, ProfileResponse>(
        r#"
        SELECT id, email, name, phone, department, role_id, status, status_updated_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(auth.user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to fetch profile");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match profile {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        }))),
    }
}

/// Partial profile update (name, phone, department)
#[utoipa::path(
    put,
    path = "/api/me",
    request_body = Object,
    responses(
        (status = 200, description = "Profile updated", body = Object, example = json!({
            "message": "Profile updated successfully"
        })),
        (status = 400, description = "Unknown or malformed field"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let update = build_update_sql("users", UPDATABLE, &body, "id", auth.user_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "User not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Profile updated successfully"
    })))
}
