use crate::auth::auth::AuthUser;
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct TeamQuery {
    /// Search by name or status
    #[schema(example = "In Office")]
    pub search: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub per_page: Option<u32>,
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct TeamMember {
    #[schema(example = 2)]
    pub id: u64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "Full Stack Developer")]
    pub department: String,
    #[schema(example = "In Office")]
    pub status: String,
    #[schema(example = "2025-11-01T09:00:00Z", value_type = String, format = "date-time")]
    pub status_updated_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct TeamListResponse {
    pub data: Vec<TeamMember>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 25)]
    pub total: i64,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

/// Team listing with status, freshest status first
#[utoipa::path(
    get,
    path = "/api/team",
    params(TeamQuery),
    responses(
        (status = 200, description = "Paginated team list", body = TeamListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Team"
)]
pub async fn list_team(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TeamQuery>,
) -> actix_web::Result<impl Responder> {
    let per_page = query.per_page.unwrap_or(10).clamp(1, 100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause (always excludes the requesting user)
    // -------------------------
    let like = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s));

    let mut where_sql = String::from(" WHERE id != ? AND is_active = TRUE");
    let mut args: Vec<FilterValue> = vec![FilterValue::U64(auth.user_id)];

    if let Some(like) = &like {
        where_sql.push_str(" AND (name LIKE ? OR status LIKE ?)");
        args.push(FilterValue::Str(like));
        args.push(FilterValue::Str(like));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM users{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count team members");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        r#"
        SELECT id, name, department, status, status_updated_at
        FROM users
        {}
        ORDER BY status_updated_at DESC
        LIMIT ? OFFSET ?
        "#,
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, TeamMember>(&data_sql);
    for arg in &args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(*v),
            FilterValue::Str(s) => data_q.bind(*s),
        };
    }

    let members = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch team list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(TeamListResponse {
        data: members,
        page,
        per_page,
        total,
    }))
}

/// Single member profile
#[utoipa::path(
    get,
    path = "/api/team/{user_id}",
    params(
        ("user_id", Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Member found", body = TeamMember),
        (status = 404, description = "Member not found", body = Object, example = json!({
            "message": "Member not found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Team"
)]
pub async fn get_member(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let user_id = path.into_inner();

    let member = sqlx::query_as::<_, TeamMember>(
        r#"
        SELECT id, name, department, status, status_updated_at
        FROM users
        WHERE id = ? AND is_active = TRUE
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id, "Failed to fetch member");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match member {
        Some(m) => Ok(HttpResponse::Ok().json(m)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Member not found"
        }))),
    }
}
