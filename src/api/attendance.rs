use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::geofence::{GeoPoint, Geofence};
use crate::model::attendance::AttendanceRecord;
use crate::model::presence::PresenceStatus;
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CheckInRequest {
    #[schema(example = 40.0)]
    pub latitude: Option<f64>,
    #[schema(example = -74.0005)]
    pub longitude: Option<f64>,
}

#[derive(Serialize, ToSchema)]
pub struct CheckInResponse {
    #[schema(example = "In Office")]
    pub status: String,
    #[schema(example = true)]
    pub in_office: bool,
    /// Distance to the office center, whole meters
    #[schema(example = 43)]
    pub distance_m: i64,
    #[schema(example = "2025-11-01T09:00:00Z", value_type = String, format = "date-time")]
    pub check_in_time: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
pub struct CheckOutResponse {
    #[schema(example = "2025-11-01T17:30:00Z", value_type = String, format = "date-time")]
    pub check_out_time: DateTime<Utc>,
    #[schema(example = 510)]
    pub duration_minutes: i64,
}

#[derive(Serialize, ToSchema)]
pub struct MarkPresentResponse {
    #[schema(example = "2025-11-01", value_type = String, format = "date")]
    pub date: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    /// Calendar month window, strict YYYY-MM
    #[schema(example = "2025-11")]
    pub month: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct MonthAttendanceResponse {
    #[schema(example = "2025-11")]
    pub month: String,
    pub data: Vec<AttendanceRecord>,
}

/// Calendar day an instant falls on in the configured reference timezone.
pub fn day_key(now: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    now.with_timezone(&offset).date_naive()
}

/// Whole minutes between check-in and check-out, rounded.
fn duration_minutes(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> i64 {
    ((check_out - check_in).num_seconds() as f64 / 60.0).round() as i64
}

/// Strict YYYY-MM -> [first of month, first of next month).
fn parse_month(month: &str) -> Option<(NaiveDate, NaiveDate)> {
    let bytes = month.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return None;
    }
    if !bytes[..4].iter().all(|b| b.is_ascii_digit())
        || !bytes[5..].iter().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let year: i32 = month[..4].parse().ok()?;
    let mon: u32 = month[5..].parse().ok()?;

    let start = NaiveDate::from_ymd_opt(year, mon, 1)?;
    let end = if mon == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, mon + 1, 1)?
    };

    Some((start, end))
}

/// Geolocation check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckInRequest,
    responses(
        (status = 200, description = "Checked in", body = CheckInResponse),
        (status = 400, description = "Missing or invalid coordinates", body = Object, example = json!({
            "message": "Location required"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    fence: web::Data<Geofence>,
    payload: web::Json<CheckInRequest>,
) -> actix_web::Result<impl Responder> {
    let point = match (payload.latitude, payload.longitude) {
        (Some(latitude), Some(longitude)) => GeoPoint {
            latitude,
            longitude,
        },
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Location required"
            })))
        }
    };

    if !point.is_valid() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Location coordinates out of range"
        })));
    }

    let eval = fence.evaluate(point);
    let status = if eval.in_radius {
        PresenceStatus::InOffice
    } else {
        PresenceStatus::OutOfOffice
    };
    let now = Utc::now();

    // The location signal is authoritative over any manually set status.
    // The timestamp guard only skips the write if a newer one already landed.
    sqlx::query(
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
        tracing::error!(error = %e, user_id = auth.user_id, "Status update on check-in failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let date = day_key(now, config.reference_offset());

    // Atomic create-or-update on the (user_id, date) unique key. Concurrent
    // first check-ins serialize behind the winner; a same-day re-check-in
    // overwrites the check-in fields of the existing record.
    sqlx::query(
        r#"
        INSERT INTO attendance
            (user_id, date, check_in_time, latitude, longitude, in_office, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON DUPLICATE KEY UPDATE
            check_in_time = VALUES(check_in_time),
            latitude = VALUES(latitude),
            longitude = VALUES(longitude),
            in_office = VALUES(in_office),
            status = VALUES(status)
        "#,
    )
    .bind(auth.user_id)
    .bind(date)
    .bind(now)
    .bind(point.latitude)
    .bind(point.longitude)
    .bind(eval.in_radius)
    .bind(status.to_string())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Check-in upsert failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(CheckInResponse {
        status: status.to_string(),
        in_office: eval.in_radius,
        distance_m: eval.distance_m as i64,
        check_in_time: now,
    }))
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    responses(
        (status = 200, description = "Checked out", body = CheckOutResponse),
        (status = 400, description = "No active check-in, or already checked out", body = Object, example = json!({
            "message": "No check-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now();
    let date = day_key(now, config.reference_offset());

    let record = sqlx::query_as::<_, (Option<DateTime<Utc>>, Option<DateTime<Utc>>)>(
        r#"
        SELECT check_in_time, check_out_time
        FROM attendance
        WHERE user_id = ? AND date = ?
        "#,
    )
    .bind(auth.user_id)
    .bind(date)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Check-out lookup failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    let check_in_time = match record {
        Some((Some(check_in), None)) => check_in,
        Some((_, Some(_))) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Already checked out"
            })))
        }
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "No check-in found for today"
            })))
        }
    };

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out_time = ?
        WHERE user_id = ?
        AND date = ?
        AND check_in_time IS NOT NULL
        AND check_out_time IS NULL
        "#,
    )
    .bind(now)
    .bind(auth.user_id)
    .bind(date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // zero rows here means a concurrent check-out won between the read and the write
    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Already checked out"
        })));
    }

    Ok(HttpResponse::Ok().json(CheckOutResponse {
        check_out_time: now,
        duration_minutes: duration_minutes(check_in_time, now),
    }))
}

/// Bare presence acknowledgement, no geolocation
#[utoipa::path(
    post,
    path = "/api/attendance",
    responses(
        (status = 201, description = "Attendance marked for today", body = MarkPresentResponse),
        (status = 400, description = "Already marked today", body = Object, example = json!({
            "message": "Already marked attendance for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_present(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let now = Utc::now();
    let date = day_key(now, config.reference_offset());

    let result = sqlx::query("INSERT INTO attendance (user_id, date) VALUES (?, ?)")
        .bind(auth.user_id)
        .bind(date)
        .execute(pool.get_ref())
        .await;

    match result {
        Ok(_) => Ok(HttpResponse::Created().json(MarkPresentResponse { date })),

        Err(e) => {
            // the (user_id, date) unique key already holds a record
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(json!({
                        "message": "Already marked attendance for today"
                    })));
                }
            }

            tracing::error!(error = %e, user_id = auth.user_id, "Mark present failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Own attendance for a calendar month
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Records for the month, ascending by date", body = MonthAttendanceResponse),
        (status = 400, description = "Malformed month", body = Object, example = json!({
            "message": "Invalid month, expected YYYY-MM"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let month = match query.month.as_deref() {
        Some(m) => m,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "month query parameter required (YYYY-MM)"
            })))
        }
    };

    let (start, end) = match parse_month(month) {
        Some(window) => window,
        None => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Invalid month, expected YYYY-MM"
            })))
        }
    };

    let records = sqlx::query_as::<_, AttendanceRecord>(
        r#"
        SELECT id, user_id, date, check_in_time, check_out_time,
               latitude, longitude, in_office, status, created_at, updated_at
        FROM attendance
        WHERE user_id = ? AND date >= ? AND date < ?
        ORDER BY date ASC
        "#,
    )
    .bind(auth.user_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, month, "Failed to fetch attendance");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(MonthAttendanceResponse {
        month: month.to_string(),
        data: records,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn month_window_covers_exactly_one_month() {
        let (start, end) = parse_month("2025-11").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (start, end) = parse_month("2025-12").unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn rejects_malformed_months() {
        assert!(parse_month("2025-13").is_none());
        assert!(parse_month("2025-00").is_none());
        assert!(parse_month("2025-1").is_none());
        assert!(parse_month("25-11").is_none());
        assert!(parse_month("2025/11").is_none());
        assert!(parse_month("2025-11-01").is_none());
        assert!(parse_month("").is_none());
    }

    #[test]
    fn full_workday_is_510_minutes() {
        let check_in = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2025, 11, 1, 17, 30, 0).unwrap();
        assert_eq!(duration_minutes(check_in, check_out), 510);
    }

    #[test]
    fn sub_minute_durations_round() {
        let check_in = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 0).unwrap();
        let check_out = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 29).unwrap();
        assert_eq!(duration_minutes(check_in, check_out), 0);

        let check_out = Utc.with_ymd_and_hms(2025, 11, 1, 9, 0, 30).unwrap();
        assert_eq!(duration_minutes(check_in, check_out), 1);
    }

    #[test]
    fn day_key_follows_reference_offset() {
        let instant = Utc.with_ymd_and_hms(2025, 11, 1, 23, 30, 0).unwrap();

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(
            day_key(instant, utc),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
        );

        // two hours east: already past midnight locally
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            day_key(instant, east),
            NaiveDate::from_ymd_opt(2025, 11, 2).unwrap()
        );

        // one hour west of UTC at 00:30Z: still the previous day
        let after_midnight = Utc.with_ymd_and_hms(2025, 11, 2, 0, 30, 0).unwrap();
        let west = FixedOffset::west_opt(3600).unwrap();
        assert_eq!(
            day_key(after_midnight, west),
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap()
        );
    }
}
