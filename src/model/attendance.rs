use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per (user_id, date); the unique key on that pair is the
/// enforcement mechanism for the daily-record invariant.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 42)]
    pub user_id: u64,

    #[schema(example = "2025-11-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    /// Set by the first geolocation check-in of the day, overwritten by later
    /// same-day check-ins. NULL for a bare mark-present record.
    #[schema(example = "2025-11-01T09:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub check_in_time: Option<DateTime<Utc>>,

    #[schema(example = "2025-11-01T17:30:00Z", value_type = String, format = "date-time", nullable = true)]
    pub check_out_time: Option<DateTime<Utc>>,

    #[schema(example = 40.0, nullable = true)]
    pub latitude: Option<f64>,

    #[schema(example = -74.0005, nullable = true)]
    pub longitude: Option<f64>,

    /// Geofence verdict at check-in time.
    #[schema(example = true, nullable = true)]
    pub in_office: Option<bool>,

    /// Status snapshot taken at check-in; later status changes do not touch it.
    #[schema(example = "In Office", nullable = true)]
    pub status: Option<String>,

    #[schema(example = "2025-11-01T09:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,

    #[schema(example = "2025-11-01T09:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub updated_at: Option<DateTime<Utc>>,
}
