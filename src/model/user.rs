use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub department: String,
    pub role_id: u8,
    pub status: String,
    pub status_updated_at: DateTime<Utc>,
    pub is_active: bool,
}
