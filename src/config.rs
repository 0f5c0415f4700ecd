use std::env;
use dotenvy::dotenv;
use chrono::FixedOffset;
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Office geofence, loaded once at startup and never mutated
    pub office_latitude: f64,
    pub office_longitude: f64,
    pub office_radius_m: f64,

    /// Reference offset (minutes east of UTC) for attendance day keys.
    /// All day-boundary math uses this, not ambient server local time.
    pub tz_offset_minutes: i32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .unwrap(),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_register_per_min: env::var("RATE_REGISTER_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_refresh_per_min: env::var("RATE_REFRESH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            office_latitude: env::var("OFFICE_LAT")
                .expect("OFFICE_LAT must be set")
                .parse()
                .expect("OFFICE_LAT must be a valid number"),
            office_longitude: env::var("OFFICE_LNG")
                .expect("OFFICE_LNG must be set")
                .parse()
                .expect("OFFICE_LNG must be a valid number"),
            office_radius_m: env::var("OFFICE_RADIUS_M")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap(),

            tz_offset_minutes: env::var("TZ_OFFSET_MINUTES")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .unwrap(),
        }
    }

    /// Fixed reference timezone used to normalize day keys.
    pub fn reference_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_minutes * 60).expect("TZ_OFFSET_MINUTES out of range")
    }
}
