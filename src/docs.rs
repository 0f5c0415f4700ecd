use crate::api::attendance::{
    AttendanceQuery, CheckInRequest, CheckInResponse, CheckOutResponse, MarkPresentResponse,
    MonthAttendanceResponse,
};
use crate::api::profile::ProfileResponse;
use crate::api::status::{StatusResponse, UpdateStatusRequest};
use crate::api::team::{TeamListResponse, TeamMember, TeamQuery};
use crate::geofence::GeoPoint;
use crate::model::attendance::AttendanceRecord;
use crate::model::presence::PresenceStatus;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Presence Tracker API",
        version = "1.0.0",
        description = r#"
## Employee Presence & Attendance Tracker

Tracks where people are relative to the office geofence, when they arrived
and left on a given day, and their current activity status.

### Key Features
- **Geolocation check-in / check-out**
  - Distance to the office is computed server-side; being inside the radius
    sets the status to In Office, outside to Out of Office
- **Daily attendance ledger**
  - Exactly one record per user per day; re-check-in updates it in place
- **Presence status**
  - Five activity states, manually settable and synchronized with check-in
- **Monthly attendance view and team listing**

### Security
All tracking endpoints require **JWT Bearer authentication**.

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::mark_present,
        crate::api::attendance::my_attendance,

        crate::api::status::update_status,
        crate::api::status::get_status,

        crate::api::team::list_team,
        crate::api::team::get_member,

        crate::api::profile::get_profile,
        crate::api::profile::update_profile
    ),
    components(
        schemas(
            CheckInRequest,
            CheckInResponse,
            CheckOutResponse,
            MarkPresentResponse,
            AttendanceQuery,
            MonthAttendanceResponse,
            AttendanceRecord,
            UpdateStatusRequest,
            StatusResponse,
            TeamQuery,
            TeamMember,
            TeamListResponse,
            ProfileResponse,
            GeoPoint,
            PresenceStatus
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in, check-out and daily attendance APIs"),
        (name = "Presence", description = "Presence status APIs"),
        (name = "Team", description = "Team presence listing APIs"),
        (name = "Profile", description = "Own profile APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
