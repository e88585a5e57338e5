use crate::api::{
    perimeter::PerimeterRequest,
    time_entries::{ClockInRequest, ClockOutRequest},
    users::CreateUser,
};
use crate::model::{
    analytics::{AnalyticsSummary, DailyStat, UserStat},
    geofence::GeoFence,
    location::Location,
    role::Role,
    time_entry::{ClockEvent, EntryStatus, TimeEntry},
    user::User,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Caretime Attendance API",
        version = "0.1.0",
        description = r#"
## Geofenced time and attendance

Care workers clock in and out of shifts; managers configure the working area
and review hours worked.

### Key Features
- **Time entries**
  - Clock in (checked against the active geofence) and clock out
  - List entries by user, status and trailing window
- **Perimeter**
  - One active circular geofence at a time, replaced rather than edited
- **Analytics**
  - Hours per day and per user over a trailing window

### Errors
Every failure returns `{ "error": "<message>" }` with a 400, 404 or 409 status.
Geofence rejections also carry `distanceKm` and `radiusKm`.
"#,
    ),
    paths(
        crate::api::time_entries::list_entries,
        crate::api::time_entries::clock_in,
        crate::api::time_entries::clock_out,

        crate::api::perimeter::get_active,
        crate::api::perimeter::replace_active,

        crate::api::users::list_users,
        crate::api::users::create_user,

        crate::api::analytics::summary
    ),
    components(
        schemas(
            Location,
            GeoFence,
            ClockEvent,
            EntryStatus,
            TimeEntry,
            Role,
            User,
            DailyStat,
            UserStat,
            AnalyticsSummary,
            ClockInRequest,
            ClockOutRequest,
            PerimeterRequest,
            CreateUser
        )
    ),
    tags(
        (name = "Time entries", description = "Clock in, clock out and history"),
        (name = "Perimeter", description = "Geofence configuration"),
        (name = "Users", description = "Care workers and managers"),
        (name = "Analytics", description = "Aggregated hours"),
    )
)]
pub struct ApiDoc;
