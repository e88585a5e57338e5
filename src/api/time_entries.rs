use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    model::{
        location::Location,
        time_entry::{EntryFilter, TimeEntry},
    },
    service::AttendanceService,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockInRequest {
    #[schema(example = "user-1")]
    pub user_id: String,
    #[schema(example = 51.5074)]
    pub latitude: Option<f64>,
    #[schema(example = json!(-0.1278))]
    pub longitude: Option<f64>,
    #[schema(example = "Starting morning shift")]
    pub note: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClockOutRequest {
    #[schema(example = 51.5074)]
    pub latitude: Option<f64>,
    #[schema(example = json!(-0.1278))]
    pub longitude: Option<f64>,
    #[schema(example = "End of shift")]
    pub note: Option<String>,
}

/// List time entries, newest first
#[utoipa::path(
    get,
    path = "/api/time-entries",
    params(EntryFilter),
    responses(
        (status = 200, description = "Matching time entries", body = [TimeEntry]),
        (status = 400, description = "Malformed filter")
    ),
    tag = "Time entries"
)]
pub async fn list_entries(
    service: web::Data<AttendanceService>,
    filter: web::Query<EntryFilter>,
) -> actix_web::Result<impl Responder> {
    let entries = service.query_entries(&filter);
    tracing::debug!(count = entries.len(), ?filter, "Listed time entries");
    Ok(HttpResponse::Ok().json(entries))
}

/// Clock in
#[utoipa::path(
    post,
    path = "/api/time-entries",
    request_body(
        content = ClockInRequest,
        description = "Clock-in payload; location is used only when both coordinates are given",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Clocked in", body = TimeEntry),
        (status = 400, description = "Outside the active geofence or invalid payload", body = Object, example = json!({
            "error": "You are 11.44 km from Main Office, outside the allowed 2.00 km radius",
            "distanceKm": 11.44,
            "radiusKm": 2.0
        })),
        (status = 404, description = "User not found"),
        (status = 409, description = "User is already clocked in", body = Object, example = json!({
            "error": "User is already clocked in"
        }))
    ),
    tag = "Time entries"
)]
pub async fn clock_in(
    service: web::Data<AttendanceService>,
    payload: web::Json<ClockInRequest>,
) -> actix_web::Result<impl Responder> {
    let ClockInRequest {
        user_id,
        latitude,
        longitude,
        note,
    } = payload.into_inner();

    let location = Location::from_parts(latitude, longitude)?;
    let entry = service.record_clock_in(&user_id, location, note)?;

    Ok(HttpResponse::Ok().json(entry))
}

/// Clock out of an open entry
#[utoipa::path(
    patch,
    path = "/api/time-entries/{id}",
    params(("id" = String, Path, description = "Time entry id")),
    request_body(content = ClockOutRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "Clocked out", body = TimeEntry),
        (status = 404, description = "Time entry not found", body = Object, example = json!({
            "error": "Time entry not found"
        })),
        (status = 409, description = "User is already clocked out")
    ),
    tag = "Time entries"
)]
pub async fn clock_out(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    payload: Option<web::Json<ClockOutRequest>>,
) -> actix_web::Result<impl Responder> {
    let entry_id = path.into_inner();
    let ClockOutRequest {
        latitude,
        longitude,
        note,
    } = payload.map(|p| p.into_inner()).unwrap_or_default();

    let location = Location::from_parts(latitude, longitude)?;
    let entry = service.record_clock_out(&entry_id, location, note)?;

    Ok(HttpResponse::Ok().json(entry))
}
