use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    model::{
        geofence::{GeoFence, NewGeoFence},
        location::Location,
    },
    service::AttendanceService,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct PerimeterRequest {
    #[schema(example = "Main Office")]
    pub name: String,
    #[schema(example = 51.5074)]
    pub latitude: f64,
    #[schema(example = json!(-0.1278))]
    pub longitude: f64,
    /// Radius in kilometres
    #[schema(example = 2.0)]
    pub radius: f64,
}

/// Currently active geofence, `null` when none is configured
#[utoipa::path(
    get,
    path = "/api/perimeter",
    responses(
        (status = 200, description = "Active geofence", body = GeoFence)
    ),
    tag = "Perimeter"
)]
pub async fn get_active(service: web::Data<AttendanceService>) -> impl Responder {
    HttpResponse::Ok().json(service.active_fence())
}

/// Replace the active geofence
#[utoipa::path(
    post,
    path = "/api/perimeter",
    request_body(content = PerimeterRequest, content_type = "application/json"),
    responses(
        (status = 200, description = "New active geofence", body = GeoFence),
        (status = 400, description = "Invalid fence parameters", body = Object, example = json!({
            "error": "radius must be a positive number of kilometres, got 0"
        }))
    ),
    tag = "Perimeter"
)]
pub async fn replace_active(
    service: web::Data<AttendanceService>,
    payload: web::Json<PerimeterRequest>,
) -> actix_web::Result<impl Responder> {
    let PerimeterRequest {
        name,
        latitude,
        longitude,
        radius,
    } = payload.into_inner();

    let fence = service.replace_active_fence(NewGeoFence {
        name,
        center: Location {
            latitude,
            longitude,
        },
        radius_km: radius,
    })?;

    Ok(HttpResponse::Ok().json(fence))
}
