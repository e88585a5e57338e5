use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Everything the attendance core can refuse to do.
#[derive(Debug, Display, Clone, PartialEq)]
pub enum AttendanceError {
    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(fmt = "User is already clocked in")]
    AlreadyClockedIn,

    #[display(fmt = "User is already clocked out")]
    AlreadyClockedOut,

    #[display(fmt = "Time entry not found")]
    NotFound,

    #[display(fmt = "User not found")]
    UnknownUser,

    #[display(fmt = "A location is required to clock in")]
    LocationRequired,

    #[display(
        fmt = "You are {:.2} km from {}, outside the allowed {:.2} km radius",
        distance_km,
        fence_name,
        radius_km
    )]
    OutsideGeofence {
        fence_name: String,
        distance_km: f64,
        radius_km: f64,
    },
}

impl std::error::Error for AttendanceError {}

impl ResponseError for AttendanceError {
    fn status_code(&self) -> StatusCode {
        match self {
            AttendanceError::NotFound | AttendanceError::UnknownUser => StatusCode::NOT_FOUND,
            AttendanceError::AlreadyClockedIn | AttendanceError::AlreadyClockedOut => {
                StatusCode::CONFLICT
            }
            AttendanceError::Validation(_)
            | AttendanceError::LocationRequired
            | AttendanceError::OutsideGeofence { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AttendanceError::OutsideGeofence {
                distance_km,
                radius_km,
                ..
            } => json!({
                "error": self.to_string(),
                "distanceKm": distance_km,
                "radiusKm": radius_km,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
