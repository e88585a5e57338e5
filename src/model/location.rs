use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AttendanceError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({ "latitude": 51.5074, "longitude": -0.1278 }))]
pub struct Location {
    #[schema(example = 51.5074)]
    pub latitude: f64,
    #[schema(example = json!(-0.1278))]
    pub longitude: f64,
}

impl Location {
    /// Builds a location, rejecting coordinates outside the WGS84 ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AttendanceError> {
        let location = Self {
            latitude,
            longitude,
        };
        location.validate()?;
        Ok(location)
    }

    /// A location is only meaningful when both halves were supplied.
    pub fn from_parts(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, AttendanceError> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            _ => Ok(None),
        }
    }

    pub fn validate(&self) -> Result<(), AttendanceError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AttendanceError::Validation(format!(
                "latitude must be between -90 and 90, got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AttendanceError::Validation(format!(
                "longitude must be between -180 and 180, got {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
