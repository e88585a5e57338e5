use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AttendanceError, model::role::Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "user-1")]
    pub id: String,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@example.com", format = "email")]
    pub email: String,
    pub role: Role,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), AttendanceError> {
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(AttendanceError::Validation(
                "Name and email are required".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(AttendanceError::Validation(format!(
                "'{}' is not a valid email address",
                self.email
            )));
        }
        Ok(())
    }
}
