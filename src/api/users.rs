use std::str::FromStr;

use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AttendanceError,
    model::{
        role::Role,
        user::{NewUser, User},
    },
    service::AttendanceService,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// `MANAGER` or `CARE_WORKER`
    #[param(example = "CARE_WORKER")]
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUser {
    #[schema(example = "Alice Worker")]
    pub name: String,
    #[schema(example = "alice@example.com", format = "email")]
    pub email: String,
    /// Defaults to `CARE_WORKER`
    pub role: Option<Role>,
}

fn parse_role(raw: Option<&str>) -> Result<Option<Role>, AttendanceError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        None => Ok(None),
        Some(r) => Role::from_str(r)
            .map(Some)
            .map_err(|_| AttendanceError::Validation(format!("Unknown role {r:?}"))),
    }
}

/// List users, optionally by role
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserQuery),
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 400, description = "Unknown role")
    ),
    tag = "Users"
)]
pub async fn list_users(
    service: web::Data<AttendanceService>,
    query: web::Query<UserQuery>,
) -> actix_web::Result<impl Responder> {
    let role = parse_role(query.role.as_deref())?;
    Ok(HttpResponse::Ok().json(service.list_users(role)))
}

/// Register a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body(content = CreateUser, content_type = "application/json"),
    responses(
        (status = 200, description = "Created user", body = User),
        (status = 400, description = "Name and email are required", body = Object, example = json!({
            "error": "Name and email are required"
        }))
    ),
    tag = "Users"
)]
pub async fn create_user(
    service: web::Data<AttendanceService>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<impl Responder> {
    let CreateUser { name, email, role } = payload.into_inner();
    let user = service.create_user(NewUser {
        name,
        email,
        role: role.unwrap_or_default(),
    })?;
    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_query_parsing() {
        assert_eq!(parse_role(None).unwrap(), None);
        assert_eq!(parse_role(Some("")).unwrap(), None);
        assert_eq!(parse_role(Some("manager")).unwrap(), Some(Role::Manager));
        assert!(parse_role(Some("boss")).is_err());
    }
}
