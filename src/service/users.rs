use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AttendanceError,
    model::{
        role::Role,
        user::{NewUser, User},
    },
};

#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn get(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn list(&self, role: Option<Role>) -> Vec<User> {
        self.users
            .iter()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect()
    }

    pub fn create(&mut self, new: NewUser, at: DateTime<Utc>) -> Result<User, AttendanceError> {
        new.validate()?;
        let email = new.email.trim().to_lowercase();
        if self.users.iter().any(|u| u.email.eq_ignore_ascii_case(&email)) {
            return Err(AttendanceError::Validation(format!(
                "A user with email {email} already exists"
            )));
        }

        let user = User {
            id: format!("user-{}", Uuid::new_v4()),
            name: new.name.trim().to_string(),
            email,
            role: new.role,
            created_at: at,
        };
        self.insert(user.clone());
        Ok(user)
    }

    pub(crate) fn insert(&mut self, user: User) {
        info!(user_id = %user.id, role = %user.role, "User registered");
        self.users.push(user);
    }
}
