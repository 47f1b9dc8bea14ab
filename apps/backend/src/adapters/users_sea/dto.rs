//! DTOs for users_sea adapter.

use crate::entities::users::UserRole;

/// DTO for creating a new user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub sub: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub role: UserRole,
}

impl UserCreate {
    pub fn new(
        sub: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            sub: sub.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            full_name: None,
            company_name: None,
            role: UserRole::User,
        }
    }

    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    pub fn with_company_name(mut self, company_name: Option<String>) -> Self {
        self.company_name = company_name;
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }
}
