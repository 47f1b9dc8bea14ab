//! User repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::users_sea as users_adapter;
use crate::adapters::Page;
use crate::entities::users::{self, UserRole};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use users_adapter::UserCreate;

/// User domain model
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub sub: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub is_verified: bool,
    pub login_count: i32,
    pub last_login_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<User, DomainError> {
    find_by_id(conn, user_id).await?.ok_or_else(|| {
        DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found"))
    })
}

pub async fn find_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_sub(conn, sub).await?;
    Ok(user.map(User::from))
}

pub async fn find_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_email(conn, email).await?;
    Ok(user.map(User::from))
}

pub async fn record_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), DomainError> {
    users_adapter::record_login(conn, user_id).await?;
    Ok(())
}

pub async fn update_password_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    password_hash: String,
) -> Result<User, DomainError> {
    let user = users_adapter::update_password_hash(conn, user_id, password_hash).await?;
    Ok(User::from(user))
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    is_active: bool,
) -> Result<User, DomainError> {
    let user = users_adapter::set_active(conn, user_id, is_active).await?;
    Ok(User::from(user))
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: Page,
) -> Result<(Vec<User>, u64), DomainError> {
    let (rows, total) = users_adapter::list_users(conn, page).await?;
    Ok((rows.into_iter().map(User::from).collect(), total))
}

pub async fn count_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    only_active: bool,
) -> Result<u64, DomainError> {
    Ok(users_adapter::count_users(conn, only_active).await?)
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            sub: model.sub,
            email: model.email,
            password_hash: model.password_hash,
            full_name: model.full_name,
            company_name: model.company_name,
            role: model.role,
            is_active: model.is_active,
            is_verified: model.is_verified,
            login_count: model.login_count,
            last_login_at: model.last_login_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
