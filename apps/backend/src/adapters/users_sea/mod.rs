//! SeaORM adapter for the users table.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use super::Page;
use crate::entities::users;

pub mod dto;

pub use dto::UserCreate;

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<users::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let user_active = users::ActiveModel {
        id: NotSet,
        sub: Set(dto.sub),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        full_name: Set(dto.full_name),
        company_name: Set(dto.company_name),
        role: Set(dto.role),
        is_active: Set(true),
        is_verified: Set(false),
        login_count: Set(0),
        last_login_at: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };

    user_active.insert(conn).await
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find_by_id(user_id).one(conn).await
}

pub async fn find_user_by_sub<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    sub: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Sub.eq(sub))
        .one(conn)
        .await
}

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<users::Model>, sea_orm::DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(conn)
        .await
}

/// Bump `login_count` in SQL so concurrent logins don't lose increments.
pub async fn record_login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<(), sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    users::Entity::update_many()
        .col_expr(
            users::Column::LoginCount,
            Expr::col(users::Column::LoginCount).add(1),
        )
        .col_expr(users::Column::LastLoginAt, Expr::value(Some(now)))
        .col_expr(users::Column::UpdatedAt, Expr::value(now))
        .filter(users::Column::Id.eq(user_id))
        .exec(conn)
        .await?;
    Ok(())
}

pub async fn update_password_hash<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    password_hash: String,
) -> Result<users::Model, sea_orm::DbErr> {
    users::ActiveModel {
        id: Set(user_id),
        password_hash: Set(password_hash),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    }
    .update(conn)
    .await
}

pub async fn set_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    is_active: bool,
) -> Result<users::Model, sea_orm::DbErr> {
    users::ActiveModel {
        id: Set(user_id),
        is_active: Set(is_active),
        updated_at: Set(OffsetDateTime::now_utc()),
        ..Default::default()
    }
    .update(conn)
    .await
}

/// Newest first.
pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    page: Page,
) -> Result<(Vec<users::Model>, u64), sea_orm::DbErr> {
    let total = users::Entity::find().count(conn).await?;
    let rows = users::Entity::find()
        .order_by_desc(users::Column::CreatedAt)
        .order_by_desc(users::Column::Id)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn count_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    only_active: bool,
) -> Result<u64, sea_orm::DbErr> {
    let mut query = users::Entity::find();
    if only_active {
        query = query.filter(users::Column::IsActive.eq(true));
    }
    query.count(conn).await
}
