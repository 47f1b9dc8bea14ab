//! SeaORM adapter for the products table. Every lookup is scoped by owner.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use super::Page;
use crate::entities::products;

pub mod dto;

pub use dto::{ProductCreate, ProductFilter, ProductUpdate};

pub async fn create_product<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProductCreate,
) -> Result<products::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    products::ActiveModel {
        id: NotSet,
        user_id: Set(dto.user_id),
        name: Set(dto.name),
        description: Set(dto.description),
        category: Set(dto.category),
        base_price: Set(dto.base_price),
        currency: Set(dto.currency),
        production_method: Set(dto.production_method.map(|m| m.as_str().to_owned())),
        target_market: Set(dto.target_market),
        quality_tier: Set(dto.quality_tier),
        specifications: Set(dto.specifications),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
}

pub async fn find_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<Option<products::Model>, sea_orm::DbErr> {
    products::Entity::find_by_id(product_id)
        .filter(products::Column::UserId.eq(user_id))
        .one(conn)
        .await
}

pub async fn list_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    filter: ProductFilter,
    page: Page,
) -> Result<(Vec<products::Model>, u64), sea_orm::DbErr> {
    let mut cond = Condition::all().add(products::Column::UserId.eq(user_id));
    if let Some(is_active) = filter.is_active {
        cond = cond.add(products::Column::IsActive.eq(is_active));
    }
    if let Some(category) = filter.category {
        cond = cond.add(products::Column::Category.eq(category));
    }

    let total = products::Entity::find()
        .filter(cond.clone())
        .count(conn)
        .await?;
    let rows = products::Entity::find()
        .filter(cond)
        .order_by_desc(products::Column::CreatedAt)
        .order_by_desc(products::Column::Id)
        .offset(page.skip)
        .limit(page.limit)
        .all(conn)
        .await?;
    Ok((rows, total))
}

pub async fn update_product<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProductUpdate,
) -> Result<products::Model, sea_orm::DbErr> {
    products::ActiveModel {
        id: Set(dto.id),
        user_id: NotSet,
        name: Set(dto.name),
        description: Set(dto.description),
        category: Set(dto.category),
        base_price: Set(dto.base_price),
        currency: Set(dto.currency),
        production_method: Set(dto.production_method.map(|m| m.as_str().to_owned())),
        target_market: Set(dto.target_market),
        quality_tier: Set(dto.quality_tier),
        specifications: Set(dto.specifications),
        is_active: Set(dto.is_active),
        created_at: NotSet,
        updated_at: Set(OffsetDateTime::now_utc()),
    }
    .update(conn)
    .await
}

/// Returns the number of rows removed (0 when not owned).
pub async fn delete_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = products::Entity::delete_many()
        .filter(products::Column::Id.eq(product_id))
        .filter(products::Column::UserId.eq(user_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

pub async fn count_products<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, sea_orm::DbErr> {
    products::Entity::find().count(conn).await
}
