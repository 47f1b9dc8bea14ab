//! Product repository functions. Every read and write is scoped by owner;
//! another user's product reads as not found.

use sea_orm::ConnectionTrait;
use serde_json::Value;
use time::OffsetDateTime;

use crate::adapters::products_sea as products_adapter;
use crate::adapters::Page;
use crate::entities::products::{self, ProductCategory, ProductionMethod};
use crate::errors::domain::{DomainError, NotFoundKind};

pub use products_adapter::{ProductCreate, ProductFilter, ProductUpdate};

/// Product domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category: ProductCategory,
    pub base_price: f64,
    pub currency: String,
    pub production_method: Option<ProductionMethod>,
    pub target_market: Option<String>,
    pub quality_tier: Option<String>,
    pub specifications: Option<Value>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Product {
    /// Snapshot of every mutable column, ready to be patched and written back.
    pub fn to_update(&self) -> ProductUpdate {
        ProductUpdate {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category,
            base_price: self.base_price,
            currency: self.currency.clone(),
            production_method: self.production_method,
            target_market: self.target_market.clone(),
            quality_tier: self.quality_tier.clone(),
            specifications: self.specifications.clone(),
            is_active: self.is_active,
        }
    }
}

fn product_not_found(product_id: i64) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Product,
        format!("Product {product_id} not found"),
    )
}

pub async fn create_product<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProductCreate,
) -> Result<Product, DomainError> {
    let product = products_adapter::create_product(conn, dto).await?;
    Ok(Product::from(product))
}

pub async fn require_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<Product, DomainError> {
    products_adapter::find_owned(conn, user_id, product_id)
        .await?
        .map(Product::from)
        .ok_or_else(|| product_not_found(product_id))
}

pub async fn list_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    filter: ProductFilter,
    page: Page,
) -> Result<(Vec<Product>, u64), DomainError> {
    let (rows, total) = products_adapter::list_owned(conn, user_id, filter, page).await?;
    Ok((rows.into_iter().map(Product::from).collect(), total))
}

pub async fn update_product<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ProductUpdate,
) -> Result<Product, DomainError> {
    let product = products_adapter::update_product(conn, dto).await?;
    Ok(Product::from(product))
}

pub async fn delete_owned<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<(), DomainError> {
    match products_adapter::delete_owned(conn, user_id, product_id).await? {
        0 => Err(product_not_found(product_id)),
        _ => Ok(()),
    }
}

pub async fn count_products<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<u64, DomainError> {
    Ok(products_adapter::count_products(conn).await?)
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            category: model.category,
            base_price: model.base_price,
            currency: model.currency,
            production_method: model
                .production_method
                .as_deref()
                .and_then(ProductionMethod::from_db),
            target_market: model.target_market,
            quality_tier: model.quality_tier,
            specifications: model.specifications,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
