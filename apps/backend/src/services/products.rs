//! Product catalog use cases. All operations are scoped to the owner.

use sea_orm::ConnectionTrait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::adapters::Page;
use crate::entities::products::{ProductCategory, ProductionMethod};
use crate::error::AppError;
use crate::errors::domain::DomainError;
use crate::repos::products::{self, Product, ProductCreate, ProductFilter};

pub const NAME_LEN: std::ops::RangeInclusive<usize> = 3..=200;
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: ProductCategory,
    pub base_price: f64,
    pub currency: Option<String>,
    pub production_method: Option<ProductionMethod>,
    pub target_market: Option<String>,
    pub quality_tier: Option<String>,
    pub specifications: Option<Value>,
}

/// Partial update. Absent fields are left alone; nullable fields accept an
/// explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub category: Option<ProductCategory>,
    pub base_price: Option<f64>,
    pub currency: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub production_method: Option<Option<ProductionMethod>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub target_market: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub quality_tier: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub specifications: Option<Option<Value>>,
    pub is_active: Option<bool>,
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if NAME_LEN.contains(&name.chars().count()) {
        Ok(name.to_string())
    } else {
        Err(DomainError::validation_other(format!(
            "name must be between {} and {} characters",
            NAME_LEN.start(),
            NAME_LEN.end()
        )))
    }
}

fn validate_price(price: f64) -> Result<f64, DomainError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(DomainError::validation_other("base_price must be greater than 0"))
    }
}

/// ISO 4217 style: three ASCII letters, stored uppercase.
fn validate_currency(currency: &str) -> Result<String, DomainError> {
    let currency = currency.trim();
    if currency.len() == 3 && currency.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(currency.to_ascii_uppercase())
    } else {
        Err(DomainError::validation_other(
            "currency must be a three-letter code",
        ))
    }
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    input: NewProduct,
) -> Result<Product, AppError> {
    let dto = ProductCreate {
        user_id,
        name: validate_name(&input.name)?,
        description: input.description,
        category: input.category,
        base_price: validate_price(input.base_price)?,
        currency: validate_currency(input.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))?,
        production_method: input.production_method,
        target_market: input.target_market,
        quality_tier: input.quality_tier,
        specifications: input.specifications,
    };

    let product = products::create_product(conn, dto).await?;
    info!(user_id, product_id = product.id, "product created");
    Ok(product)
}

pub async fn get<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<Product, AppError> {
    Ok(products::require_owned(conn, user_id, product_id).await?)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    filter: ProductFilter,
    page: Page,
) -> Result<(Vec<Product>, u64), AppError> {
    Ok(products::list_owned(conn, user_id, filter, page).await?)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
    patch: ProductPatch,
) -> Result<Product, AppError> {
    let current = products::require_owned(conn, user_id, product_id).await?;
    let mut dto = current.to_update();

    if let Some(name) = patch.name {
        dto.name = validate_name(&name)?;
    }
    if let Some(price) = patch.base_price {
        dto.base_price = validate_price(price)?;
    }
    if let Some(currency) = patch.currency {
        dto.currency = validate_currency(&currency)?;
    }
    if let Some(category) = patch.category {
        dto.category = category;
    }
    if let Some(description) = patch.description {
        dto.description = description;
    }
    if let Some(method) = patch.production_method {
        dto.production_method = method;
    }
    if let Some(target_market) = patch.target_market {
        dto.target_market = target_market;
    }
    if let Some(quality_tier) = patch.quality_tier {
        dto.quality_tier = quality_tier;
    }
    if let Some(specifications) = patch.specifications {
        dto.specifications = specifications;
    }
    if let Some(is_active) = patch.is_active {
        dto.is_active = is_active;
    }

    Ok(products::update_product(conn, dto).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    product_id: i64,
) -> Result<(), AppError> {
    products::delete_owned(conn, user_id, product_id).await?;
    info!(user_id, product_id, "product deleted");
    Ok(())
}
