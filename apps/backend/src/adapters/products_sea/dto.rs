//! DTOs for products_sea adapter.

use serde_json::Value;

use crate::entities::products::{ProductCategory, ProductionMethod};

/// DTO for creating a new product.
#[derive(Debug, Clone)]
pub struct ProductCreate {
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
}

/// Full replacement of the mutable columns; callers merge partial input first.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub id: i64,
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
}

/// Optional list filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub is_active: Option<bool>,
    pub category: Option<ProductCategory>,
}
