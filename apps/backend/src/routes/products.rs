use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::entities::products::{ProductCategory, ProductionMethod};
use crate::error::AppError;
use crate::extractors::{CurrentUser, PageParams, ValidatedJson};
use crate::repos::products::{Product, ProductFilter};
use crate::services::products::{self as product_service, NewProduct, ProductPatch};
use crate::state::app_state::AppState;

const DEFAULT_LIMIT: u64 = 20;

#[derive(Debug, Serialize)]
pub struct ProductView {
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
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Product> for ProductView {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            category: p.category,
            base_price: p.base_price,
            currency: p.currency,
            production_method: p.production_method,
            target_market: p.target_market,
            quality_tier: p.quality_tier,
            specifications: p.specifications,
            is_active: p.is_active,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
struct ProductList {
    products: Vec<ProductView>,
    total: u64,
    skip: u64,
    limit: u64,
}

#[derive(Debug, Deserialize)]
pub struct ProductQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub is_active: Option<bool>,
    pub category: Option<ProductCategory>,
}

async fn create(
    current: CurrentUser,
    body: ValidatedJson<NewProduct>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let product =
        product_service::create(require_db(&app_state)?, current.id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(ProductView::from(product)))
}

async fn get(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let product =
        product_service::get(require_db(&app_state)?, current.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProductView::from(product)))
}

async fn list(
    current: CurrentUser,
    query: web::Query<ProductQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let page = PageParams {
        skip: query.skip,
        limit: query.limit,
    }
    .page(DEFAULT_LIMIT)?;
    let filter = ProductFilter {
        is_active: query.is_active,
        category: query.category,
    };
    let (products, total) =
        product_service::list(require_db(&app_state)?, current.id, filter, page).await?;

    Ok(HttpResponse::Ok().json(ProductList {
        products: products.into_iter().map(ProductView::from).collect(),
        total,
        skip: page.skip,
        limit: page.limit,
    }))
}

async fn update(
    current: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<ProductPatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let product = product_service::update(
        require_db(&app_state)?,
        current.id,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ProductView::from(product)))
}

async fn delete(
    current: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    product_service::delete(require_db(&app_state)?, current.id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(["", "/"])
            .route(web::post().to(create))
            .route(web::get().to(list)),
    )
    .service(
        web::resource("/{product_id}")
            .route(web::get().to(get))
            .route(web::put().to(update))
            .route(web::delete().to(delete)),
    );
}
