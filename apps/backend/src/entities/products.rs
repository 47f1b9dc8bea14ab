use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    #[sea_orm(string_value = "electronics")]
    Electronics,
    #[sea_orm(string_value = "fashion")]
    Fashion,
    #[sea_orm(string_value = "home_garden")]
    HomeGarden,
    #[sea_orm(string_value = "beauty_health")]
    BeautyHealth,
    #[sea_orm(string_value = "sports_outdoors")]
    SportsOutdoors,
    #[sea_orm(string_value = "toys_games")]
    ToysGames,
    #[sea_orm(string_value = "books_media")]
    BooksMedia,
    #[sea_orm(string_value = "food_beverages")]
    FoodBeverages,
    #[sea_orm(string_value = "automotive")]
    Automotive,
    #[sea_orm(string_value = "jewelry")]
    Jewelry,
    #[sea_orm(string_value = "pet_supplies")]
    PetSupplies,
    #[sea_orm(string_value = "office_supplies")]
    OfficeSupplies,
    #[sea_orm(string_value = "baby_kids")]
    BabyKids,
    #[sea_orm(string_value = "industrial")]
    Industrial,
    #[sea_orm(string_value = "other")]
    Other,
}

/// How a product is made. Stored as plain text in `products.production_method`;
/// `"self"` cannot be a `DeriveActiveEnum` value, so the adapter converts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductionMethod {
    /// Made in-house
    #[serde(rename = "self")]
    InHouse,
    /// Contract manufacturing
    Fason,
    Dropship,
    Wholesale,
}

impl ProductionMethod {
    pub const ALL: [ProductionMethod; 4] = [
        ProductionMethod::InHouse,
        ProductionMethod::Fason,
        ProductionMethod::Dropship,
        ProductionMethod::Wholesale,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProductionMethod::InHouse => "self",
            ProductionMethod::Fason => "fason",
            ProductionMethod::Dropship => "dropship",
            ProductionMethod::Wholesale => "wholesale",
        }
    }

    pub fn from_db(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_name = "user_id")]
    pub user_id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub category: ProductCategory,
    #[sea_orm(column_name = "base_price", column_type = "Double")]
    pub base_price: f64,
    pub currency: String,
    #[sea_orm(column_name = "production_method", nullable)]
    pub production_method: Option<String>,
    #[sea_orm(column_name = "target_market")]
    pub target_market: Option<String>,
    #[sea_orm(column_name = "quality_tier")]
    pub quality_tier: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub specifications: Option<Json>,
    #[sea_orm(column_name = "is_active")]
    pub is_active: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::forecasts::Entity")]
    Forecasts,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::forecasts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Forecasts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
