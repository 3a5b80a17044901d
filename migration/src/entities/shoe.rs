//! Catalog product entity
//!
//! Prices are whole euros; `offer_price` overrides `price` when set and
//! drives the per-item discount recorded on order lines.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "shoes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price: i32,
    pub offer_price: Option<i32>,
    pub gender: String,
    pub color: String,
    pub material: String,
    pub is_available: bool,
    pub is_featured: bool,
    pub brand_id: i64,
    pub category_id: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id",
        on_delete = "Restrict"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::shoe_size::Entity")]
    ShoeSize,
    #[sea_orm(has_many = "super::shoe_image::Entity")]
    ShoeImage,
    #[sea_orm(has_many = "super::order_item::Entity")]
    OrderItem,
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::shoe_size::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShoeSize.def()
    }
}

impl Related<super::shoe_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShoeImage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
