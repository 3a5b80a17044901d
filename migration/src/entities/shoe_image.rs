use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "shoe_images")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shoe_id: i64,
    pub image_path: String,
    pub is_primary: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shoe::Entity",
        from = "Column::ShoeId",
        to = "super::shoe::Column::Id",
        on_delete = "Cascade"
    )]
    Shoe,
}

impl Related<super::shoe::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shoe.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
