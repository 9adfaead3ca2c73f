use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub category: String,
    pub store: String,
    pub sold: bool,
    pub slot1: Option<f64>,
    pub slot2: Option<f64>,
    pub slot3: Option<f64>,
    pub primary_image_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::item_images::Entity")]
    ItemImages,
}

impl Related<super::item_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ItemImages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
