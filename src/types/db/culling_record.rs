use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "culling_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub cow_id: i32,
    pub reason: String,
    pub notes: Option<String>,
    pub date_carried: NaiveDate,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cow::Entity",
        from = "Column::CowId",
        to = "super::cow::Column::Id",
        on_delete = "Cascade"
    )]
    Cow,
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
