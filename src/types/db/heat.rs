use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "heats")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub cow_id: i32,
    pub observation_time: NaiveDateTime,
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
