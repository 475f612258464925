use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "milk")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cow_id: i32,
    pub lactation_id: i32,
    pub milking_date: NaiveDateTime,
    pub amount_in_kgs: f64,
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
    #[sea_orm(
        belongs_to = "super::lactation::Entity",
        from = "Column::LactationId",
        to = "super::lactation::Column::Id",
        on_delete = "Cascade"
    )]
    Lactation,
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cow.def()
    }
}

impl Related<super::lactation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lactation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
