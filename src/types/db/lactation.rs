use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "lactations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub cow_id: i32,
    pub start_date: NaiveDate,
    pub lactation_number: i16,
    #[sea_orm(unique)]
    pub pregnancy_id: Option<i32>,
    pub actual_end_date: Option<NaiveDate>,
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
        belongs_to = "super::pregnancy::Entity",
        from = "Column::PregnancyId",
        to = "super::pregnancy::Column::Id",
        on_delete = "Cascade"
    )]
    Pregnancy,
    #[sea_orm(has_many = "super::milk::Entity")]
    Milk,
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cow.def()
    }
}

impl Related<super::pregnancy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pregnancy.def()
    }
}

impl Related<super::milk::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Milk.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
