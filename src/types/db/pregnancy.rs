use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pregnancies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub cow_id: i32,
    pub start_date: NaiveDate,
    pub date_of_calving: Option<NaiveDate>,
    pub pregnancy_status: String,
    pub pregnancy_notes: Option<String>,
    pub calving_notes: Option<String>,
    pub pregnancy_scan_date: Option<NaiveDate>,
    pub pregnancy_failed_date: Option<NaiveDate>,
    pub pregnancy_outcome: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cow::Entity",
        from = "Column::CowId",
        to = "super::cow::Column::Id",
        on_delete = "Restrict"
    )]
    Cow,
    #[sea_orm(has_one = "super::lactation::Entity")]
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
