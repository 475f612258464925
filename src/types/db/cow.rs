use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub breed_id: i32,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub availability_status: String,
    pub current_pregnancy_status: String,
    pub category: String,
    pub current_production_status: String,
    pub is_bought: bool,
    pub date_introduced_in_farm: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
    pub sire_id: Option<i32>,
    #[sea_orm(indexed)]
    pub dam_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cow_breed::Entity",
        from = "Column::BreedId",
        to = "super::cow_breed::Column::Id",
        on_delete = "Restrict"
    )]
    Breed,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::SireId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Sire,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::DamId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Dam,
    #[sea_orm(has_many = "super::lactation::Entity")]
    Lactation,
    #[sea_orm(has_many = "super::pregnancy::Entity")]
    Pregnancy,
}

impl Related<super::cow_breed::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Breed.def()
    }
}

impl Related<super::lactation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Lactation.def()
    }
}

impl Related<super::pregnancy::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pregnancy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
