use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cow_breeds")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cow::Entity")]
    Cow,
}

impl Related<super::cow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
