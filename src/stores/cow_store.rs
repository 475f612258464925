use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;

use crate::errors::InternalError;
use crate::stores::query_helpers::{DatePart, date_part_eq};
use crate::types::db::cow::{self, ActiveModel, Entity as Cow};
use crate::types::db::{cow_breed, lactation};
use crate::types::internal::choices::{AvailabilityStatus, CowPregnancyStatus, ProductionStatus, Sex};

/// A validated cow ready for insert
#[derive(Debug, Clone)]
pub struct NewCow {
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
    pub dam_id: Option<i32>,
}

/// Optional list filters. Text filters match substrings ignoring ASCII case.
#[derive(Debug, Clone, Default)]
pub struct CowFilter {
    pub breed: Option<String>,
    pub is_bought: Option<bool>,
    pub gender: Option<String>,
    pub year_of_birth: Option<i32>,
    pub month_of_birth: Option<i32>,
    pub availability_status: Option<String>,
    pub current_pregnancy_status: Option<String>,
    pub category: Option<String>,
    pub current_production_status: Option<String>,
    pub name: Option<String>,
}

impl CowFilter {
    pub fn is_empty(&self) -> bool {
        self.breed.is_none()
            && self.is_bought.is_none()
            && self.gender.is_none()
            && self.year_of_birth.is_none()
            && self.month_of_birth.is_none()
            && self.availability_status.is_none()
            && self.current_pregnancy_status.is_none()
            && self.category.is_none()
            && self.current_production_status.is_none()
            && self.name.is_none()
    }
}

/// Predefined herd subsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CowGroup {
    Available,
    Pregnant,
    Male,
    Female,
    Sold,
    Dead,
}

pub struct CowStore {}

impl CowStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(&self, conn: &impl ConnectionTrait, new_cow: NewCow) -> Result<cow::Model, InternalError> {
        ActiveModel {
            name: Set(new_cow.name),
            breed_id: Set(new_cow.breed_id),
            date_of_birth: Set(new_cow.date_of_birth),
            gender: Set(new_cow.gender),
            availability_status: Set(new_cow.availability_status),
            current_pregnancy_status: Set(new_cow.current_pregnancy_status),
            category: Set(new_cow.category),
            current_production_status: Set(new_cow.current_production_status),
            is_bought: Set(new_cow.is_bought),
            date_introduced_in_farm: Set(new_cow.date_introduced_in_farm),
            date_of_death: Set(new_cow.date_of_death),
            sire_id: Set(new_cow.sire_id),
            dam_id: Set(new_cow.dam_id),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_cow", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<cow::Model>, InternalError> {
        Cow::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_cow", e))
    }

    /// Cow together with its breed row
    pub async fn find_with_breed(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<(cow::Model, cow_breed::Model)>, InternalError> {
        let found = Cow::find_by_id(id)
            .find_also_related(cow_breed::Entity)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_cow_with_breed", e))?;

        Ok(found.and_then(|(cow, breed)| breed.map(|breed| (cow, breed))))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait, filter: &CowFilter) -> Result<Vec<cow::Model>, InternalError> {
        let mut query = Cow::find();

        if let Some(breed) = &filter.breed {
            query = query
                .join(JoinType::InnerJoin, cow::Relation::Breed.def())
                .filter(cow_breed::Column::Name.contains(breed));
        }
        if let Some(is_bought) = filter.is_bought {
            query = query.filter(cow::Column::IsBought.eq(is_bought));
        }
        if let Some(gender) = &filter.gender {
            query = query.filter(cow::Column::Gender.eq(gender.as_str()));
        }
        if let Some(year) = filter.year_of_birth {
            query = query.filter(date_part_eq("cows", "date_of_birth", DatePart::Year, year));
        }
        if let Some(month) = filter.month_of_birth {
            query = query.filter(date_part_eq("cows", "date_of_birth", DatePart::Month, month));
        }
        if let Some(status) = &filter.availability_status {
            query = query.filter(cow::Column::AvailabilityStatus.eq(status.as_str()));
        }
        if let Some(status) = &filter.current_pregnancy_status {
            query = query.filter(cow::Column::CurrentPregnancyStatus.eq(status.as_str()));
        }
        if let Some(category) = &filter.category {
            query = query.filter(cow::Column::Category.eq(category.as_str()));
        }
        if let Some(status) = &filter.current_production_status {
            query = query.filter(cow::Column::CurrentProductionStatus.eq(status.as_str()));
        }
        if let Some(name) = &filter.name {
            query = query.filter(cow::Column::Name.contains(name));
        }

        query
            .order_by_asc(cow::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_cows", e))
    }

    pub async fn list_group(&self, conn: &impl ConnectionTrait, group: CowGroup) -> Result<Vec<cow::Model>, InternalError> {
        let alive = cow::Column::AvailabilityStatus.eq(AvailabilityStatus::Alive.as_str());
        let query = match group {
            CowGroup::Available => Cow::find().filter(alive),
            CowGroup::Pregnant => Cow::find()
                .filter(cow::Column::CurrentPregnancyStatus.eq(CowPregnancyStatus::Pregnant.as_str())),
            CowGroup::Male => Cow::find()
                .filter(alive)
                .filter(cow::Column::Gender.eq(Sex::Male.as_str())),
            CowGroup::Female => Cow::find()
                .filter(alive)
                .filter(cow::Column::Gender.eq(Sex::Female.as_str())),
            CowGroup::Sold => Cow::find()
                .filter(cow::Column::AvailabilityStatus.eq(AvailabilityStatus::Sold.as_str())),
            CowGroup::Dead => Cow::find()
                .filter(cow::Column::AvailabilityStatus.eq(AvailabilityStatus::Dead.as_str())),
        };

        query
            .order_by_asc(cow::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_cow_group", e))
    }

    /// Cows whose dam is `dam_id`
    pub async fn list_calves(&self, conn: &impl ConnectionTrait, dam_id: i32) -> Result<Vec<cow::Model>, InternalError> {
        Cow::find()
            .filter(cow::Column::DamId.eq(dam_id))
            .order_by_asc(cow::Column::DateOfBirth)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_calves", e))
    }

    /// Number of lactations on record for the cow
    pub async fn parity(&self, conn: &impl ConnectionTrait, id: i32) -> Result<u64, InternalError> {
        lactation::Entity::find()
            .filter(lactation::Column::CowId.eq(id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_lactations", e))
    }

    /// Persist every field of `model`
    pub async fn update(&self, conn: &impl ConnectionTrait, model: cow::Model) -> Result<cow::Model, InternalError> {
        let active: ActiveModel = model.into();
        active
            .reset_all()
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_cow", e))
    }

    pub async fn set_statuses(
        &self,
        conn: &impl ConnectionTrait,
        model: cow::Model,
        pregnancy_status: Option<CowPregnancyStatus>,
        production_status: Option<ProductionStatus>,
    ) -> Result<cow::Model, InternalError> {
        let mut active: ActiveModel = model.into();
        if let Some(status) = pregnancy_status {
            active.current_pregnancy_status = Set(status.as_str().to_owned());
        }
        if let Some(status) = production_status {
            active.current_production_status = Set(status.as_str().to_owned());
        }
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_cow_status", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = Cow::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_cow", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for CowStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{insert_cow, setup_test_db};
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_find_with_breed() {
        let db = setup_test_db().await;
        let cow = insert_cow(&db, "Daisy", "Friesian", "Female", NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()).await;

        let (found, breed) = CowStore::new().find_with_breed(&db, cow.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Daisy");
        assert_eq!(breed.name, "Friesian");
    }

    #[tokio::test]
    async fn test_list_filters_combine() {
        let db = setup_test_db().await;
        insert_cow(&db, "Daisy", "Friesian", "Female", NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()).await;
        insert_cow(&db, "Bella", "Jersey", "Female", NaiveDate::from_ymd_opt(2022, 3, 1).unwrap()).await;
        insert_cow(&db, "Duke", "Friesian", "Male", NaiveDate::from_ymd_opt(2021, 7, 9).unwrap()).await;
        let store = CowStore::new();

        let friesians = store
            .list(&db, &CowFilter { breed: Some("fries".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(friesians.len(), 2);

        let march = store
            .list(&db, &CowFilter { month_of_birth: Some(3), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(march.len(), 2);

        let combined = store
            .list(
                &db,
                &CowFilter {
                    breed: Some("Friesian".into()),
                    year_of_birth: Some(2021),
                    gender: Some("Male".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].name, "Duke");

        // Choice filters compare the whole label
        let lowercase = store
            .list(&db, &CowFilter { gender: Some("male".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(lowercase.is_empty());

        let none = store
            .list(&db, &CowFilter { name: Some("zebra".into()), ..Default::default() })
            .await
            .unwrap();
        assert!(none.is_empty());
        assert!(!CowFilter { is_bought: Some(false), ..Default::default() }.is_empty());
        assert!(CowFilter::default().is_empty());
    }

    #[tokio::test]
    async fn test_production_status_filter_is_exact() {
        let db = setup_test_db().await;
        let store = CowStore::new();
        let mut young = insert_cow(&db, "Tiny", "Sahiwal", "Male", NaiveDate::from_ymd_opt(2024, 2, 2).unwrap()).await;
        young.current_production_status = "Young Bull".into();
        store.update(&db, young).await.unwrap();
        let mut bull = insert_cow(&db, "Rex", "Sahiwal", "Male", NaiveDate::from_ymd_opt(2019, 2, 2).unwrap()).await;
        bull.current_production_status = "Bull".into();
        store.update(&db, bull).await.unwrap();

        let bulls = store
            .list(&db, &CowFilter { current_production_status: Some("Bull".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(bulls.len(), 1);
        assert_eq!(bulls[0].name, "Rex");
    }

    #[tokio::test]
    async fn test_groups_and_calves() {
        let db = setup_test_db().await;
        let store = CowStore::new();
        let dam = insert_cow(&db, "Mama", "Sahiwal", "Female", NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()).await;
        let mut calf = insert_cow(&db, "Junior", "Sahiwal", "Male", NaiveDate::from_ymd_opt(2023, 5, 5).unwrap()).await;
        calf.dam_id = Some(dam.id);
        calf.availability_status = "Sold".into();
        store.update(&db, calf).await.unwrap();

        assert_eq!(store.list_group(&db, CowGroup::Female).await.unwrap().len(), 1);
        assert!(store.list_group(&db, CowGroup::Male).await.unwrap().is_empty());
        assert_eq!(store.list_group(&db, CowGroup::Sold).await.unwrap().len(), 1);
        assert_eq!(store.list_calves(&db, dam.id).await.unwrap()[0].name, "Junior");
        assert_eq!(store.parity(&db, dam.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_set_statuses() {
        let db = setup_test_db().await;
        let cow = insert_cow(&db, "Daisy", "Friesian", "Female", NaiveDate::from_ymd_opt(2021, 3, 14).unwrap()).await;

        let updated = CowStore::new()
            .set_statuses(&db, cow, Some(CowPregnancyStatus::Calved), Some(ProductionStatus::Open))
            .await
            .unwrap();
        assert_eq!(updated.current_pregnancy_status, "Calved");
        assert_eq!(updated.current_production_status, "Open");
    }
}
