use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::types::db::inseminator::{self, ActiveModel, Entity as Inseminator};

#[derive(Debug, Clone)]
pub struct NewInseminator {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub sex: String,
    pub company: Option<String>,
    pub license_number: Option<String>,
}

pub struct InseminatorStore {}

impl InseminatorStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_inseminator: NewInseminator,
    ) -> Result<inseminator::Model, InternalError> {
        ActiveModel {
            first_name: Set(new_inseminator.first_name),
            last_name: Set(new_inseminator.last_name),
            phone_number: Set(new_inseminator.phone_number),
            sex: Set(new_inseminator.sex),
            company: Set(new_inseminator.company),
            license_number: Set(new_inseminator.license_number),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_inseminator", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<inseminator::Model>, InternalError> {
        Inseminator::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_inseminator", e))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait) -> Result<Vec<inseminator::Model>, InternalError> {
        Inseminator::find()
            .order_by_asc(inseminator::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_inseminators", e))
    }

    /// True when another inseminator already uses this phone number
    pub async fn phone_in_use(
        &self,
        conn: &impl ConnectionTrait,
        phone_number: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let mut query = Inseminator::find().filter(inseminator::Column::PhoneNumber.eq(phone_number));
        if let Some(id) = exclude_id {
            query = query.filter(inseminator::Column::Id.ne(id));
        }
        let existing = query
            .one(conn)
            .await
            .map_err(|e| InternalError::database("check_inseminator_phone", e))?;
        Ok(existing.is_some())
    }

    /// True when another inseminator already holds this license
    pub async fn license_in_use(
        &self,
        conn: &impl ConnectionTrait,
        license_number: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let mut query = Inseminator::find().filter(inseminator::Column::LicenseNumber.eq(license_number));
        if let Some(id) = exclude_id {
            query = query.filter(inseminator::Column::Id.ne(id));
        }
        let existing = query
            .one(conn)
            .await
            .map_err(|e| InternalError::database("check_inseminator_license", e))?;
        Ok(existing.is_some())
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        model: inseminator::Model,
    ) -> Result<inseminator::Model, InternalError> {
        let active: ActiveModel = model.into();
        active
            .reset_all()
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_inseminator", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = Inseminator::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_inseminator", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for InseminatorStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    fn sample(phone: &str, license: Option<&str>) -> NewInseminator {
        NewInseminator {
            first_name: "Grace".into(),
            last_name: "Achieng".into(),
            phone_number: phone.into(),
            sex: "Female".into(),
            company: Some("Kenya AI Services".into()),
            license_number: license.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_insert_and_uniqueness_checks() {
        let db = setup_test_db().await;
        let store = InseminatorStore::new();
        let created = store.insert(&db, sample("+254711000001", Some("LIC-1"))).await.unwrap();

        assert!(store.phone_in_use(&db, "+254711000001", None).await.unwrap());
        assert!(!store.phone_in_use(&db, "+254711000001", Some(created.id)).await.unwrap());
        assert!(store.license_in_use(&db, "LIC-1", None).await.unwrap());
        assert!(!store.license_in_use(&db, "LIC-2", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = setup_test_db().await;
        let store = InseminatorStore::new();
        let mut created = store.insert(&db, sample("+254711000002", None)).await.unwrap();

        created.company = None;
        let updated = store.update(&db, created).await.unwrap();
        assert!(updated.company.is_none());

        assert_eq!(store.list(&db).await.unwrap().len(), 1);
        assert!(store.delete(&db, updated.id).await.unwrap());
        assert!(store.find_by_id(&db, updated.id).await.unwrap().is_none());
    }
}
