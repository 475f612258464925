use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::errors::InternalError;
use crate::types::db::cow;
use crate::types::db::cow_breed::{self, ActiveModel, Entity as CowBreed};

pub struct CowBreedStore {}

impl CowBreedStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(&self, conn: &impl ConnectionTrait, name: &str) -> Result<cow_breed::Model, InternalError> {
        ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_cow_breed", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<cow_breed::Model>, InternalError> {
        CowBreed::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_cow_breed", e))
    }

    pub async fn find_by_name(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<Option<cow_breed::Model>, InternalError> {
        CowBreed::find()
            .filter(cow_breed::Column::Name.eq(name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_cow_breed_by_name", e))
    }

    /// Breed rows are created lazily the first time a cow names them
    pub async fn get_or_create(&self, conn: &impl ConnectionTrait, name: &str) -> Result<cow_breed::Model, InternalError> {
        match self.find_by_name(conn, name).await? {
            Some(breed) => Ok(breed),
            None => self.insert(conn, name).await,
        }
    }

    /// Breeds whose name contains `name_filter`, ignoring ASCII case
    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        name_filter: Option<&str>,
    ) -> Result<Vec<cow_breed::Model>, InternalError> {
        let mut query = CowBreed::find();
        if let Some(name) = name_filter {
            // SQLite LIKE is case-insensitive for ASCII
            query = query.filter(cow_breed::Column::Name.contains(name));
        }

        query
            .order_by_asc(cow_breed::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_cow_breeds", e))
    }

    pub async fn rename(
        &self,
        conn: &impl ConnectionTrait,
        breed: cow_breed::Model,
        name: &str,
    ) -> Result<cow_breed::Model, InternalError> {
        let mut active: ActiveModel = breed.into();
        active.name = Set(name.to_owned());
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_cow_breed", e))
    }

    /// Number of cows recorded under this breed
    pub async fn usage_count(&self, conn: &impl ConnectionTrait, id: i32) -> Result<u64, InternalError> {
        cow::Entity::find()
            .filter(cow::Column::BreedId.eq(id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_cows_by_breed", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = CowBreed::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_cow_breed", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for CowBreedStore {
    fn default() -> Self {
        Self::new()
    }
}
