use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::errors::InternalError;
use crate::types::db::session::{self, ActiveModel, Entity as Session};

/// Login sessions. Deleting a session revokes its access and refresh tokens.
pub struct SessionStore {}

impl SessionStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn create(
        &self,
        conn: &impl ConnectionTrait,
        session_id: &str,
        user_id: i32,
        refresh_token_hash: &str,
        created_at: i64,
        expires_at: i64,
    ) -> Result<session::Model, InternalError> {
        let model = ActiveModel {
            id: Set(session_id.to_owned()),
            user_id: Set(user_id),
            refresh_token_hash: Set(refresh_token_hash.to_owned()),
            expires_at: Set(expires_at),
            created_at: Set(created_at),
        };

        model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_session", e))
    }

    pub async fn find(&self, conn: &impl ConnectionTrait, session_id: &str) -> Result<Option<session::Model>, InternalError> {
        Session::find_by_id(session_id.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_session", e))
    }

    pub async fn find_by_refresh_hash(
        &self,
        conn: &impl ConnectionTrait,
        refresh_token_hash: &str,
    ) -> Result<Option<session::Model>, InternalError> {
        Session::find()
            .filter(session::Column::RefreshTokenHash.eq(refresh_token_hash))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_session_by_refresh_hash", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, session_id: &str) -> Result<bool, InternalError> {
        let result = Session::delete_by_id(session_id.to_owned())
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_session", e))?;
        Ok(result.rows_affected > 0)
    }

    /// Revoke every session belonging to `user_id`
    pub async fn delete_for_user(&self, conn: &impl ConnectionTrait, user_id: i32) -> Result<u64, InternalError> {
        let result = Session::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_user_sessions", e))?;
        Ok(result.rows_affected)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::UserStore;
    use crate::test::utils::{new_user, setup_test_db};

    #[tokio::test]
    async fn test_create_find_and_delete() {
        let db = setup_test_db().await;
        let user = UserStore::new().insert(&db, new_user("njeri")).await.unwrap();
        let store = SessionStore::new();

        store.create(&db, "jti-1", user.id, "hash-1", 100, 200).await.unwrap();

        let found = store.find(&db, "jti-1").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        let by_hash = store.find_by_refresh_hash(&db, "hash-1").await.unwrap().unwrap();
        assert_eq!(by_hash.id, "jti-1");

        assert!(store.delete(&db, "jti-1").await.unwrap());
        assert!(store.find(&db, "jti-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_for_user_only_touches_that_user() {
        let db = setup_test_db().await;
        let users = UserStore::new();
        let first = users.insert(&db, new_user("first")).await.unwrap();
        let second = users.insert(&db, new_user("second")).await.unwrap();
        let store = SessionStore::new();

        store.create(&db, "a", first.id, "h-a", 0, 10).await.unwrap();
        store.create(&db, "b", first.id, "h-b", 0, 10).await.unwrap();
        store.create(&db, "c", second.id, "h-c", 0, 10).await.unwrap();

        assert_eq!(store.delete_for_user(&db, first.id).await.unwrap(), 2);
        assert!(store.find(&db, "c").await.unwrap().is_some());
    }
}
