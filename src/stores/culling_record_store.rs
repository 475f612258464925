use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::stores::query_helpers::{DatePart, date_part_eq};
use crate::types::db::culling_record::{self, ActiveModel, Entity as CullingRecord};

#[derive(Debug, Clone, Default)]
pub struct CullingRecordFilter {
    pub reason: Option<String>,
    pub year: Option<i32>,
    pub month: Option<i32>,
}

impl CullingRecordFilter {
    pub fn is_empty(&self) -> bool {
        self.reason.is_none() && self.year.is_none() && self.month.is_none()
    }
}

pub struct CullingRecordStore {}

impl CullingRecordStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
        reason: &str,
        notes: Option<String>,
        date_carried: NaiveDate,
    ) -> Result<culling_record::Model, InternalError> {
        ActiveModel {
            cow_id: Set(cow_id),
            reason: Set(reason.to_owned()),
            notes: Set(notes),
            date_carried: Set(date_carried),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_culling_record", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<culling_record::Model>, InternalError> {
        CullingRecord::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_culling_record", e))
    }

    pub async fn find_for_cow(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
    ) -> Result<Option<culling_record::Model>, InternalError> {
        CullingRecord::find()
            .filter(culling_record::Column::CowId.eq(cow_id))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_culling_record_for_cow", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &CullingRecordFilter,
    ) -> Result<Vec<culling_record::Model>, InternalError> {
        let mut query = CullingRecord::find();
        if let Some(reason) = &filter.reason {
            query = query.filter(culling_record::Column::Reason.eq(reason.as_str()));
        }
        if let Some(year) = filter.year {
            query = query.filter(date_part_eq("culling_records", "date_carried", DatePart::Year, year));
        }
        if let Some(month) = filter.month {
            query = query.filter(date_part_eq("culling_records", "date_carried", DatePart::Month, month));
        }

        query
            .order_by_asc(culling_record::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_culling_records", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = CullingRecord::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_culling_record", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for CullingRecordStore {
    fn default() -> Self {
        Self::new()
    }
}
