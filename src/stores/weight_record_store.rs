use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::stores::query_helpers::{DatePart, date_part_eq};
use crate::types::db::weight_record::{self, ActiveModel, Entity as WeightRecord};

#[derive(Debug, Clone, Default)]
pub struct WeightRecordFilter {
    pub cow_id: Option<i32>,
    pub day_of_weighing: Option<i32>,
    pub month_of_weighing: Option<i32>,
    pub year_of_weighing: Option<i32>,
}

impl WeightRecordFilter {
    pub fn is_empty(&self) -> bool {
        self.cow_id.is_none()
            && self.day_of_weighing.is_none()
            && self.month_of_weighing.is_none()
            && self.year_of_weighing.is_none()
    }
}

pub struct WeightRecordStore {}

impl WeightRecordStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
        weight_in_kgs: f64,
        date_taken: NaiveDate,
    ) -> Result<weight_record::Model, InternalError> {
        ActiveModel {
            cow_id: Set(cow_id),
            weight_in_kgs: Set(weight_in_kgs),
            date_taken: Set(date_taken),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_weight_record", e))
    }

    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i32,
    ) -> Result<Option<weight_record::Model>, InternalError> {
        WeightRecord::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_weight_record", e))
    }

    /// True when the cow already has a record on `date_taken`, other than `exclude_id`
    pub async fn exists_on_date(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
        date_taken: NaiveDate,
        exclude_id: Option<i32>,
    ) -> Result<bool, InternalError> {
        let mut query = WeightRecord::find()
            .filter(weight_record::Column::CowId.eq(cow_id))
            .filter(weight_record::Column::DateTaken.eq(date_taken));
        if let Some(id) = exclude_id {
            query = query.filter(weight_record::Column::Id.ne(id));
        }
        let existing = query
            .one(conn)
            .await
            .map_err(|e| InternalError::database("check_weight_record_date", e))?;
        Ok(existing.is_some())
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &WeightRecordFilter,
    ) -> Result<Vec<weight_record::Model>, InternalError> {
        let mut query = WeightRecord::find();
        if let Some(cow_id) = filter.cow_id {
            query = query.filter(weight_record::Column::CowId.eq(cow_id));
        }
        if let Some(day) = filter.day_of_weighing {
            query = query.filter(date_part_eq("weight_records", "date_taken", DatePart::Day, day));
        }
        if let Some(month) = filter.month_of_weighing {
            query = query.filter(date_part_eq("weight_records", "date_taken", DatePart::Month, month));
        }
        if let Some(year) = filter.year_of_weighing {
            query = query.filter(date_part_eq("weight_records", "date_taken", DatePart::Year, year));
        }

        query
            .order_by_asc(weight_record::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_weight_records", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        model: weight_record::Model,
    ) -> Result<weight_record::Model, InternalError> {
        let active: ActiveModel = model.into();
        active
            .reset_all()
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_weight_record", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = WeightRecord::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_weight_record", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for WeightRecordStore {
    fn default() -> Self {
        Self::new()
    }
}
