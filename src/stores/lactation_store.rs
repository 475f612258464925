use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::stores::query_helpers::{DatePart, date_part_eq};
use crate::types::db::lactation::{self, ActiveModel, Entity as Lactation};

#[derive(Debug, Clone)]
pub struct NewLactation {
    pub cow_id: i32,
    pub start_date: NaiveDate,
    pub lactation_number: i16,
    pub pregnancy_id: Option<i32>,
    pub actual_end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct LactationFilter {
    pub start_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub lactation_number: Option<i16>,
}

impl LactationFilter {
    pub fn is_empty(&self) -> bool {
        self.start_date.is_none()
            && self.year.is_none()
            && self.month.is_none()
            && self.lactation_number.is_none()
    }
}

pub struct LactationStore {}

impl LactationStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_lactation: NewLactation,
    ) -> Result<lactation::Model, InternalError> {
        ActiveModel {
            cow_id: Set(new_lactation.cow_id),
            start_date: Set(new_lactation.start_date),
            lactation_number: Set(new_lactation.lactation_number),
            pregnancy_id: Set(new_lactation.pregnancy_id),
            actual_end_date: Set(new_lactation.actual_end_date),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_lactation", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<lactation::Model>, InternalError> {
        Lactation::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_lactation", e))
    }

    /// The cow's lactation with the most recent start date
    pub async fn latest_for_cow(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
    ) -> Result<Option<lactation::Model>, InternalError> {
        Lactation::find()
            .filter(lactation::Column::CowId.eq(cow_id))
            .order_by_desc(lactation::Column::StartDate)
            .order_by_desc(lactation::Column::Id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("latest_lactation", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &LactationFilter,
    ) -> Result<Vec<lactation::Model>, InternalError> {
        let mut query = Lactation::find();
        if let Some(start_date) = filter.start_date {
            query = query.filter(lactation::Column::StartDate.eq(start_date));
        }
        if let Some(year) = filter.year {
            query = query.filter(date_part_eq("lactations", "start_date", DatePart::Year, year));
        }
        if let Some(month) = filter.month {
            query = query.filter(date_part_eq("lactations", "start_date", DatePart::Month, month));
        }
        if let Some(number) = filter.lactation_number {
            query = query.filter(lactation::Column::LactationNumber.eq(number));
        }

        query
            .order_by_asc(lactation::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_lactations", e))
    }

    pub async fn set_end_date(
        &self,
        conn: &impl ConnectionTrait,
        model: lactation::Model,
        end_date: NaiveDate,
    ) -> Result<lactation::Model, InternalError> {
        let mut active: ActiveModel = model.into();
        active.actual_end_date = Set(Some(end_date));
        active
            .update(conn)
            .await
            .map_err(|e| InternalError::database("end_lactation", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = Lactation::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_lactation", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for LactationStore {
    fn default() -> Self {
        Self::new()
    }
}
