use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use sea_orm::sea_query::JoinType;

use crate::errors::InternalError;
use crate::stores::query_helpers::{DatePart, date_part_eq};
use crate::types::db::cow;
use crate::types::db::pregnancy::{self, ActiveModel, Entity as Pregnancy};

#[derive(Debug, Clone)]
pub struct NewPregnancy {
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

#[derive(Debug, Clone, Default)]
pub struct PregnancyFilter {
    /// Substring of the cow's name
    pub cow: Option<String>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub pregnancy_outcome: Option<String>,
    pub pregnancy_status: Option<String>,
}

impl PregnancyFilter {
    pub fn is_empty(&self) -> bool {
        self.cow.is_none()
            && self.year.is_none()
            && self.month.is_none()
            && self.pregnancy_outcome.is_none()
            && self.pregnancy_status.is_none()
    }
}

pub struct PregnancyStore {}

impl PregnancyStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        new_pregnancy: NewPregnancy,
    ) -> Result<pregnancy::Model, InternalError> {
        ActiveModel {
            cow_id: Set(new_pregnancy.cow_id),
            start_date: Set(new_pregnancy.start_date),
            date_of_calving: Set(new_pregnancy.date_of_calving),
            pregnancy_status: Set(new_pregnancy.pregnancy_status),
            pregnancy_notes: Set(new_pregnancy.pregnancy_notes),
            calving_notes: Set(new_pregnancy.calving_notes),
            pregnancy_scan_date: Set(new_pregnancy.pregnancy_scan_date),
            pregnancy_failed_date: Set(new_pregnancy.pregnancy_failed_date),
            pregnancy_outcome: Set(new_pregnancy.pregnancy_outcome),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_pregnancy", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<pregnancy::Model>, InternalError> {
        Pregnancy::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_pregnancy", e))
    }

    pub async fn list(
        &self,
        conn: &impl ConnectionTrait,
        filter: &PregnancyFilter,
    ) -> Result<Vec<pregnancy::Model>, InternalError> {
        let mut query = Pregnancy::find();
        if let Some(cow_name) = &filter.cow {
            query = query
                .join(JoinType::InnerJoin, pregnancy::Relation::Cow.def())
                .filter(cow::Column::Name.contains(cow_name));
        }
        if let Some(year) = filter.year {
            query = query.filter(date_part_eq("pregnancies", "start_date", DatePart::Year, year));
        }
        if let Some(month) = filter.month {
            query = query.filter(date_part_eq("pregnancies", "start_date", DatePart::Month, month));
        }
        if let Some(outcome) = &filter.pregnancy_outcome {
            query = query.filter(pregnancy::Column::PregnancyOutcome.eq(outcome.as_str()));
        }
        if let Some(status) = &filter.pregnancy_status {
            query = query.filter(pregnancy::Column::PregnancyStatus.eq(status.as_str()));
        }

        query
            .order_by_asc(pregnancy::Column::Id)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_pregnancies", e))
    }

    pub async fn count_for_cow(&self, conn: &impl ConnectionTrait, cow_id: i32) -> Result<u64, InternalError> {
        Pregnancy::find()
            .filter(pregnancy::Column::CowId.eq(cow_id))
            .count(conn)
            .await
            .map_err(|e| InternalError::database("count_pregnancies", e))
    }

    /// The cow's pregnancy with the most recent calving date
    pub async fn latest_calving(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
    ) -> Result<Option<pregnancy::Model>, InternalError> {
        Pregnancy::find()
            .filter(pregnancy::Column::CowId.eq(cow_id))
            .filter(pregnancy::Column::DateOfCalving.is_not_null())
            .order_by_desc(pregnancy::Column::DateOfCalving)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("latest_calving", e))
    }

    pub async fn update(
        &self,
        conn: &impl ConnectionTrait,
        model: pregnancy::Model,
    ) -> Result<pregnancy::Model, InternalError> {
        let active: ActiveModel = model.into();
        active
            .reset_all()
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_pregnancy", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = Pregnancy::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_pregnancy", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for PregnancyStore {
    fn default() -> Self {
        Self::new()
    }
}
