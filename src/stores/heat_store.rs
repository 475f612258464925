use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::stores::query_helpers::{DatePart, date_part_eq};
use crate::types::db::heat::{self, ActiveModel, Entity as Heat};

#[derive(Debug, Clone, Default)]
pub struct HeatFilter {
    pub cow_id: Option<i32>,
    pub year: Option<i32>,
    pub month: Option<i32>,
}

impl HeatFilter {
    pub fn is_empty(&self) -> bool {
        self.cow_id.is_none() && self.year.is_none() && self.month.is_none()
    }
}

/// Heat observations are append-only
pub struct HeatStore {}

impl HeatStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
        observation_time: NaiveDateTime,
    ) -> Result<heat::Model, InternalError> {
        ActiveModel {
            cow_id: Set(cow_id),
            observation_time: Set(observation_time),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_heat", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<heat::Model>, InternalError> {
        Heat::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_heat", e))
    }

    /// True when the cow has an observation in `[from, to]`
    pub async fn exists_between(
        &self,
        conn: &impl ConnectionTrait,
        cow_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<bool, InternalError> {
        let existing = Heat::find()
            .filter(heat::Column::CowId.eq(cow_id))
            .filter(heat::Column::ObservationTime.between(from, to))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("check_recent_heat", e))?;
        Ok(existing.is_some())
    }

    pub async fn list(&self, conn: &impl ConnectionTrait, filter: &HeatFilter) -> Result<Vec<heat::Model>, InternalError> {
        let mut query = Heat::find();
        if let Some(cow_id) = filter.cow_id {
            query = query.filter(heat::Column::CowId.eq(cow_id));
        }
        if let Some(year) = filter.year {
            query = query.filter(date_part_eq("heats", "observation_time", DatePart::Year, year));
        }
        if let Some(month) = filter.month {
            query = query.filter(date_part_eq("heats", "observation_time", DatePart::Month, month));
        }

        query
            .order_by_asc(heat::Column::ObservationTime)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_heats", e))
    }
}

impl Default for HeatStore {
    fn default() -> Self {
        Self::new()
    }
}
