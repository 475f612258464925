use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::errors::InternalError;
use crate::stores::query_helpers::{DatePart, date_part_eq};
use crate::types::db::milk::{self, ActiveModel, Entity as Milk};

#[derive(Debug, Clone)]
pub struct NewMilk {
    pub cow_id: i32,
    pub lactation_id: i32,
    pub milking_date: NaiveDateTime,
    pub amount_in_kgs: f64,
}

#[derive(Debug, Clone, Default)]
pub struct MilkFilter {
    pub cow_id: Option<i32>,
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub day: Option<i32>,
}

impl MilkFilter {
    pub fn is_empty(&self) -> bool {
        self.cow_id.is_none() && self.year.is_none() && self.month.is_none() && self.day.is_none()
    }
}

pub struct MilkStore {}

impl MilkStore {
    pub fn new() -> Self {
        Self {}
    }

    pub async fn insert(&self, conn: &impl ConnectionTrait, new_milk: NewMilk) -> Result<milk::Model, InternalError> {
        ActiveModel {
            cow_id: Set(new_milk.cow_id),
            lactation_id: Set(new_milk.lactation_id),
            milking_date: Set(new_milk.milking_date),
            amount_in_kgs: Set(new_milk.amount_in_kgs),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_milk", e))
    }

    pub async fn find_by_id(&self, conn: &impl ConnectionTrait, id: i32) -> Result<Option<milk::Model>, InternalError> {
        Milk::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_milk", e))
    }

    pub async fn list(&self, conn: &impl ConnectionTrait, filter: &MilkFilter) -> Result<Vec<milk::Model>, InternalError> {
        let mut query = Milk::find();
        if let Some(cow_id) = filter.cow_id {
            query = query.filter(milk::Column::CowId.eq(cow_id));
        }
        if let Some(year) = filter.year {
            query = query.filter(date_part_eq("milk", "milking_date", DatePart::Year, year));
        }
        if let Some(month) = filter.month {
            query = query.filter(date_part_eq("milk", "milking_date", DatePart::Month, month));
        }
        if let Some(day) = filter.day {
            query = query.filter(date_part_eq("milk", "milking_date", DatePart::Day, day));
        }

        query
            .order_by_asc(milk::Column::MilkingDate)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_milk", e))
    }

    pub async fn update(&self, conn: &impl ConnectionTrait, model: milk::Model) -> Result<milk::Model, InternalError> {
        let active: ActiveModel = model.into();
        active
            .reset_all()
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_milk", e))
    }

    pub async fn delete(&self, conn: &impl ConnectionTrait, id: i32) -> Result<bool, InternalError> {
        let result = Milk::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_milk", e))?;
        Ok(result.rows_affected > 0)
    }
}

impl Default for MilkStore {
    fn default() -> Self {
        Self::new()
    }
}
