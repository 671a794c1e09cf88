use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::ShiftStatus;

/// One user's working period at a register ("turno").
///
/// `open_scope` carries `"{register_id}:{user_id}"` while the shift is open
/// and NULL once it closes. The UNIQUE index on it is what enforces at most
/// one open shift per (register, user) pair; NULLs never collide.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shifts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub register_id: Uuid,
    pub user_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: Option<NaiveTime>,
    pub status: ShiftStatus,
    pub open_scope: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn scope_key(register_id: Uuid, user_id: Uuid) -> String {
        format!("{}:{}", register_id, user_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::register::Entity",
        from = "Column::RegisterId",
        to = "super::register::Column::Id"
    )]
    Register,
    #[sea_orm(has_one = "super::opening::Entity")]
    Opening,
}

impl Related<super::register::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Register.def()
    }
}

impl Related<super::opening::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Opening.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
