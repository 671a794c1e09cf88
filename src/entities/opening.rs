use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The starting float declared for a shift ("apertura"). Exactly one per
/// shift; `closed` flips to true when the shift's count completes.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "openings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub shift_id: Uuid,
    pub initial_amount: Decimal,
    pub notes: Option<String>,
    pub closed: bool,
    pub opened_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shift::Entity",
        from = "Column::ShiftId",
        to = "super::shift::Column::Id"
    )]
    Shift,
    #[sea_orm(has_one = "super::cash_count::Entity")]
    CashCount,
}

impl Related<super::shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shift.def()
    }
}

impl Related<super::cash_count::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashCount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
