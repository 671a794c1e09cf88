use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::TransferStatus;

/// Movement of counted cash from a source register to a destination register
/// ("traslado"). At most one per count; status only moves forward.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub count_id: Uuid,
    pub source_register_id: Uuid,
    pub destination_register_id: Uuid,
    pub amount: Decimal,
    pub status: TransferStatus,
    pub sent_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_count::Entity",
        from = "Column::CountId",
        to = "super::cash_count::Column::Id"
    )]
    CashCount,
    #[sea_orm(
        belongs_to = "super::register::Entity",
        from = "Column::SourceRegisterId",
        to = "super::register::Column::Id"
    )]
    SourceRegister,
    #[sea_orm(
        belongs_to = "super::register::Entity",
        from = "Column::DestinationRegisterId",
        to = "super::register::Column::Id"
    )]
    DestinationRegister,
    #[sea_orm(has_one = "super::reception::Entity")]
    Reception,
}

impl Related<super::cash_count::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashCount.def()
    }
}

impl Related<super::reception::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reception.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
