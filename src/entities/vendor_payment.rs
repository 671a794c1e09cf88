use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::DocumentKind;

/// A disbursement recorded during a shift, attached to its count.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub count_id: Uuid,
    pub vendor: String,
    pub document_kind: DocumentKind,
    pub document_number: String,
    pub value: Decimal,
    pub balance_due: Decimal,
    pub paid_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cash_count::Entity",
        from = "Column::CountId",
        to = "super::cash_count::Column::Id"
    )]
    CashCount,
}

impl Related<super::cash_count::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashCount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
