use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// End-of-shift cash reconciliation ("arqueo").
///
/// `difference` is the rounded gap between the vendor-payment balances due
/// and the values actually paid out; a comment is mandatory when its
/// magnitude exceeds the configured threshold.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_counts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub opening_id: Uuid,
    pub counted_amount: Decimal,
    pub expected_amount: Decimal,
    pub final_amount: Decimal,
    pub difference: Decimal,
    pub comment: Option<String>,
    pub counted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::opening::Entity",
        from = "Column::OpeningId",
        to = "super::opening::Column::Id"
    )]
    Opening,
    #[sea_orm(has_many = "super::vendor_payment::Entity")]
    VendorPayments,
    #[sea_orm(has_one = "super::transfer::Entity")]
    Transfer,
}

impl Related<super::opening::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Opening.def()
    }
}

impl Related<super::vendor_payment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VendorPayments.def()
    }
}

impl Related<super::transfer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transfer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
