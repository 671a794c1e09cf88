use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Server-side atomic sequence per document kind. Client-local counters
/// cannot be trusted across concurrent sessions, so numbers for the
/// auto-numbered document kinds are allocated here, inside the count
/// transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_sequences")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub document_kind: String,
    pub next_value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
