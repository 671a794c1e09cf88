use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Named configuration value. The core only reads `umbral_diferencia`, the
/// monetary tolerance above which a count comment becomes mandatory.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parameters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub key: String,
    pub value: String,
    pub kind: String,
    pub description: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

pub const DIFFERENCE_THRESHOLD_KEY: &str = "umbral_diferencia";

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
