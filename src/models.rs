use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of physical cash register.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RegisterKind {
    /// A point-of-sale register on the shop floor.
    #[sea_orm(string_value = "commercial")]
    Commercial,
    /// The central register that receives end-of-shift transfers.
    #[sea_orm(string_value = "principal")]
    Principal,
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShiftStatus {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "closed")]
    Closed,
}

/// Transfer status. Transitions are forward-only: a transfer leaves
/// `InTransit` exactly once, to `Received` or `Observed`, and never returns.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TransferStatus {
    #[sea_orm(string_value = "in_transit")]
    InTransit,
    #[sea_orm(string_value = "received")]
    Received,
    #[sea_orm(string_value = "observed")]
    Observed,
}

/// Document kinds accepted on a vendor-payment line.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DocumentKind {
    #[sea_orm(string_value = "invoice")]
    Invoice,
    #[sea_orm(string_value = "sales_note")]
    SalesNote,
    #[sea_orm(string_value = "unauthorized_doc")]
    UnauthorizedDoc,
    #[sea_orm(string_value = "return")]
    Return,
    #[sea_orm(string_value = "reception")]
    Reception,
}

impl DocumentKind {
    /// Document-number prefix for kinds whose numbers the server allocates.
    /// Freely entered kinds (invoice, sales note) have none.
    pub fn sequence_prefix(self) -> Option<&'static str> {
        match self {
            DocumentKind::UnauthorizedDoc => Some("DNA"),
            DocumentKind::Return => Some("DEV"),
            DocumentKind::Reception => Some("REC"),
            DocumentKind::Invoice | DocumentKind::SalesNote => None,
        }
    }

    pub fn is_auto_numbered(self) -> bool {
        self.sequence_prefix().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_numbered_kinds_have_prefixes() {
        assert_eq!(DocumentKind::UnauthorizedDoc.sequence_prefix(), Some("DNA"));
        assert_eq!(DocumentKind::Return.sequence_prefix(), Some("DEV"));
        assert_eq!(DocumentKind::Reception.sequence_prefix(), Some("REC"));
        assert!(!DocumentKind::Invoice.is_auto_numbered());
        assert!(!DocumentKind::SalesNote.is_auto_numbered());
    }
}
