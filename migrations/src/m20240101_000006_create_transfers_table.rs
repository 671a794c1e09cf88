use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_registers_table::Registers;
use super::m20240101_000004_create_cash_counts_table::CashCounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transfers::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    // At most one transfer per count.
                    .col(
                        ColumnDef::new(Transfers::CountId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Transfers::SourceRegisterId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transfers::DestinationRegisterId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Transfers::Amount).decimal().not_null())
                    .col(
                        ColumnDef::new(Transfers::Status)
                            .string()
                            .not_null()
                            .default("in_transit"),
                    )
                    .col(ColumnDef::new(Transfers::SentAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_count_id")
                            .from(Transfers::Table, Transfers::CountId)
                            .to(CashCounts::Table, CashCounts::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_source_register_id")
                            .from(Transfers::Table, Transfers::SourceRegisterId)
                            .to(Registers::Table, Registers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_destination_register_id")
                            .from(Transfers::Table, Transfers::DestinationRegisterId)
                            .to(Registers::Table, Registers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transfers_status_sent_at")
                    .table(Transfers::Table)
                    .col(Transfers::Status)
                    .col(Transfers::SentAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Transfers {
    Table,
    Id,
    CountId,
    SourceRegisterId,
    DestinationRegisterId,
    Amount,
    Status,
    SentAt,
}
