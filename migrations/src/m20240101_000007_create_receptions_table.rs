use sea_orm_migration::prelude::*;

use super::m20240101_000006_create_transfers_table::Transfers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Receptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Receptions::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    // Exactly one reception per transfer.
                    .col(
                        ColumnDef::new(Receptions::TransferId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Receptions::ReceivingUserId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Receptions::ReceivedAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Receptions::Difference)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Receptions::Comment).text().null())
                    .col(ColumnDef::new(Receptions::ReceivedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_receptions_transfer_id")
                            .from(Receptions::Table, Receptions::TransferId)
                            .to(Transfers::Table, Transfers::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Receptions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Receptions {
    Table,
    Id,
    TransferId,
    ReceivingUserId,
    ReceivedAmount,
    Difference,
    Comment,
    ReceivedAt,
}
