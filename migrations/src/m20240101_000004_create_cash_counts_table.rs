use sea_orm_migration::prelude::*;

use super::m20240101_000003_create_openings_table::Openings;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CashCounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashCounts::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashCounts::OpeningId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(CashCounts::CountedAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashCounts::ExpectedAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashCounts::FinalAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CashCounts::Difference)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(CashCounts::Comment).text().null())
                    .col(ColumnDef::new(CashCounts::CountedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cash_counts_opening_id")
                            .from(CashCounts::Table, CashCounts::OpeningId)
                            .to(Openings::Table, Openings::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cash_counts_counted_at")
                    .table(CashCounts::Table)
                    .col(CashCounts::CountedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashCounts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CashCounts {
    Table,
    Id,
    OpeningId,
    CountedAmount,
    ExpectedAmount,
    FinalAmount,
    Difference,
    Comment,
    CountedAt,
}
