use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_shifts_table::Shifts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Openings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Openings::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Openings::ShiftId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Openings::InitialAmount)
                            .decimal()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Openings::Notes).text().null())
                    .col(
                        ColumnDef::new(Openings::Closed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Openings::OpenedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_openings_shift_id")
                            .from(Openings::Table, Openings::ShiftId)
                            .to(Shifts::Table, Shifts::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Openings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Openings {
    Table,
    Id,
    ShiftId,
    InitialAmount,
    Notes,
    Closed,
    OpenedAt,
}
