use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_registers_table::Registers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shifts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shifts::Id).uuid().primary_key().not_null())
                    .col(ColumnDef::new(Shifts::RegisterId).uuid().not_null())
                    .col(ColumnDef::new(Shifts::UserId).uuid().not_null())
                    .col(ColumnDef::new(Shifts::EmployeeId).uuid().null())
                    .col(ColumnDef::new(Shifts::Date).date().not_null())
                    .col(ColumnDef::new(Shifts::StartTime).time().not_null())
                    .col(ColumnDef::new(Shifts::EndTime).time().null())
                    .col(
                        ColumnDef::new(Shifts::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    // "{register_id}:{user_id}" while open, NULL once closed.
                    // The unique index below enforces at most one open shift
                    // per (register, user) pair.
                    .col(ColumnDef::new(Shifts::OpenScope).string().null())
                    .col(ColumnDef::new(Shifts::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shifts_register_id")
                            .from(Shifts::Table, Shifts::RegisterId)
                            .to(Registers::Table, Registers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_shifts_open_scope")
                    .table(Shifts::Table)
                    .col(Shifts::OpenScope)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shifts_register_user")
                    .table(Shifts::Table)
                    .col(Shifts::RegisterId)
                    .col(Shifts::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shifts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Shifts {
    Table,
    Id,
    RegisterId,
    UserId,
    EmployeeId,
    Date,
    StartTime,
    EndTime,
    Status,
    OpenScope,
    CreatedAt,
}
