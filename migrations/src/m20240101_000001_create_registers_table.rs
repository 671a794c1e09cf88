use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Registers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Registers::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Registers::Name).string().not_null())
                    .col(ColumnDef::new(Registers::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Registers::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Registers::Location).string().null())
                    .col(ColumnDef::new(Registers::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Registers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Registers {
    Table,
    Id,
    Name,
    Kind,
    Active,
    Location,
    CreatedAt,
}
