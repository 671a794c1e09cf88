use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DocumentSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentSequences::DocumentKind)
                            .string()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentSequences::NextValue)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed one row per auto-numbered document kind so allocation is a
        // plain increment-then-read and never needs an insert path.
        for kind in ["unauthorized_doc", "return", "reception"] {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(DocumentSequences::Table)
                        .columns([
                            DocumentSequences::DocumentKind,
                            DocumentSequences::NextValue,
                        ])
                        .values_panic([kind.into(), 1i64.into()])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentSequences::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DocumentSequences {
    Table,
    DocumentKind,
    NextValue,
}
