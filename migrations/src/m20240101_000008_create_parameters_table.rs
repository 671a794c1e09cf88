use sea_orm_migration::prelude::*;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Parameters::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Parameters::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Parameters::Key)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Parameters::Value).string().not_null())
                    .col(ColumnDef::new(Parameters::Kind).string().not_null())
                    .col(ColumnDef::new(Parameters::Description).text().null())
                    .col(ColumnDef::new(Parameters::UpdatedAt).timestamp().null())
                    .to_owned(),
            )
            .await?;

        // Seed the difference threshold the count/reception rules read.
        manager
            .exec_stmt(
                Query::insert()
                    .into_table(Parameters::Table)
                    .columns([
                        Parameters::Id,
                        Parameters::Key,
                        Parameters::Value,
                        Parameters::Kind,
                        Parameters::Description,
                    ])
                    .values_panic([
                        Uuid::new_v4().into(),
                        "umbral_diferencia".into(),
                        "2.00".into(),
                        "decimal".into(),
                        "Tolerance above which a count comment is mandatory".into(),
                    ])
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Parameters::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Parameters {
    Table,
    Id,
    Key,
    Value,
    Kind,
    Description,
    UpdatedAt,
}
