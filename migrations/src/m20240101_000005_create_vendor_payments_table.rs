use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_cash_counts_table::CashCounts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VendorPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorPayments::Id)
                            .uuid()
                            .primary_key()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VendorPayments::CountId).uuid().not_null())
                    .col(ColumnDef::new(VendorPayments::Vendor).string().not_null())
                    .col(
                        ColumnDef::new(VendorPayments::DocumentKind)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VendorPayments::DocumentNumber)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VendorPayments::Value)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(VendorPayments::BalanceDue)
                            .decimal()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(VendorPayments::PaidBy).string().not_null())
                    .col(
                        ColumnDef::new(VendorPayments::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_payments_count_id")
                            .from(VendorPayments::Table, VendorPayments::CountId)
                            .to(CashCounts::Table, CashCounts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vendor_payments_count_id")
                    .table(VendorPayments::Table)
                    .col(VendorPayments::CountId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorPayments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum VendorPayments {
    Table,
    Id,
    CountId,
    Vendor,
    DocumentKind,
    DocumentNumber,
    Value,
    BalanceDue,
    PaidBy,
    CreatedAt,
}
